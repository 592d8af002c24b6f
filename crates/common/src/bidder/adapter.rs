//! Trait definition for bid adapters.

use super::types::{
    Bid, BidRequest, BidderRequest, MediaType, ServerRequest, ServerResponse, SyncOptions,
    UserSync,
};

/// Contract between the host auction framework and one demand source.
///
/// The host owns the request lifecycle. It calls
/// [`is_bid_request_valid`](Self::is_bid_request_valid) for each bid request,
/// passes the survivors to [`build_requests`](Self::build_requests), sends the
/// resulting requests itself and feeds each decoded response to
/// [`interpret_response`](Self::interpret_response). Once all responses are in
/// it asks for [`get_user_syncs`](Self::get_user_syncs).
///
/// None of these operations fail: malformed input degrades to "not valid",
/// "no bid" or "no syncs".
pub trait BidderAdapter: Send + Sync {
    /// Bidder code publishers use to address this adapter (e.g., "freakout").
    fn bidder_code(&self) -> &'static str;

    /// Check if this adapter supports a specific media type.
    fn supports_media_type(&self, media_type: &MediaType) -> bool {
        // By default, support banner ads
        matches!(media_type, MediaType::Banner)
    }

    /// Return true when the bid request carries the params this adapter
    /// needs. Requests failing this check never reach `build_requests`.
    fn is_bid_request_valid(&self, bid: &BidRequest) -> bool;

    /// Describe one outbound request per bid request, in input order.
    fn build_requests(
        &self,
        valid_bid_requests: &[BidRequest],
        bidder_request: &BidderRequest,
    ) -> Vec<ServerRequest>;

    /// Turn the response to `request` into bids.
    fn interpret_response(&self, response: &ServerResponse, request: &ServerRequest) -> Vec<Bid>;

    /// Collect the user syncs advertised across all responses of an auction.
    fn get_user_syncs(
        &self,
        sync_options: &SyncOptions,
        responses: &[ServerResponse],
    ) -> Vec<UserSync>;
}
