#[cfg(test)]
pub mod tests {
    use crate::bidder::types::{BidParams, BidRequest, BidderRequest};
    use serde_json::json;

    pub const TEST_HOST_VERSION: &str = "9.1.0";

    /// Bid request for the ABCD1234 ad spot with three banner sizes.
    pub fn reference_bid_request() -> BidRequest {
        BidRequest {
            bidder: Some("freakout".to_string()),
            params: BidParams {
                adspot_id: Some("ABCD1234".to_string()),
                ad_type: Some("14".to_string()),
            },
            ad_unit_code: Some("adunit-code".to_string()),
            sizes: Some(vec![json!([300, 250]), json!([320, 50]), json!([320, 100])]),
            bid_id: Some("2b84475b5b636e".to_string()),
            bidder_request_id: Some("1f4001782ac16c".to_string()),
            auction_id: Some("aba03555-4802-4c45-9f15-05ffa8594cff".to_string()),
            transaction_id: Some("791e9d84-af92-4903-94da-24c7426d9d0c".to_string()),
        }
    }

    pub fn reference_bidder_request() -> BidderRequest {
        BidderRequest::with_referer("https://example.com")
    }
}
