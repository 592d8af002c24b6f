//! FreakOut (RFP) bid adapter.
//!
//! Requests go out as a GET with the ad spot, page and auction identifiers in
//! the query string. The endpoint answers with at most one ad per request,
//! which is rendered client-side by the RFP display script from the embedded
//! response.

use http::Method;
use serde::Deserialize;
use serde_json::Value as Json;
use std::sync::Arc;

use crate::bidder::adapter::BidderAdapter;
use crate::bidder::coerce::{
    deserialize_present_value, deserialize_scalar_string, to_display_string, to_number,
};
use crate::bidder::types::{
    Bid, BidRequest, BidderRequest, MediaType, ServerRequest, ServerResponse, SyncOptions,
    UserSync,
};
use crate::config_store::{get_non_empty, ConfigStore};
use crate::constants::{
    AD_SERVER_CURRENCY_KEY, ADAPTER_VERSION, BIDDER_CODE, CURRENCY_JPY, CURRENCY_USD,
    DEFAULT_ENDPOINT_URL, DEFAULT_TTL_SECS, ENDPOINT_URL_KEY, HEADER_BIDDING_SOURCE,
};
use crate::creative::make_creative;
use crate::settings::Settings;

// ============================================================================
// RFP API Types
// ============================================================================

/// Ad record returned in `items`.
#[derive(Debug, Clone, Deserialize)]
struct RfpAdItem {
    /// Bid id echoed from the request's `pb_bid`
    #[serde(default, deserialize_with = "deserialize_scalar_string")]
    pb_bid: Option<String>,

    #[serde(default, deserialize_with = "deserialize_present_value")]
    cpm: Option<Json>,

    /// Currency code
    #[serde(default, deserialize_with = "deserialize_scalar_string")]
    cur: Option<String>,

    #[serde(default, deserialize_with = "deserialize_present_value")]
    creative_width: Option<Json>,

    #[serde(default, deserialize_with = "deserialize_present_value")]
    creative_height: Option<Json>,

    /// Seconds the ad may be shown for
    #[serde(default, deserialize_with = "deserialize_present_value")]
    ttl: Option<Json>,

    #[serde(default, deserialize_with = "deserialize_scalar_string")]
    creative_id: Option<String>,

    /// VAST document for video ads
    #[serde(default, deserialize_with = "deserialize_scalar_string")]
    vast_xml: Option<String>,
}

// ============================================================================
// Adapter
// ============================================================================

/// FreakOut bid adapter.
///
/// Runtime configuration (endpoint override, ad server currency) is read from
/// the store on every call.
pub struct FreakoutAdapter<S> {
    store: S,
    host_version: String,
}

impl<S: ConfigStore> FreakoutAdapter<S> {
    /// Create a new adapter reading configuration from `store`.
    ///
    /// `host_version` is the host framework's version, reported as `pb_ver`.
    #[must_use]
    pub fn new(store: S, host_version: impl Into<String>) -> Self {
        Self {
            store,
            host_version: host_version.into(),
        }
    }

    /// Endpoint shared by every request in a batch.
    fn endpoint_url(&self) -> String {
        get_non_empty(&self.store, ENDPOINT_URL_KEY)
            .unwrap_or_else(|| DEFAULT_ENDPOINT_URL.to_string())
    }

    /// `USD` when the ad server works in dollars, `JPY` for anything else.
    fn currency(&self) -> &'static str {
        match get_non_empty(&self.store, AD_SERVER_CURRENCY_KEY) {
            Some(currency) if currency.eq_ignore_ascii_case(CURRENCY_USD) => CURRENCY_USD,
            _ => CURRENCY_JPY,
        }
    }

    fn build_query(&self, bid: &BidRequest, referer: Option<&str>, currency: &str) -> String {
        let sizes = format_sizes(bid.sizes.as_deref());

        let mut query = String::new();
        try_append_query(&mut query, "adspot_id", bid.params.adspot_id.as_deref());
        try_append_query(&mut query, "ad_type", bid.params.ad_type.as_deref());
        try_append_query(&mut query, "media_url", referer);
        try_append_query(&mut query, "hb", Some(HEADER_BIDDING_SOURCE));
        try_append_query(&mut query, "pb_ver", Some(self.host_version.as_str()));
        try_append_query(&mut query, "pb_adapter_ver", Some(ADAPTER_VERSION));
        try_append_query(&mut query, "pb_tid", bid.transaction_id.as_deref());
        try_append_query(&mut query, "pb_bid", bid.bid_id.as_deref());
        try_append_query(&mut query, "cur", Some(currency));
        try_append_query(&mut query, "sizes", sizes.as_deref());
        query
    }
}

impl<S: ConfigStore> BidderAdapter for FreakoutAdapter<S> {
    fn bidder_code(&self) -> &'static str {
        BIDDER_CODE
    }

    fn supports_media_type(&self, media_type: &MediaType) -> bool {
        matches!(
            media_type,
            MediaType::Banner | MediaType::Video | MediaType::Native
        )
    }

    fn is_bid_request_valid(&self, bid: &BidRequest) -> bool {
        bid.params
            .adspot_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }

    fn build_requests(
        &self,
        valid_bid_requests: &[BidRequest],
        bidder_request: &BidderRequest,
    ) -> Vec<ServerRequest> {
        let endpoint_url = self.endpoint_url();
        let currency = self.currency();
        let referer = bidder_request.referer_info.referer.as_deref();

        log::debug!(
            "FreakOut: building {} requests for {} (cur: {})",
            valid_bid_requests.len(),
            endpoint_url,
            currency
        );

        valid_bid_requests
            .iter()
            .map(|bid| ServerRequest {
                method: Method::GET,
                url: endpoint_url.clone(),
                data: self.build_query(bid, referer, currency),
                adspot_id: bid.params.adspot_id.clone().unwrap_or_default(),
            })
            .collect()
    }

    fn interpret_response(&self, response: &ServerResponse, request: &ServerRequest) -> Vec<Bid> {
        let body = &response.body;
        if is_empty_body(body) {
            log::debug!("FreakOut: no bid for adspot '{}'", request.adspot_id);
            return Vec::new();
        }

        let Some(ad) = first_ad_item(body) else {
            log::warn!(
                "FreakOut: response for adspot '{}' has no usable ad record",
                request.adspot_id
            );
            return Vec::new();
        };

        let ttl = to_number(ad.ttl.as_ref());
        let bid = Bid {
            request_id: ad.pb_bid,
            cpm: to_number(ad.cpm.as_ref()),
            currency: ad.cur,
            width: to_number(ad.creative_width.as_ref()),
            height: to_number(ad.creative_height.as_ref()),
            ad: make_creative(&request.adspot_id, body),
            ttl: if ttl == 0.0 || ttl.is_nan() {
                DEFAULT_TTL_SECS
            } else {
                ttl
            },
            creative_id: ad.creative_id,
            net_revenue: true,
            vast_xml: ad.vast_xml.filter(|xml| !xml.is_empty()),
        };

        log::debug!(
            "FreakOut: parsed bid for adspot '{}' (cpm: {}, creative: {:?})",
            request.adspot_id,
            bid.cpm,
            bid.creative_id
        );

        vec![bid]
    }

    fn get_user_syncs(
        &self,
        sync_options: &SyncOptions,
        responses: &[ServerResponse],
    ) -> Vec<UserSync> {
        let mut syncs = Vec::new();

        for response in responses {
            if sync_options.pixel_enabled {
                syncs.extend(sync_urls(&response.body, "sync_urls").map(UserSync::image));
            }
            if sync_options.iframe_enabled {
                syncs.extend(sync_urls(&response.body, "sync_iframe_urls").map(UserSync::iframe));
            }
        }

        syncs
    }
}

/// Append `key=value&` when the value is present and non-empty.
fn try_append_query(query: &mut String, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        query.push_str(key);
        query.push('=');
        query.push_str(&urlencoding::encode(value));
        query.push('&');
    }
}

/// Format well-formed `[width, height]` entries as `WxH,WxH`.
///
/// Returns `None` for a missing or empty list. Entries that are not a
/// two-element array are dropped.
fn format_sizes(sizes: Option<&[Json]>) -> Option<String> {
    let sizes = sizes.filter(|s| !s.is_empty())?;
    Some(
        sizes
            .iter()
            .filter_map(|size| match size.as_array()?.as_slice() {
                [width, height] => Some(format!(
                    "{}x{}",
                    to_display_string(width),
                    to_display_string(height)
                )),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// Whether the host would treat the body as empty: `null`, falsy scalars,
/// empty strings, arrays and objects, and scalars without fields.
fn is_empty_body(body: &Json) -> bool {
    match body {
        Json::String(s) => s.is_empty(),
        Json::Array(items) => items.is_empty(),
        Json::Object(fields) => fields.is_empty(),
        Json::Null | Json::Bool(_) | Json::Number(_) => true,
    }
}

fn first_ad_item(body: &Json) -> Option<RfpAdItem> {
    let item = body.get("items")?.as_array()?.first()?;
    if !item.is_object() {
        return None;
    }
    match RfpAdItem::deserialize(item) {
        Ok(ad) => Some(ad),
        Err(e) => {
            log::warn!("FreakOut: failed to parse ad record: {}", e);
            None
        }
    }
}

/// String entries of the list at `key`, or nothing when it is not a list.
fn sync_urls<'a>(body: &'a Json, key: &str) -> impl Iterator<Item = &'a str> {
    body.get(key)
        .and_then(Json::as_array)
        .into_iter()
        .flatten()
        .filter_map(Json::as_str)
}

// ============================================================================
// Adapter Auto-Registration
// ============================================================================

/// Auto-register the FreakOut adapter based on settings configuration.
///
/// The settings serve as the adapter's config store.
#[must_use]
pub fn register_adapters(settings: &Arc<Settings>) -> Vec<Arc<dyn BidderAdapter>> {
    if !settings.freakout.enabled {
        log::debug!("FreakOut adapter is disabled");
        return Vec::new();
    }

    log::info!(
        "Registering FreakOut adapter (endpoint: {})",
        settings
            .freakout
            .endpoint_url
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT_URL)
    );

    let host_version = settings.host.version.clone();
    let adapter: Arc<dyn BidderAdapter> =
        Arc::new(FreakoutAdapter::new(Arc::clone(settings), host_version));
    vec![adapter]
}

// ============================================================================
// Tests
// ============================================================================
