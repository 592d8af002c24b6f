//! Value objects exchanged with the host auction framework.
//!
//! Field names serialize in the host's camelCase so the types can be read
//! from, and handed back to, the framework's JSON representation unchanged.

use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use super::coerce::{deserialize_lenient_list, deserialize_truthy_string};

/// Media type enumeration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Banner,
    Video,
    Native,
}

/// Publisher-supplied adapter parameters for one ad unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BidParams {
    /// The demand source's identifier for the ad placement.
    #[serde(default, deserialize_with = "deserialize_truthy_string")]
    pub adspot_id: Option<String>,

    /// Optional ad type code.
    #[serde(default, deserialize_with = "deserialize_truthy_string")]
    pub ad_type: Option<String>,
}

/// One auction line item addressed to this bidder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidder: Option<String>,

    #[serde(default)]
    pub params: BidParams,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_unit_code: Option<String>,

    /// Candidate sizes as sent by the publisher. Well-formed entries are
    /// `[width, height]`; anything else is dropped when the request is built.
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub sizes: Option<Vec<Json>>,

    #[serde(default, deserialize_with = "deserialize_truthy_string")]
    pub bid_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidder_request_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auction_id: Option<String>,

    #[serde(default, deserialize_with = "deserialize_truthy_string")]
    pub transaction_id: Option<String>,
}

/// Where the auction is running.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefererInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
}

/// Context shared by every bid request in one auction pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidderRequest {
    #[serde(default)]
    pub referer_info: RefererInfo,
}

impl BidderRequest {
    #[must_use]
    pub fn with_referer(referer: impl Into<String>) -> Self {
        Self {
            referer_info: RefererInfo {
                referer: Some(referer.into()),
            },
        }
    }
}

/// Description of one outbound HTTP request for the host to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRequest {
    #[serde(serialize_with = "serialize_method")]
    pub method: Method,
    pub url: String,
    /// URL-encoded query string.
    pub data: String,
    /// Ad spot the request was built for, used to correlate the response.
    pub adspot_id: String,
}

fn serialize_method<S>(method: &Method, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(method.as_str())
}

impl ServerRequest {
    /// Full request URI as the host transport composes a GET: `url?data`.
    #[must_use]
    pub fn request_uri(&self) -> String {
        if self.data.is_empty() {
            self.url.clone()
        } else {
            format!("{}?{}", self.url, self.data)
        }
    }

    /// Convert into an [`http::Request`] with an empty body.
    ///
    /// # Errors
    ///
    /// Returns an error when the composed URI is not a valid request target.
    pub fn to_http_request(&self) -> Result<http::Request<()>, http::Error> {
        http::Request::builder()
            .method(self.method.clone())
            .uri(self.request_uri())
            .body(())
    }
}

/// A decoded response from the ad endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerResponse {
    #[serde(default)]
    pub body: Json,
}

impl ServerResponse {
    #[must_use]
    pub fn new(body: Json) -> Self {
        Self { body }
    }

    /// Decode a raw HTTP body the way the host does: JSON when it parses,
    /// otherwise the raw text as a JSON string.
    #[must_use]
    pub fn from_body_bytes(bytes: &[u8]) -> Self {
        let body = serde_json::from_slice(bytes)
            .unwrap_or_else(|_| Json::String(String::from_utf8_lossy(bytes).into_owned()));
        Self { body }
    }
}

/// A bid handed back to the auction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub request_id: Option<String>,
    pub cpm: f64,
    pub currency: Option<String>,
    pub width: f64,
    pub height: f64,
    /// Renderable banner markup.
    pub ad: String,
    /// Seconds the bid stays usable.
    pub ttl: f64,
    pub creative_id: Option<String>,
    pub net_revenue: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vast_xml: Option<String>,
}

/// Which sync mechanisms the publisher allows.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOptions {
    #[serde(default)]
    pub pixel_enabled: bool,
    #[serde(default)]
    pub iframe_enabled: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SyncType {
    Image,
    Iframe,
}

/// A tracking pixel or iframe to load after the auction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSync {
    #[serde(rename = "type")]
    pub sync_type: SyncType,
    pub url: String,
}

impl UserSync {
    #[must_use]
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            sync_type: SyncType::Image,
            url: url.into(),
        }
    }

    #[must_use]
    pub fn iframe(url: impl Into<String>) -> Self {
        Self {
            sync_type: SyncType::Iframe,
            url: url.into(),
        }
    }
}
