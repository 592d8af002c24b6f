//! Offline adapter commands: build requests, interpret responses, list syncs.
//!
//! Inputs are JSON files in the host framework's shape; outputs are pretty
//! printed JSON in the same shape.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use http::Method;
use serde::Serialize;

use freakout_bidder_common::bidder::{
    build_adapters, find_adapter, BidRequest, BidderAdapter, BidderRequest, ServerRequest,
    ServerResponse, SyncOptions,
};
use freakout_bidder_common::constants::{BIDDER_CODE, DEFAULT_ENDPOINT_URL};
use freakout_bidder_common::settings::Settings;

use crate::error::CliError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BuiltRequest<'a> {
    #[serde(flatten)]
    request: &'a ServerRequest,
    request_uri: String,
}

fn freakout_adapter(settings: Settings) -> Result<Arc<dyn BidderAdapter>, CliError> {
    let adapters = build_adapters(&Arc::new(settings));
    find_adapter(&adapters, BIDDER_CODE)
        .cloned()
        .ok_or_else(|| CliError::Adapter("FreakOut adapter is disabled".to_string()))
}

/// Build outbound requests for the bid requests in `bids_file`.
///
/// Bid requests failing the validity check are skipped, as the host would.
pub fn build(
    settings: Settings,
    bids_file: &Path,
    referer: Option<String>,
) -> Result<String, CliError> {
    let adapter = freakout_adapter(settings)?;
    let content = fs::read_to_string(bids_file)?;
    let bid_requests: Vec<BidRequest> = serde_json::from_str(&content)?;

    let (valid, invalid): (Vec<BidRequest>, Vec<BidRequest>) = bid_requests
        .into_iter()
        .partition(|bid| adapter.is_bid_request_valid(bid));

    for bid in &invalid {
        log::warn!(
            "Skipping invalid bid request (bidId: {})",
            bid.bid_id.as_deref().unwrap_or("unknown")
        );
    }

    let bidder_request = match referer {
        Some(referer) => BidderRequest::with_referer(referer),
        None => BidderRequest::default(),
    };

    let requests = adapter.build_requests(&valid, &bidder_request);
    log::info!(
        "Built {} requests ({} invalid bid requests skipped)",
        requests.len(),
        invalid.len()
    );

    let output: Vec<BuiltRequest<'_>> = requests
        .iter()
        .map(|request| BuiltRequest {
            request,
            request_uri: request.request_uri(),
        })
        .collect();

    Ok(serde_json::to_string_pretty(&output)?)
}

/// Interpret a raw response body for `adspot_id` into bids.
pub fn interpret(
    settings: Settings,
    response_file: &Path,
    adspot_id: &str,
) -> Result<String, CliError> {
    let adapter = freakout_adapter(settings)?;
    let bytes = fs::read(response_file)?;
    let response = ServerResponse::from_body_bytes(&bytes);

    let request = ServerRequest {
        method: Method::GET,
        url: DEFAULT_ENDPOINT_URL.to_string(),
        data: String::new(),
        adspot_id: adspot_id.to_string(),
    };

    let bids = adapter.interpret_response(&response, &request);
    log::info!("Response yielded {} bids", bids.len());

    Ok(serde_json::to_string_pretty(&bids)?)
}

/// Collect user syncs from response bodies, in file order.
pub fn syncs(
    settings: Settings,
    response_files: &[PathBuf],
    sync_options: SyncOptions,
) -> Result<String, CliError> {
    let adapter = freakout_adapter(settings)?;
    let responses = response_files
        .iter()
        .map(|path| fs::read(path).map(|bytes| ServerResponse::from_body_bytes(&bytes)))
        .collect::<Result<Vec<_>, _>>()?;

    let syncs = adapter.get_user_syncs(&sync_options, &responses);
    Ok(serde_json::to_string_pretty(&syncs)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value as Json};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("should create temp file");
        file.write_all(content.as_bytes())
            .expect("should write temp file");
        file
    }

    fn settings() -> Settings {
        Settings::from_toml(
            r#"
            [host]
            version = "9.1.0"
            "#,
        )
        .expect("should parse")
    }

    #[test]
    fn test_build_skips_invalid_bid_requests() {
        let bids = write_file(
            &json!([
                {
                    "bidder": "freakout",
                    "params": { "adspot_id": "ABCD1234", "ad_type": 14 },
                    "sizes": [[300, 250]],
                    "bidId": "b1",
                    "transactionId": "t1"
                },
                {
                    "bidder": "freakout",
                    "params": {},
                    "bidId": "b2"
                }
            ])
            .to_string(),
        );

        let output = build(settings(), bids.path(), Some("https://example.com".to_string()))
            .expect("should build");
        let requests: Json = serde_json::from_str(&output).expect("valid JSON");

        let requests = requests.as_array().expect("array output");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["method"], "GET");
        assert_eq!(requests[0]["adspotId"], "ABCD1234");
        assert_eq!(
            requests[0]["requestUri"],
            "https://ad.rfp.fout.jp/ad?adspot_id=ABCD1234&ad_type=14&media_url=https%3A%2F%2Fexample.com&hb=prebidjs&pb_ver=9.1.0&pb_adapter_ver=1.0.0&pb_tid=t1&pb_bid=b1&cur=JPY&sizes=300x250&"
        );
    }

    #[test]
    fn test_build_rejects_non_array_input() {
        let bids = write_file(r#"{"params": {"adspot_id": "A1"}}"#);
        let err = build(settings(), bids.path(), None).expect_err("should fail");
        assert!(matches!(err, CliError::Json(_)));
    }

    #[test]
    fn test_build_with_disabled_adapter() {
        let settings = Settings::from_toml(
            r#"
            [freakout]
            enabled = false
            "#,
        )
        .expect("should parse");
        let bids = write_file("[]");

        let err = build(settings, bids.path(), None).expect_err("should fail");
        assert!(matches!(err, CliError::Adapter(_)));
    }

    #[test]
    fn test_interpret_response_file() {
        let response = write_file(
            &json!({
                "items": [{
                    "pb_bid": "b1",
                    "cpm": 30,
                    "cur": "JPY",
                    "creative_width": "300",
                    "creative_height": "250",
                    "ttl": 200,
                    "creative_id": "creative-1"
                }]
            })
            .to_string(),
        );

        let output = interpret(settings(), response.path(), "ABCD1234").expect("should interpret");
        let bids: Json = serde_json::from_str(&output).expect("valid JSON");

        assert_eq!(bids[0]["requestId"], "b1");
        assert_eq!(bids[0]["cpm"], 30.0);
        assert_eq!(bids[0]["width"], 300.0);
        assert_eq!(bids[0]["netRevenue"], true);
        assert!(bids[0]["ad"]
            .as_str()
            .expect("ad markup")
            .contains("rfp-ad-response-ABCD1234"));
    }

    #[test]
    fn test_interpret_empty_response_file() {
        let response = write_file("");
        let output = interpret(settings(), response.path(), "ABCD1234").expect("should interpret");
        assert_eq!(output, "[]");
    }

    #[test]
    fn test_syncs_across_files() {
        let first = write_file(
            &json!({
                "sync_urls": ["https://sync1.example.com"],
                "sync_iframe_urls": ["https://sync2.example.com"]
            })
            .to_string(),
        );
        let second = write_file(&json!({ "sync_urls": ["https://sync3.example.com"] }).to_string());

        let output = syncs(
            settings(),
            &[first.path().to_path_buf(), second.path().to_path_buf()],
            SyncOptions {
                pixel_enabled: true,
                iframe_enabled: true,
            },
        )
        .expect("should list syncs");
        let syncs: Json = serde_json::from_str(&output).expect("valid JSON");

        assert_eq!(
            syncs,
            json!([
                { "type": "image", "url": "https://sync1.example.com" },
                { "type": "iframe", "url": "https://sync2.example.com" },
                { "type": "image", "url": "https://sync3.example.com" }
            ])
        );
    }
}
