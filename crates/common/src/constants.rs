/// Bidder code the adapter registers under.
pub const BIDDER_CODE: &str = "freakout";

/// Ad endpoint used when no override is configured.
pub const DEFAULT_ENDPOINT_URL: &str = "https://ad.rfp.fout.jp/ad";

/// Version of this adapter, reported as `pb_adapter_ver`.
pub const ADAPTER_VERSION: &str = "1.0.0";

/// Host framework version reported as `pb_ver` when settings do not name one.
pub const DEFAULT_HOST_VERSION: &str = "9.0.0";

/// Value of the `hb` query parameter.
pub const HEADER_BIDDING_SOURCE: &str = "prebidjs";

/// Client-side renderer loaded by every creative.
pub const RENDERER_SCRIPT_URL: &str = "https://js.rfp.fout.jp/rfp-display.js";

/// Namespaced config key holding the endpoint override.
pub const ENDPOINT_URL_KEY: &str = "freakout.endpoint_url";

/// Config key holding the ad server currency.
pub const AD_SERVER_CURRENCY_KEY: &str = "currency.adServerCurrency";

/// Fallback bid TTL in seconds.
pub const DEFAULT_TTL_SECS: f64 = 300.0;

pub const CURRENCY_USD: &str = "USD";
pub const CURRENCY_JPY: &str = "JPY";
