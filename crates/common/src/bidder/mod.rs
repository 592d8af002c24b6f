//! Host-facing bid adapter framework.
//!
//! This module defines the contract every adapter implements and the value
//! types exchanged with the host auction framework. Individual adapters live
//! in the `integrations` module (e.g., `crate::integrations::freakout`).

use crate::settings::Settings;
use std::sync::Arc;

pub mod adapter;
pub mod coerce;
pub mod types;

pub use adapter::BidderAdapter;
pub use types::{
    Bid, BidParams, BidRequest, BidderRequest, MediaType, RefererInfo, ServerRequest,
    ServerResponse, SyncOptions, SyncType, UserSync,
};

/// Type alias for adapter builder functions.
type AdapterBuilder = fn(&Arc<Settings>) -> Vec<Arc<dyn BidderAdapter>>;

/// Returns the list of all available adapter builder functions.
///
/// Each builder checks the settings for its own section and returns the
/// adapter when enabled.
fn adapter_builders() -> &'static [AdapterBuilder] {
    &[crate::integrations::freakout::register_adapters]
}

/// Build every adapter enabled by the provided settings.
///
/// The settings double as the adapters' [`ConfigStore`](crate::config_store::ConfigStore),
/// so they are shared rather than copied.
#[must_use]
pub fn build_adapters(settings: &Arc<Settings>) -> Vec<Arc<dyn BidderAdapter>> {
    let adapters: Vec<Arc<dyn BidderAdapter>> = adapter_builders()
        .iter()
        .flat_map(|builder| builder(settings))
        .collect();

    log::info!("Registered {} bid adapters", adapters.len());

    adapters
}

/// Find a registered adapter by bidder code.
#[must_use]
pub fn find_adapter<'a>(
    adapters: &'a [Arc<dyn BidderAdapter>],
    bidder_code: &str,
) -> Option<&'a Arc<dyn BidderAdapter>> {
    adapters
        .iter()
        .find(|adapter| adapter.bidder_code() == bidder_code)
}
