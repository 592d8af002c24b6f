//! FreakOut bid adapter for header-bidding auction frameworks.
//!
//! The host framework drives the auction and owns all network I/O. This crate
//! validates bid requests, describes the GET requests to send to the RFP ad
//! endpoint, and turns the endpoint's responses back into bids and user syncs.
//!
//! # Modules
//!
//! - [`bidder`]: Host contract (`BidderAdapter`), value types and coercion
//! - [`config_store`]: Read-only configuration accessor used at call time
//! - [`constants`]: Bidder code, endpoint and configuration keys
//! - [`creative`]: Creative markup generation
//! - [`error`]: Error types and error handling utilities
//! - [`integrations`]: Demand-source adapters
//! - [`settings`]: Configuration management and validation
//! - [`test_support`]: Testing utilities

pub mod bidder;
pub mod config_store;
pub mod constants;
pub mod creative;
pub mod error;
pub mod integrations;
pub mod settings;
pub mod test_support;
