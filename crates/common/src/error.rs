//! Error types for the bidder crates.
//!
//! Fallible surfaces return `Result<T, Report<AdapterError>>` so callers can
//! attach context with [`error_stack::ResultExt`]. The adapter operations
//! themselves never fail; see [`crate::bidder::BidderAdapter`].

use derive_more::Display;

/// Top-level error for settings, configuration stores and adapter tooling.
#[derive(Debug, Display)]
pub enum AdapterError {
    /// Settings could not be loaded, parsed or validated.
    #[display("Configuration error: {message}")]
    Configuration { message: String },

    /// A configuration store could not be read.
    #[display("Config store error: {message}")]
    ConfigStore { message: String },

    /// A value could not be serialized or deserialized.
    #[display("Serialization error: {message}")]
    Serialization { message: String },
}

impl core::error::Error for AdapterError {}
