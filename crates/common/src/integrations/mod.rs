//! Demand-source adapters.

pub mod freakout;

pub use freakout::FreakoutAdapter;
