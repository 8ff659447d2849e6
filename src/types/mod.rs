//! Shared Types Module
//!
//! Data types shared across bitkey.

pub mod network;
pub mod units;

// Re-exports for convenience
pub use network::Network;
pub use units::{btc_to_sats, parse_sats, sats_to_btc_string, sats_to_display, SATS_PER_BTC};
