//! Common Infrastructure Module
//!
//! Shared utilities and configuration for bitkey.
//!
//! This module contains:
//! - Configuration loading from environment variables
//! - Structured logging setup
//! - Common error types

pub mod config;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use config::{ConfigError, WalletConfig};
pub use error::{FormatError, Result, WalletError};
pub use logging::{
    init_from_config, init_logging, log_key_event, log_provider_response, log_sync_event,
    ErrorDetails, EventCategory, LogEvent, LogLevel, LoggingError,
};
