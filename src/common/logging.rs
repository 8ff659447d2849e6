//! Structured Logging for bitkey
//!
//! Provides structured logging with:
//! - JSON output for log aggregation services
//! - Pretty output for development
//! - One structured event per network sync
//!
//! Secret key material is never passed to any function in this module.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bitkey::common::logging::{init_logging, LogLevel};
//!
//! init_logging(LogLevel::Info, false)?;
//! ```

use serde::Serialize;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::types::Network;

// ============================================================================
// Log Levels
// ============================================================================

/// Application log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl From<&str> for LogLevel {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

// ============================================================================
// Structured Event Types
// ============================================================================

/// Event categories for structured logging
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Key generation and import
    Key,
    /// Cache synchronisation
    Sync,
    /// Chain data provider calls
    Provider,
    /// System events (startup, config)
    System,
    /// Error events
    Error,
}

/// Structured log event
#[derive(Debug, Serialize)]
pub struct LogEvent {
    /// Event timestamp (ISO 8601)
    pub timestamp: String,
    /// Log level
    pub level: String,
    /// Event category
    pub category: EventCategory,
    /// Human-readable message
    pub message: String,
    /// Additional structured data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Duration in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

/// Error details for error events
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl LogEvent {
    /// Create a new log event
    pub fn new(level: LogLevel, category: EventCategory, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level: level.as_filter().to_uppercase(),
            category,
            message: message.into(),
            data: None,
            duration_ms: None,
            error: None,
        }
    }

    /// Add structured data
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Add duration
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Add error details
    pub fn with_error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.error = Some(ErrorDetails {
            code: code.into(),
            message: message.into(),
        });
        self
    }

    /// Serialize this event to JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                "{{\"error\": \"failed to serialize log\", \"message\": \"{}\"}}",
                self.message
            )
        })
    }
}

// ============================================================================
// Event Logging
// ============================================================================

/// Log the outcome of a cache sync for one network
pub fn log_sync_event(
    network: Network,
    address: &str,
    duration_ms: u64,
    outcome: std::result::Result<(u64, usize, usize), &str>,
) {
    match outcome {
        Ok((balance, utxos, transactions)) => {
            let event = LogEvent::new(LogLevel::Info, EventCategory::Sync, "sync completed")
                .with_duration(duration_ms)
                .with_data(serde_json::json!({
                    "network": network.as_str(),
                    "address": address,
                    "balance_sats": balance,
                    "utxo_count": utxos,
                    "tx_count": transactions,
                }));
            tracing::info!(target: "bitkey::sync", "{}", event.to_json());
        }
        Err(err) => {
            let event = LogEvent::new(LogLevel::Warn, EventCategory::Sync, "sync failed")
                .with_duration(duration_ms)
                .with_data(serde_json::json!({
                    "network": network.as_str(),
                    "address": address,
                }))
                .with_error("NETWORK_ERROR", err);
            tracing::warn!(target: "bitkey::sync", "{}", event.to_json());
        }
    }
}

/// Log one provider HTTP round trip
///
/// `status` is `None` when no response arrived.
pub fn log_provider_response(url: &str, status: Option<u16>, duration_ms: u64) {
    let level = match status {
        Some(code) if code < 400 => LogLevel::Debug,
        _ => LogLevel::Warn,
    };

    let message = match status {
        Some(code) => format!("GET {} -> {}", url, code),
        None => format!("GET {} -> no response", url),
    };
    let event = LogEvent::new(level, EventCategory::Provider, message)
        .with_duration(duration_ms)
        .with_data(serde_json::json!({
            "url": url,
            "status": status,
        }));

    match level {
        LogLevel::Warn => tracing::warn!(target: "bitkey::provider", "{}", event.to_json()),
        _ => tracing::debug!(target: "bitkey::provider", "{}", event.to_json()),
    }
}

/// Log key creation; only the public address is recorded
pub fn log_key_event(origin: &str, address: &str) {
    let event = LogEvent::new(LogLevel::Debug, EventCategory::Key, format!("key {}", origin))
        .with_data(serde_json::json!({
            "origin": origin,
            "address": address,
        }));
    tracing::debug!(target: "bitkey::wallet", "{}", event.to_json());
}

// ============================================================================
// Initialization
// ============================================================================

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Minimum log level to output
/// * `json_format` - Use JSON format
pub fn init_logging(level: LogLevel, json_format: bool) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "bitkey={},reqwest={}",
            level.as_filter(),
            LogLevel::Warn.as_filter()
        ))
    });

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .map_err(|e| LoggingError::InitFailed(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
            .map_err(|e| LoggingError::InitFailed(e.to_string()))?;
    }

    let event = LogEvent::new(LogLevel::Info, EventCategory::System, "logging initialized")
        .with_data(serde_json::json!({
            "level": level.as_filter(),
            "json": json_format,
        }));
    tracing::info!(target: "bitkey::system", "{}", event.to_json());

    Ok(())
}

/// Initialize logging from WalletConfig
pub fn init_from_config(config: &super::config::WalletConfig) -> Result<(), LoggingError> {
    init_logging(LogLevel::from(config.log_level.as_str()), config.log_json)
}

/// Logging errors
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to initialize logging: {0}")]
    InitFailed(String),
}
