//! Common Error Types for bitkey
//!
//! Provides unified error handling across all modules.
//!
//! Three classes of failure reach callers:
//! - [`FormatError`] for malformed hex/DER/PEM/WIF/address input
//! - [`WalletError::InvalidKey`] for scalars outside `[1, n-1]`
//! - [`WalletError::Network`] when the chain data provider fails

use thiserror::Error;

use crate::provider::ProviderError;

/// Malformed external input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid hex encoding")]
    InvalidHex,

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid base58 character")]
    Base58,

    #[error("checksum mismatch")]
    BadChecksum,

    #[error("unrecognized version byte: 0x{0:02x}")]
    UnknownVersion(u8),

    #[error("invalid compression flag: 0x{0:02x}")]
    InvalidCompressionFlag(u8),

    #[error("malformed ASN.1 key structure: {0}")]
    Asn1(String),

    #[error("malformed PEM: {0}")]
    Pem(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}

/// Root error type for bitkey
#[derive(Debug, Error)]
pub enum WalletError {
    /// Malformed key or address input
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Scalar out of range or curve validation failure
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Chain data provider failure
    #[error("network error: {0}")]
    Network(#[from] ProviderError),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),

    /// Logging errors
    #[error("logging error: {0}")]
    Logging(#[from] super::logging::LoggingError),
}

impl WalletError {
    /// Create an invalid key error
    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// Check if this is a retryable error
    ///
    /// Nothing in this crate retries; the flag is for callers that do.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WalletError::Network(e) if e.is_transient())
    }

    /// Stable error code for logs and callers
    pub fn error_code(&self) -> &'static str {
        match self {
            WalletError::Format(_) => "FORMAT_ERROR",
            WalletError::InvalidKey(_) => "INVALID_KEY",
            WalletError::Network(_) => "NETWORK_ERROR",
            WalletError::Config(_) => "CONFIG_ERROR",
            WalletError::Logging(_) => "LOGGING_ERROR",
        }
    }

    /// True for the format-class errors (malformed input)
    pub fn is_format(&self) -> bool {
        matches!(self, WalletError::Format(_))
    }
}

/// Result type alias using WalletError
pub type Result<T> = std::result::Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = WalletError::invalid_key("scalar is zero");
        assert!(err.to_string().contains("scalar is zero"));
        assert_eq!(err.error_code(), "INVALID_KEY");
    }

    #[test]
    fn test_format_error_conversion() {
        let err: WalletError = FormatError::BadChecksum.into();
        assert!(err.is_format());
        assert_eq!(err.error_code(), "FORMAT_ERROR");
        assert_eq!(err.to_string(), "format error: checksum mismatch");
    }

    #[test]
    fn test_retryable_errors() {
        let transient: WalletError = ProviderError::Status {
            code: 503,
            url: "https://example.invalid/address".to_string(),
        }
        .into();
        assert!(transient.is_retryable());

        let parse: WalletError = ProviderError::Parse("bad json".to_string()).into();
        assert!(!parse.is_retryable());

        assert!(!WalletError::from(FormatError::InvalidHex).is_retryable());
    }
}
