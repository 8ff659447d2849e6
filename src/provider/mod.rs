//! Chain Data Providers
//!
//! The wallet never talks to the network directly. It asks an
//! [`AddressDataProvider`] for one [`AddressSnapshot`] per sync and stores
//! the whole snapshot or nothing.
//!
//! Implementations:
//! - [`EsploraProvider`] - Esplora REST API (blockstream.info or self-hosted)
//! - [`StaticProvider`] - In-memory snapshots for offline use and testing

pub mod esplora;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Network;

pub use esplora::{EsploraClient, EsploraProvider};
pub use memory::StaticProvider;

/// Provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {code} from {url}")]
    Status { code: u16, url: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("inconsistent provider data: {0}")]
    Inconsistent(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Whether a later attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Http(e) => e.is_timeout() || e.is_connect(),
            ProviderError::Status { code, .. } => *code == 429 || *code >= 500,
            ProviderError::Unavailable(_) => true,
            ProviderError::Parse(_) | ProviderError::Inconsistent(_) => false,
        }
    }
}

/// Unspent transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub txid: String,
    pub vout: u32,
    /// Value in satoshis
    pub amount: u64,
    pub confirmations: u32,
    pub block_height: Option<u64>,
}

/// Transaction touching the wallet address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub txid: String,
    pub confirmed: bool,
    pub block_height: Option<u64>,
    pub block_time: Option<u64>,
}

/// Everything one sync fetches for an address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSnapshot {
    /// Balance in satoshis
    pub balance: u64,
    pub utxos: Vec<Utxo>,
    pub transactions: Vec<TransactionSummary>,
}

impl AddressSnapshot {
    /// Reject snapshots that cannot be true
    ///
    /// Every UTXO must be unique by outpoint, and their total may not
    /// overflow.
    pub fn validate(&self) -> Result<(), ProviderError> {
        let mut seen = std::collections::HashSet::new();
        let mut total: u64 = 0;

        for utxo in &self.utxos {
            if !seen.insert((utxo.txid.as_str(), utxo.vout)) {
                return Err(ProviderError::Inconsistent(format!(
                    "duplicate utxo {}:{}",
                    utxo.txid, utxo.vout
                )));
            }
            total = total.checked_add(utxo.amount).ok_or_else(|| {
                ProviderError::Inconsistent("utxo total overflows".to_string())
            })?;
        }

        Ok(())
    }

    /// Sum of UTXO amounts
    pub fn utxo_total(&self) -> u64 {
        self.utxos.iter().map(|u| u.amount).sum()
    }
}

/// Source of balance, UTXO and transaction data for an address
///
/// One call must return a complete snapshot or an error; the wallet
/// never combines results from separate calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressDataProvider: Send + Sync {
    /// Fetch the current state of `address` on `network`
    async fn fetch(&self, network: Network, address: &str) -> Result<AddressSnapshot, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utxo(txid: &str, vout: u32, amount: u64) -> Utxo {
        Utxo {
            txid: txid.to_string(),
            vout,
            amount,
            confirmations: 1,
            block_height: Some(100),
        }
    }

    #[test]
    fn test_snapshot_validation() {
        let snapshot = AddressSnapshot {
            balance: 3000,
            utxos: vec![utxo("aa", 0, 1000), utxo("aa", 1, 2000)],
            transactions: vec![],
        };
        assert!(snapshot.validate().is_ok());
        assert_eq!(snapshot.utxo_total(), 3000);

        let duplicate = AddressSnapshot {
            balance: 2000,
            utxos: vec![utxo("aa", 0, 1000), utxo("aa", 0, 1000)],
            transactions: vec![],
        };
        assert!(matches!(
            duplicate.validate(),
            Err(ProviderError::Inconsistent(_))
        ));

        let overflow = AddressSnapshot {
            balance: 0,
            utxos: vec![utxo("aa", 0, u64::MAX), utxo("bb", 0, 1)],
            transactions: vec![],
        };
        assert!(overflow.validate().is_err());
    }

    #[test]
    fn test_transient_classification() {
        assert!(ProviderError::Status { code: 503, url: String::new() }.is_transient());
        assert!(ProviderError::Status { code: 429, url: String::new() }.is_transient());
        assert!(!ProviderError::Status { code: 404, url: String::new() }.is_transient());
        assert!(!ProviderError::Parse("x".into()).is_transient());
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = AddressSnapshot {
            balance: 1000,
            utxos: vec![utxo("aa", 0, 1000)],
            transactions: vec![],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: AddressSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
