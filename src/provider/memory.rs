//! In-Memory Provider
//!
//! Serves fixed snapshots keyed by network and address. Unknown addresses
//! get an empty snapshot, the same as an unused address on a real chain.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{AddressDataProvider, AddressSnapshot, ProviderError};
use crate::types::Network;

/// In-memory snapshot provider
///
/// Clones share the same snapshots and counters.
#[derive(Clone, Default)]
pub struct StaticProvider {
    snapshots: Arc<RwLock<HashMap<(Network, String), AddressSnapshot>>>,
    fetches: Arc<AtomicUsize>,
    offline: Arc<AtomicBool>,
}

impl StaticProvider {
    /// Create a new empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the snapshot returned for an address
    pub async fn insert(&self, network: Network, address: &str, snapshot: AddressSnapshot) {
        self.snapshots
            .write()
            .await
            .insert((network, address.to_string()), snapshot);
    }

    /// Make every fetch fail until switched back
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of fetches served or refused so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddressDataProvider for StaticProvider {
    async fn fetch(&self, network: Network, address: &str) -> Result<AddressSnapshot, ProviderError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.offline.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable(format!(
                "static provider offline ({})",
                network
            )));
        }

        let snapshots = self.snapshots.read().await;
        Ok(snapshots
            .get(&(network, address.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
