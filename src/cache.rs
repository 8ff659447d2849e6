//! Per-Network Chain Data Cache
//!
//! Each network has one [`CacheSlot`]. A slot is either empty or holds a
//! complete [`AddressSnapshot`]; [`NetworkCache::commit`] is the only way
//! to change it and replaces the whole snapshot at once. Slots are stored
//! as an array indexed by [`Network`], so an operation on one network has
//! no path to the other's data.

use chrono::{DateTime, Utc};

use crate::provider::{AddressSnapshot, TransactionSummary, Utxo};
use crate::types::Network;

/// Cached state of one network
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheSlot {
    snapshot: Option<AddressSnapshot>,
    synced_at: Option<DateTime<Utc>>,
}

impl CacheSlot {
    pub fn is_populated(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Cached balance in satoshis; `None` until the first sync
    pub fn balance(&self) -> Option<u64> {
        self.snapshot.as_ref().map(|s| s.balance)
    }

    /// Cached UTXOs; empty until the first sync
    pub fn utxos(&self) -> &[Utxo] {
        self.snapshot.as_ref().map(|s| s.utxos.as_slice()).unwrap_or_default()
    }

    /// Cached transactions; empty until the first sync
    pub fn transactions(&self) -> &[TransactionSummary] {
        self.snapshot
            .as_ref()
            .map(|s| s.transactions.as_slice())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Option<&AddressSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn synced_at(&self) -> Option<DateTime<Utc>> {
        self.synced_at
    }
}

/// Main and test slots
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkCache {
    slots: [CacheSlot; 2],
}

impl NetworkCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, network: Network) -> &CacheSlot {
        &self.slots[network.index()]
    }

    /// Replace a slot's contents with a fresh snapshot
    pub fn commit(&mut self, network: Network, snapshot: AddressSnapshot) {
        self.slots[network.index()] = CacheSlot {
            snapshot: Some(snapshot),
            synced_at: Some(Utc::now()),
        };
    }
}
