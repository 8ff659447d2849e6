//! Single-Key Wallet
//!
//! [`Wallet`] owns one private key, derives its public key and addresses,
//! transcodes the key between formats, and keeps a per-network cache of
//! the address's chain data.
//!
//! ## Lifecycle
//!
//! 1. Construction resolves a [`KeySource`] once; any invalid input fails
//!    before a wallet exists
//! 2. Addresses and encodings are pure functions of the key
//! 3. `sync` / `sync_all` refresh the cache; `get_*` sync lazily the first
//!    time, plain accessors never touch the network
//!
//! Syncing takes `&mut self`, so two syncs of the same wallet cannot
//! overlap without external locking.

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::address::p2pkh;
use crate::cache::NetworkCache;
use crate::codec::{self, DecodedWif};
use crate::common::{log_key_event, log_sync_event, Result, WalletConfig, WalletError};
use crate::curve::CurvePoint;
use crate::keys::KeyMaterial;
use crate::provider::{
    AddressDataProvider, AddressSnapshot, EsploraProvider, TransactionSummary, Utxo,
};
use crate::types::{sats_to_btc_string, Network};

/// Where a wallet's key comes from
#[derive(Debug, Clone)]
pub enum KeySource {
    /// Fresh key from the OS RNG
    Generate,
    /// Existing key material
    FromKey(KeyMaterial),
    /// WIF text; its compression flag becomes the wallet default
    FromWif(String),
}

/// A single-keypair Bitcoin wallet
pub struct Wallet {
    key: KeyMaterial,
    /// Serialization default for public keys, WIF and addresses
    compressed: bool,
    /// Memoized addresses, indexed by network
    addresses: [OnceLock<String>; 2],
    cache: NetworkCache,
    provider: Arc<dyn AddressDataProvider>,
}

impl Wallet {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create a wallet; non-WIF sources default to compressed keys
    pub fn new(source: KeySource, provider: Arc<dyn AddressDataProvider>) -> Result<Self> {
        Self::with_compression(source, provider, true)
    }

    /// Create a wallet with an explicit compression default
    ///
    /// `compressed` is ignored for [`KeySource::FromWif`], which carries
    /// its own flag.
    pub fn with_compression(
        source: KeySource,
        provider: Arc<dyn AddressDataProvider>,
        compressed: bool,
    ) -> Result<Self> {
        let (key, compressed, origin) = match source {
            KeySource::Generate => (KeyMaterial::generate(), compressed, "generated"),
            KeySource::FromKey(key) => (key, compressed, "imported"),
            KeySource::FromWif(text) => {
                let DecodedWif {
                    key, compressed, ..
                } = codec::decode_wif(&text)?;
                (key, compressed, "imported from wif")
            }
        };

        Ok(Self::assemble(key, compressed, provider, origin))
    }

    fn assemble(
        key: KeyMaterial,
        compressed: bool,
        provider: Arc<dyn AddressDataProvider>,
        origin: &str,
    ) -> Self {
        let wallet = Self {
            key,
            compressed,
            addresses: Default::default(),
            cache: NetworkCache::new(),
            provider,
        };
        log_key_event(origin, wallet.address());
        wallet
    }

    /// Create a wallet backed by Esplora endpoints from configuration
    pub fn from_config(source: KeySource, config: &WalletConfig) -> Result<Self> {
        let provider = EsploraProvider::from_config(config)?;
        Self::with_compression(source, Arc::new(provider), config.compressed)
    }

    /// Create a wallet, optionally syncing mainnet before returning
    pub async fn open(
        source: KeySource,
        provider: Arc<dyn AddressDataProvider>,
        sync: bool,
    ) -> Result<Self> {
        let mut wallet = Self::new(source, provider)?;
        if sync {
            wallet.sync(Network::Main).await?;
        }
        Ok(wallet)
    }

    pub fn generate(provider: Arc<dyn AddressDataProvider>) -> Self {
        Self::assemble(KeyMaterial::generate(), true, provider, "generated")
    }

    pub fn from_key(key: KeyMaterial, provider: Arc<dyn AddressDataProvider>) -> Result<Self> {
        Self::new(KeySource::FromKey(key), provider)
    }

    pub fn from_wif(wif: &str, provider: Arc<dyn AddressDataProvider>) -> Result<Self> {
        Self::new(KeySource::FromWif(wif.to_string()), provider)
    }

    pub fn from_hex(hex: &str, provider: Arc<dyn AddressDataProvider>) -> Result<Self> {
        Self::from_key(codec::decode_hex(hex)?, provider)
    }

    pub fn from_der(der: &[u8], provider: Arc<dyn AddressDataProvider>) -> Result<Self> {
        Self::from_key(codec::decode_der(der)?, provider)
    }

    pub fn from_pem(pem: &str, provider: Arc<dyn AddressDataProvider>) -> Result<Self> {
        Self::from_key(codec::decode_pem(pem)?, provider)
    }

    // ========================================================================
    // Keys and Addresses
    // ========================================================================

    pub fn key(&self) -> &KeyMaterial {
        &self.key
    }

    pub fn public_point(&self) -> &CurvePoint {
        self.key.public_point()
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// SEC1 public key, 33 bytes compressed or 65 uncompressed
    pub fn public_key(&self, compressed: bool) -> Vec<u8> {
        self.key.public_point().serialize(compressed)
    }

    /// Mainnet address
    pub fn address(&self) -> &str {
        self.address_on(Network::Main)
    }

    /// Testnet address
    pub fn test_address(&self) -> &str {
        self.address_on(Network::Test)
    }

    /// Address on a network under the wallet's compression default
    pub fn address_on(&self, network: Network) -> &str {
        self.addresses[network.index()].get_or_init(|| self.address_for(network, self.compressed))
    }

    /// Address for any network and key encoding
    pub fn address_for(&self, network: Network, compressed: bool) -> String {
        p2pkh(&self.public_key(compressed), network.address_version())
    }

    // ========================================================================
    // Encodings
    // ========================================================================

    /// Mainnet WIF under the wallet's compression default
    pub fn to_wif(&self) -> String {
        self.to_wif_with(Network::Main, self.compressed)
    }

    pub fn to_wif_with(&self, network: Network, compressed: bool) -> String {
        codec::encode_wif(&self.key, network, compressed)
    }

    pub fn to_hex(&self) -> String {
        codec::encode_hex(&self.key)
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        codec::encode_der(&self.key)
    }

    pub fn to_pem(&self) -> Result<String> {
        codec::encode_pem(&self.key)
    }

    // ========================================================================
    // Chain Data
    // ========================================================================

    /// Refresh one network's cache
    ///
    /// On error the cached data for `network` is left exactly as it was.
    pub async fn sync(&mut self, network: Network) -> Result<()> {
        let snapshot = self.fetch(network).await?;
        self.cache.commit(network, snapshot);
        Ok(())
    }

    /// Refresh both networks concurrently
    ///
    /// Each network commits independently: a failure on one does not stop
    /// the other from updating. The first error is returned.
    pub async fn sync_all(&mut self) -> Result<()> {
        let (main, test) = tokio::join!(self.fetch(Network::Main), self.fetch(Network::Test));

        let mut first_error: Option<WalletError> = None;
        for (network, result) in [(Network::Main, main), (Network::Test, test)] {
            match result {
                Ok(snapshot) => self.cache.commit(network, snapshot),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn fetch(&self, network: Network) -> Result<AddressSnapshot> {
        let address = self.address_on(network);
        let started = Instant::now();

        let result = match self.provider.fetch(network, address).await {
            Ok(snapshot) => snapshot.validate().map(|_| snapshot),
            Err(e) => Err(e),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(s) => log_sync_event(
                network,
                address,
                elapsed_ms,
                Ok((s.balance, s.utxos.len(), s.transactions.len())),
            ),
            Err(e) => log_sync_event(network, address, elapsed_ms, Err(&e.to_string())),
        }

        Ok(result?)
    }

    async fn ensure_synced(&mut self, network: Network) -> Result<()> {
        if !self.cache.slot(network).is_populated() {
            tracing::debug!(target: "bitkey::wallet", %network, "cache empty, syncing");
            self.sync(network).await?;
        }
        Ok(())
    }

    /// Balance in satoshis, syncing first if never synced
    pub async fn get_balance(&mut self, network: Network) -> Result<u64> {
        self.ensure_synced(network).await?;
        Ok(self.cache.slot(network).balance().unwrap_or_default())
    }

    /// UTXOs, syncing first if never synced
    pub async fn get_utxos(&mut self, network: Network) -> Result<&[Utxo]> {
        self.ensure_synced(network).await?;
        Ok(self.cache.slot(network).utxos())
    }

    /// Transactions, syncing first if never synced
    pub async fn get_transactions(&mut self, network: Network) -> Result<&[TransactionSummary]> {
        self.ensure_synced(network).await?;
        Ok(self.cache.slot(network).transactions())
    }

    /// Cached balance; `None` until synced
    pub fn balance(&self, network: Network) -> Option<u64> {
        self.cache.slot(network).balance()
    }

    /// Cached UTXOs; empty until synced
    pub fn utxos(&self, network: Network) -> &[Utxo] {
        self.cache.slot(network).utxos()
    }

    /// Cached transactions; empty until synced
    pub fn transactions(&self, network: Network) -> &[TransactionSummary] {
        self.cache.slot(network).transactions()
    }

    /// Cached balance formatted in BTC
    pub fn balance_as_btc(&self, network: Network) -> Option<String> {
        self.balance(network).map(sats_to_btc_string)
    }

    pub fn last_synced(&self, network: Network) -> Option<DateTime<Utc>> {
        self.cache.slot(network).synced_at()
    }

    pub fn cache(&self) -> &NetworkCache {
        &self.cache
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .field("test_address", &self.test_address())
            .field("compressed", &self.compressed)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
