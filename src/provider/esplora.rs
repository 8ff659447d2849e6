//! Esplora API Provider
//!
//! Fetches address balance, UTXOs and transaction history from the
//! Esplora REST API. One [`EsploraClient`] per network; the provider
//! routes each request by [`Network`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};

use super::{AddressDataProvider, AddressSnapshot, ProviderError, TransactionSummary, Utxo};
use crate::common::{log_provider_response, WalletConfig};
use crate::types::Network;

/// Esplora API endpoints
pub const MAINNET_URL: &str = "https://blockstream.info/api";
pub const TESTNET_URL: &str = "https://blockstream.info/testnet/api";

/// Confirmed transactions per page of `/address/:a/txs/chain`
const CHAIN_PAGE_SIZE: usize = 25;

/// Upper bound on history pages fetched per sync
const MAX_HISTORY_PAGES: usize = 40;

/// Esplora HTTP client
#[derive(Debug, Clone)]
pub struct EsploraClient {
    client: Client,
    base_url: String,
}

impl EsploraClient {
    /// Create a new client with custom URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client with a request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client for Bitcoin mainnet
    pub fn new_mainnet() -> Self {
        Self::new(MAINNET_URL)
    }

    /// Create a client for Bitcoin testnet
    pub fn new_testnet() -> Self {
        Self::new(TESTNET_URL)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        let started = Instant::now();

        let resp = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                log_provider_response(&url, None, started.elapsed().as_millis() as u64);
                return Err(e.into());
            }
        };
        log_provider_response(
            &url,
            Some(resp.status().as_u16()),
            started.elapsed().as_millis() as u64,
        );

        if !resp.status().is_success() {
            return Err(ProviderError::Status {
                code: resp.status().as_u16(),
                url,
            });
        }
        Ok(resp)
    }

    /// Get current block height
    pub async fn get_block_height(&self) -> Result<u64, ProviderError> {
        self.get("/blocks/tip/height")
            .await?
            .text()
            .await?
            .trim()
            .parse()
            .map_err(|_| ProviderError::Parse("Failed to parse block height".to_string()))
    }

    /// Get confirmed plus mempool balance of an address
    pub async fn get_address_balance(&self, address: &str) -> Result<u64, ProviderError> {
        let stats: EsploraAddress = self
            .get(&format!("/address/{}", address))
            .await?
            .json()
            .await?;

        let funded = stats.chain_stats.funded_txo_sum as i128
            + stats.mempool_stats.funded_txo_sum as i128;
        let spent =
            stats.chain_stats.spent_txo_sum as i128 + stats.mempool_stats.spent_txo_sum as i128;

        u64::try_from(funded - spent).map_err(|_| {
            ProviderError::Inconsistent(format!(
                "address {} spends {} of {} funded sats",
                address, spent, funded
            ))
        })
    }

    /// Get address UTXOs
    pub async fn get_address_utxos(
        &self,
        address: &str,
        tip_height: u64,
    ) -> Result<Vec<Utxo>, ProviderError> {
        let utxos: Vec<EsploraUtxo> = self
            .get(&format!("/address/{}/utxo", address))
            .await?
            .json()
            .await?;

        Ok(utxos
            .into_iter()
            .map(|u| Utxo {
                confirmations: confirmations(tip_height, u.status.block_height),
                txid: u.txid,
                vout: u.vout,
                amount: u.value,
                block_height: u.status.block_height,
            })
            .collect())
    }

    /// Get full address history, newest first
    ///
    /// The first page holds mempool transactions plus the newest confirmed
    /// ones; older confirmed pages are requested until one comes back short.
    pub async fn get_address_txs(
        &self,
        address: &str,
    ) -> Result<Vec<TransactionSummary>, ProviderError> {
        let first: Vec<EsploraTx> = self
            .get(&format!("/address/{}/txs", address))
            .await?
            .json()
            .await?;

        let mut confirmed_in_page = first.iter().filter(|t| t.status.confirmed).count();
        let mut history: Vec<TransactionSummary> = first.into_iter().map(Into::into).collect();

        let mut pages = 1;
        while confirmed_in_page >= CHAIN_PAGE_SIZE && pages < MAX_HISTORY_PAGES {
            let last_seen = match history.last() {
                Some(tx) => tx.txid.clone(),
                None => break,
            };
            let page: Vec<EsploraTx> = self
                .get(&format!("/address/{}/txs/chain/{}", address, last_seen))
                .await?
                .json()
                .await?;

            confirmed_in_page = page.len();
            history.extend(page.into_iter().map(Into::into));
            pages += 1;
        }

        if history_truncated(pages, confirmed_in_page) {
            tracing::warn!(
                target: "bitkey::provider",
                address,
                "transaction history truncated at {} pages",
                MAX_HISTORY_PAGES
            );
        }

        Ok(history)
    }
}

fn confirmations(tip_height: u64, block_height: Option<u64>) -> u32 {
    match block_height {
        Some(height) => {
            let depth = tip_height.saturating_sub(height).saturating_add(1);
            u32::try_from(depth).unwrap_or(u32::MAX)
        }
        None => 0,
    }
}

/// Paging stopped at the cap while the last page was still full
fn history_truncated(pages: usize, confirmed_in_last_page: usize) -> bool {
    pages >= MAX_HISTORY_PAGES && confirmed_in_last_page >= CHAIN_PAGE_SIZE
}

/// Transaction status
#[derive(Debug, Clone, Deserialize)]
pub struct EsploraTxStatus {
    pub confirmed: bool,
    pub block_height: Option<u64>,
    pub block_hash: Option<String>,
    pub block_time: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct EsploraUtxo {
    txid: String,
    vout: u32,
    value: u64,
    status: EsploraTxStatus,
}

#[derive(Debug, Clone, Deserialize)]
struct EsploraTx {
    txid: String,
    status: EsploraTxStatus,
}

impl From<EsploraTx> for TransactionSummary {
    fn from(tx: EsploraTx) -> Self {
        Self {
            txid: tx.txid,
            confirmed: tx.status.confirmed,
            block_height: tx.status.block_height,
            block_time: tx.status.block_time,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EsploraStats {
    funded_txo_sum: u64,
    spent_txo_sum: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct EsploraAddress {
    chain_stats: EsploraStats,
    #[serde(default)]
    mempool_stats: EsploraStats,
}

/// [`AddressDataProvider`] backed by one Esplora endpoint per network
#[derive(Debug, Clone)]
pub struct EsploraProvider {
    main: EsploraClient,
    test: EsploraClient,
}

impl EsploraProvider {
    pub fn new(main: EsploraClient, test: EsploraClient) -> Self {
        Self { main, test }
    }

    /// Build both clients from configuration
    pub fn from_config(config: &WalletConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            main: EsploraClient::with_timeout(&config.main_api, config.timeout)?,
            test: EsploraClient::with_timeout(&config.test_api, config.timeout)?,
        })
    }

    pub fn client(&self, network: Network) -> &EsploraClient {
        match network {
            Network::Main => &self.main,
            Network::Test => &self.test,
        }
    }
}

impl Default for EsploraProvider {
    fn default() -> Self {
        Self::new(EsploraClient::new_mainnet(), EsploraClient::new_testnet())
    }
}

#[async_trait]
impl AddressDataProvider for EsploraProvider {
    async fn fetch(&self, network: Network, address: &str) -> Result<AddressSnapshot, ProviderError> {
        let client = self.client(network);

        let tip_height = client.get_block_height().await?;
        let (balance, utxos, transactions) = tokio::try_join!(
            client.get_address_balance(address),
            client.get_address_utxos(address, tip_height),
            client.get_address_txs(address),
        )?;

        Ok(AddressSnapshot {
            balance,
            utxos,
            transactions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_urls() {
        let mainnet = EsploraClient::new_mainnet();
        assert_eq!(mainnet.base_url(), MAINNET_URL);

        let testnet = EsploraClient::new_testnet();
        assert_eq!(testnet.base_url(), TESTNET_URL);

        let custom = EsploraClient::new("http://localhost:3002/");
        assert_eq!(custom.base_url(), "http://localhost:3002");
    }

    #[test]
    fn test_provider_routes_by_network() {
        let config = WalletConfig {
            main_api: "http://main.local/api".to_string(),
            test_api: "http://test.local/api".to_string(),
            ..WalletConfig::default()
        };
        let provider = EsploraProvider::from_config(&config).unwrap();
        assert_eq!(provider.client(Network::Main).base_url(), "http://main.local/api");
        assert_eq!(provider.client(Network::Test).base_url(), "http://test.local/api");
    }

    #[test]
    fn test_confirmations() {
        assert_eq!(confirmations(100, Some(100)), 1);
        assert_eq!(confirmations(100, Some(95)), 6);
        assert_eq!(confirmations(100, None), 0);
        assert_eq!(confirmations(u64::MAX, Some(0)), u32::MAX);
        assert_eq!(confirmations(u64::from(u32::MAX) + 10, Some(0)), u32::MAX);
    }

    #[test]
    fn test_history_truncation() {
        assert!(history_truncated(MAX_HISTORY_PAGES, CHAIN_PAGE_SIZE));
        assert!(!history_truncated(MAX_HISTORY_PAGES, CHAIN_PAGE_SIZE - 1));
        assert!(!history_truncated(MAX_HISTORY_PAGES, 0));
        assert!(!history_truncated(MAX_HISTORY_PAGES - 1, CHAIN_PAGE_SIZE));
    }

    #[test]
    fn test_parse_address_stats() {
        let json = r#"{
            "address": "1ELReFsTCUY2mfaDTy32qxYiT49z786eFg",
            "chain_stats": {"funded_txo_count": 2, "funded_txo_sum": 5000, "spent_txo_count": 1, "spent_txo_sum": 2000, "tx_count": 2},
            "mempool_stats": {"funded_txo_count": 0, "funded_txo_sum": 0, "spent_txo_count": 0, "spent_txo_sum": 0, "tx_count": 0}
        }"#;
        let stats: EsploraAddress = serde_json::from_str(json).unwrap();
        assert_eq!(stats.chain_stats.funded_txo_sum, 5000);
        assert_eq!(stats.chain_stats.spent_txo_sum, 2000);
    }

    #[test]
    fn test_parse_transaction_summary() {
        let json = r#"{
            "txid": "ab",
            "version": 1,
            "status": {"confirmed": true, "block_height": 700000, "block_hash": "00", "block_time": 1630000000}
        }"#;
        let tx: EsploraTx = serde_json::from_str(json).unwrap();
        let summary = TransactionSummary::from(tx);
        assert!(summary.confirmed);
        assert_eq!(summary.block_height, Some(700000));
        assert_eq!(summary.block_time, Some(1630000000));
    }
}
