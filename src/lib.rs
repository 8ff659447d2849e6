//! bitkey - Single-Keypair Bitcoin Wallet
//!
//! One secp256k1 private key, the addresses it controls on mainnet and
//! testnet, and a per-network cache of their chain data.
//!
//! ## Components
//!
//! 1. **Keys** - [`KeyMaterial`] (scalar) and [`CurvePoint`] (public point)
//! 2. **Codec** - hex, SEC1 DER/PEM and WIF import/export
//! 3. **Addresses** - legacy P2PKH derivation per network
//! 4. **Providers** - Esplora REST or in-memory snapshots
//! 5. **Wallet** - composition of the above with a [`NetworkCache`]
//!
//! ## Example
//!
//! ```no_run
//! use bitkey::{KeySource, Network, Wallet, WalletConfig};
//!
//! # async fn run() -> bitkey::Result<()> {
//! let config = WalletConfig::from_env()?;
//! let mut wallet = Wallet::from_config(KeySource::Generate, &config)?;
//! println!("{} {}", wallet.address(), wallet.to_wif());
//! let balance = wallet.get_balance(Network::Main).await?;
//! # let _ = balance;
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod cache;
pub mod codec;
pub mod common;
pub mod curve;
pub mod keys;
pub mod provider;
pub mod types;
pub mod wallet;

// Re-exports: keys and codecs
pub use curve::CurvePoint;
pub use keys::KeyMaterial;
pub use codec::{
    decode_der, decode_hex, decode_pem, decode_wif, encode_der, encode_hex, encode_pem,
    encode_wif, DecodedWif,
};

// Re-exports: addresses
pub use address::{decode_address, derive_address};

// Re-exports: wallet and cache
pub use cache::{CacheSlot, NetworkCache};
pub use wallet::{KeySource, Wallet};

// Re-exports: chain data
pub use provider::{
    AddressDataProvider, AddressSnapshot, EsploraClient, EsploraProvider, ProviderError,
    StaticProvider, TransactionSummary, Utxo,
};

// Re-exports: common
pub use common::{ConfigError, FormatError, Result, WalletConfig, WalletError};
pub use types::Network;
