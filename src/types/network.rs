//! Network Tag
//!
//! Selects the version bytes used for address and WIF encoding, and which
//! cache slot a sync reads or writes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::config::ConfigError;

/// P2PKH address version bytes
pub const MAIN_ADDRESS_VERSION: u8 = 0x00;
pub const TEST_ADDRESS_VERSION: u8 = 0x6f;

/// WIF private key version bytes
pub const MAIN_WIF_VERSION: u8 = 0x80;
pub const TEST_WIF_VERSION: u8 = 0xef;

/// Bitcoin network
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Main,
    Test,
}

impl Network {
    /// Both networks, in slot order
    pub const ALL: [Network; 2] = [Network::Main, Network::Test];

    /// Slot index used by per-network storage
    pub fn index(self) -> usize {
        match self {
            Network::Main => 0,
            Network::Test => 1,
        }
    }

    /// Version byte prefixed to P2PKH addresses
    pub fn address_version(self) -> u8 {
        match self {
            Network::Main => MAIN_ADDRESS_VERSION,
            Network::Test => TEST_ADDRESS_VERSION,
        }
    }

    /// Version byte prefixed to WIF private keys
    pub fn wif_version(self) -> u8 {
        match self {
            Network::Main => MAIN_WIF_VERSION,
            Network::Test => TEST_WIF_VERSION,
        }
    }

    pub fn from_address_version(version: u8) -> Option<Self> {
        match version {
            MAIN_ADDRESS_VERSION => Some(Network::Main),
            TEST_ADDRESS_VERSION => Some(Network::Test),
            _ => None,
        }
    }

    pub fn from_wif_version(version: u8) -> Option<Self> {
        match version {
            MAIN_WIF_VERSION => Some(Network::Main),
            TEST_WIF_VERSION => Some(Network::Test),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Test => "test",
        }
    }

    /// Equivalent network in the `bitcoin` crate
    pub fn bitcoin_network(self) -> bitcoin::Network {
        match self {
            Network::Main => bitcoin::Network::Bitcoin,
            Network::Test => bitcoin::Network::Testnet,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "main" | "mainnet" | "bitcoin" => Ok(Network::Main),
            "test" | "testnet" => Ok(Network::Test),
            _ => Err(ConfigError::InvalidValue(
                "network".to_string(),
                format!("unknown network: {}", s),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_parsing() {
        assert_eq!("main".parse::<Network>().unwrap(), Network::Main);
        assert_eq!("Mainnet".parse::<Network>().unwrap(), Network::Main);
        assert_eq!("testnet".parse::<Network>().unwrap(), Network::Test);
        assert!("regtest".parse::<Network>().is_err());
    }

    #[test]
    fn test_version_bytes() {
        for network in Network::ALL {
            assert_eq!(Network::from_address_version(network.address_version()), Some(network));
            assert_eq!(Network::from_wif_version(network.wif_version()), Some(network));
        }
        assert_eq!(Network::from_wif_version(0x00), None);
        assert_eq!(Network::from_address_version(0x80), None);
    }

    #[test]
    fn test_slot_indices_are_distinct() {
        assert_ne!(Network::Main.index(), Network::Test.index());
        assert_eq!(Network::ALL[Network::Test.index()], Network::Test);
    }
}
