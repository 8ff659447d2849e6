//! Wallet Import Format
//!
//! ```text
//! base58( version || scalar(32) || [0x01 if compressed] || checksum(4) )
//! ```
//!
//! Version `0x80` is mainnet and `0xef` testnet. Uncompressed keys encode
//! to 51 characters, compressed keys to 52.

use crate::codec::{checksum, decode_base58, encode_check, CHECKSUM_LEN};
use crate::common::{FormatError, Result};
use crate::keys::{KeyMaterial, SCALAR_LEN};
use crate::types::Network;

/// Trailing marker for compressed public keys
pub const COMPRESSED_FLAG: u8 = 0x01;

/// Decoded length of an uncompressed WIF, checksum included
pub const UNCOMPRESSED_WIF_LEN: usize = 1 + SCALAR_LEN + CHECKSUM_LEN;

/// Decoded length of a compressed WIF, checksum included
pub const COMPRESSED_WIF_LEN: usize = UNCOMPRESSED_WIF_LEN + 1;

/// Everything a WIF string carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedWif {
    pub key: KeyMaterial,
    pub network: Network,
    pub compressed: bool,
}

/// Encode a scalar as WIF
pub fn encode_wif(key: &KeyMaterial, network: Network, compressed: bool) -> String {
    let mut payload = Vec::with_capacity(COMPRESSED_WIF_LEN - CHECKSUM_LEN);
    payload.push(network.wif_version());
    payload.extend_from_slice(&key.secret_bytes());
    if compressed {
        payload.push(COMPRESSED_FLAG);
    }
    encode_check(&payload)
}

/// Decode a WIF string
///
/// Checks run in order: base58 alphabet, decoded length, checksum,
/// compression marker, version byte, scalar range.
pub fn decode_wif(text: &str) -> Result<DecodedWif> {
    let data = decode_base58(text)?;

    if data.len() != UNCOMPRESSED_WIF_LEN && data.len() != COMPRESSED_WIF_LEN {
        return Err(FormatError::InvalidLength {
            expected: UNCOMPRESSED_WIF_LEN,
            actual: data.len(),
        }
        .into());
    }

    let (payload, check) = data.split_at(data.len() - CHECKSUM_LEN);
    if checksum(payload) != check {
        return Err(FormatError::BadChecksum.into());
    }

    let compressed = payload.len() == COMPRESSED_WIF_LEN - CHECKSUM_LEN;
    if compressed && payload[payload.len() - 1] != COMPRESSED_FLAG {
        return Err(FormatError::InvalidCompressionFlag(payload[payload.len() - 1]).into());
    }

    let network =
        Network::from_wif_version(payload[0]).ok_or(FormatError::UnknownVersion(payload[0]))?;

    let key = KeyMaterial::from_bytes(&payload[1..1 + SCALAR_LEN])?;

    Ok(DecodedWif {
        key,
        network,
        compressed,
    })
}
