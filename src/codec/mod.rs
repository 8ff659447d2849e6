//! Private Key Codecs
//!
//! Stateless transcoders between [`KeyMaterial`] and its external formats:
//! - raw hex (64 lowercase characters)
//! - SEC1 `ECPrivateKey` DER and PEM ([`asn1`])
//! - Wallet Import Format ([`wif`])
//!
//! Every decoder validates fully before returning, so a failed import
//! never yields partially initialised key material.

pub mod asn1;
pub mod wif;

use bitcoin::base58;
use bitcoin::hashes::{sha256d, Hash};

use crate::common::{FormatError, Result};
use crate::keys::{KeyMaterial, SCALAR_LEN};

pub use asn1::{decode_der, decode_pem, encode_der, encode_pem, PEM_LABEL};
pub use wif::{decode_wif, encode_wif, DecodedWif};

/// Length of a base58check checksum
pub const CHECKSUM_LEN: usize = 4;

// ============================================================================
// Hex
// ============================================================================

/// Encode the scalar as 64 lowercase hex characters
pub fn encode_hex(key: &KeyMaterial) -> String {
    hex::encode(key.secret_bytes())
}

/// Decode a 64 character hex scalar
pub fn decode_hex(text: &str) -> Result<KeyMaterial> {
    if text.len() != SCALAR_LEN * 2 {
        return Err(FormatError::InvalidLength {
            expected: SCALAR_LEN * 2,
            actual: text.len(),
        }
        .into());
    }
    let bytes = hex::decode(text).map_err(|_| FormatError::InvalidHex)?;
    KeyMaterial::from_bytes(&bytes)
}

// ============================================================================
// Base58Check
// ============================================================================

/// First four bytes of double SHA-256
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = sha256d::Hash::hash(data).to_byte_array();
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Append the checksum and base58-encode
pub fn encode_check(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(payload));
    base58::encode(&data)
}

/// Base58-decode without interpreting the bytes
pub fn decode_base58(text: &str) -> std::result::Result<Vec<u8>, FormatError> {
    base58::decode(text).map_err(|_| FormatError::Base58)
}

/// Split decoded bytes into payload and checksum, verifying the latter
pub fn verify_checksum(data: &[u8]) -> std::result::Result<&[u8], FormatError> {
    if data.len() < CHECKSUM_LEN {
        return Err(FormatError::InvalidLength {
            expected: CHECKSUM_LEN,
            actual: data.len(),
        });
    }
    let (payload, check) = data.split_at(data.len() - CHECKSUM_LEN);
    if checksum(payload) != check {
        return Err(FormatError::BadChecksum);
    }
    Ok(payload)
}
