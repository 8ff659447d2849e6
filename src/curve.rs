//! secp256k1 Curve Points
//!
//! A [`CurvePoint`] is always a valid, finite point: the underlying
//! `secp256k1::PublicKey` cannot represent the point at infinity.

use secp256k1::PublicKey;
use std::fmt;

use crate::common::FormatError;

/// Length of a compressed SEC1 point
pub const COMPRESSED_LEN: usize = 33;

/// Length of an uncompressed SEC1 point
pub const UNCOMPRESSED_LEN: usize = 65;

/// Immutable point on the secp256k1 curve
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurvePoint(PublicKey);

impl CurvePoint {
    pub(crate) fn from_public_key(key: PublicKey) -> Self {
        Self(key)
    }

    /// Parse a SEC1 encoded point (33 or 65 bytes)
    pub fn from_sec1(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() != COMPRESSED_LEN && bytes.len() != UNCOMPRESSED_LEN {
            return Err(FormatError::InvalidPublicKey(format!(
                "expected {} or {} bytes, got {}",
                COMPRESSED_LEN,
                UNCOMPRESSED_LEN,
                bytes.len()
            )));
        }
        PublicKey::from_slice(bytes)
            .map(Self)
            .map_err(|e| FormatError::InvalidPublicKey(e.to_string()))
    }

    /// Affine x coordinate, big-endian
    pub fn x(&self) -> [u8; 32] {
        let mut x = [0u8; 32];
        x.copy_from_slice(&self.0.serialize_uncompressed()[1..33]);
        x
    }

    /// Affine y coordinate, big-endian
    pub fn y(&self) -> [u8; 32] {
        let mut y = [0u8; 32];
        y.copy_from_slice(&self.0.serialize_uncompressed()[33..65]);
        y
    }

    pub fn has_even_y(&self) -> bool {
        self.y()[31] & 1 == 0
    }

    /// `0x02`/`0x03` parity prefix followed by x
    pub fn compressed(&self) -> [u8; COMPRESSED_LEN] {
        self.0.serialize()
    }

    /// `0x04` prefix followed by x and y
    pub fn uncompressed(&self) -> [u8; UNCOMPRESSED_LEN] {
        self.0.serialize_uncompressed()
    }

    /// SEC1 encoding, 33 or 65 bytes
    pub fn serialize(&self, compressed: bool) -> Vec<u8> {
        if compressed {
            self.compressed().to_vec()
        } else {
            self.uncompressed().to_vec()
        }
    }

    /// The wrapped `secp256k1` key
    pub fn as_public_key(&self) -> &PublicKey {
        &self.0
    }
}

impl fmt::Debug for CurvePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurvePoint")
            .field("x", &hex::encode(self.x()))
            .field("y", &hex::encode(self.y()))
            .finish()
    }
}

impl fmt::Display for CurvePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.compressed()))
    }
}
