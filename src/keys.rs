//! Key Material
//!
//! Owns the secret scalar and its public point. The scalar is always in
//! `[1, n-1]`; `secp256k1::SecretKey` rejects anything else on import.

use rand::rngs::OsRng;
use secp256k1::{PublicKey, SecretKey, SECP256K1};
use std::fmt;

use crate::common::{Result, WalletError};
use crate::curve::CurvePoint;

/// Length of a serialized scalar
pub const SCALAR_LEN: usize = 32;

/// A secp256k1 private scalar and the point it derives
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    secret: SecretKey,
    point: CurvePoint,
}

impl KeyMaterial {
    /// Generate a fresh key from the operating system RNG
    pub fn generate() -> Self {
        Self::from_secret(SecretKey::new(&mut OsRng))
    }

    /// Adopt a 32-byte big-endian scalar
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SCALAR_LEN {
            return Err(WalletError::invalid_key(format!(
                "scalar must be {} bytes, got {}",
                SCALAR_LEN,
                bytes.len()
            )));
        }
        let secret = SecretKey::from_slice(bytes)
            .map_err(|_| WalletError::invalid_key("scalar must be in [1, n-1]"))?;
        Ok(Self::from_secret(secret))
    }

    /// Adopt an existing `secp256k1` secret key
    pub fn from_secret(secret: SecretKey) -> Self {
        let point = CurvePoint::from_public_key(PublicKey::from_secret_key(SECP256K1, &secret));
        Self { secret, point }
    }

    pub fn public_point(&self) -> &CurvePoint {
        &self.point
    }

    /// Big-endian scalar bytes, for the codecs only
    pub(crate) fn secret_bytes(&self) -> [u8; SCALAR_LEN] {
        self.secret.secret_bytes()
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("secret", &"<redacted>")
            .field("point", &self.point)
            .finish()
    }
}
