//! P2PKH Address Derivation
//!
//! ```text
//! base58( version || RIPEMD160(SHA256(pubkey)) || checksum(4) )
//! ```
//!
//! Compressed and uncompressed encodings of the same point hash to
//! different addresses.

use bitcoin::hashes::{hash160, Hash};

use crate::codec::{decode_base58, encode_check, verify_checksum};
use crate::common::FormatError;
use crate::curve::{COMPRESSED_LEN, UNCOMPRESSED_LEN};
use crate::types::Network;

/// Length of a public key hash
pub const PUBKEY_HASH_LEN: usize = 20;

/// HASH160 of a serialized public key
pub fn pubkey_hash(public_key: &[u8]) -> [u8; PUBKEY_HASH_LEN] {
    hash160::Hash::hash(public_key).to_byte_array()
}

/// Derive an address under an explicit version byte
///
/// The key must be a well-formed SEC1 encoding: 33 bytes with a
/// `0x02`/`0x03` prefix, or 65 bytes with `0x04`.
pub fn address_from_public_key(public_key: &[u8], version: u8) -> Result<String, FormatError> {
    match (public_key.len(), public_key.first()) {
        (COMPRESSED_LEN, Some(0x02 | 0x03)) | (UNCOMPRESSED_LEN, Some(0x04)) => {}
        (len, prefix) => {
            return Err(FormatError::InvalidPublicKey(format!(
                "{} bytes with prefix {:02x?}",
                len, prefix
            )))
        }
    }
    Ok(p2pkh(public_key, version))
}

/// Derive the address of a public key on a network
pub fn derive_address(public_key: &[u8], network: Network) -> Result<String, FormatError> {
    address_from_public_key(public_key, network.address_version())
}

/// Validate an address, returning its network and public key hash
pub fn decode_address(address: &str) -> Result<(Network, [u8; PUBKEY_HASH_LEN]), FormatError> {
    let data = decode_base58(address)?;
    let payload = verify_checksum(&data)?;

    if payload.len() != 1 + PUBKEY_HASH_LEN {
        return Err(FormatError::InvalidLength {
            expected: 1 + PUBKEY_HASH_LEN,
            actual: payload.len(),
        });
    }

    let network =
        Network::from_address_version(payload[0]).ok_or(FormatError::UnknownVersion(payload[0]))?;

    let mut hash = [0u8; PUBKEY_HASH_LEN];
    hash.copy_from_slice(&payload[1..]);
    Ok((network, hash))
}

pub(crate) fn p2pkh(public_key: &[u8], version: u8) -> String {
    let mut payload = Vec::with_capacity(1 + PUBKEY_HASH_LEN);
    payload.push(version);
    payload.extend_from_slice(&pubkey_hash(public_key));
    encode_check(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBKEY_COMPRESSED: &str =
        "033d5c2875c9bd116875a71a5db64cffcb13396b163d039b1d9327824891804334";
    const PUBKEY_UNCOMPRESSED: &str = "043d5c2875c9bd116875a71a5db64cffcb13396b163d039b1d932782\
                                       489180433476a4352a2add00ebb0d5c94c515b72eb10f1fd8f3f03b4\
                                       2f4a2b255bfc9aa9e3";

    #[test]
    fn test_known_addresses() {
        let compressed = hex::decode(PUBKEY_COMPRESSED).unwrap();
        let uncompressed = hex::decode(PUBKEY_UNCOMPRESSED).unwrap();

        assert_eq!(
            derive_address(&uncompressed, Network::Main).unwrap(),
            "1ELReFsTCUY2mfaDTy32qxYiT49z786eFg"
        );
        assert_eq!(
            derive_address(&uncompressed, Network::Test).unwrap(),
            "mtrNwJxS1VyHYn3qBY1Qfsm3K3kh1mGRMS"
        );
        assert_eq!(
            derive_address(&compressed, Network::Main).unwrap(),
            "1ExJJsNLQDNVVM1s1sdyt1o5P3GC5r32UG"
        );
        assert_eq!(
            derive_address(&compressed, Network::Test).unwrap(),
            "muUFbvTKDEokGTVUjScMhw1QF2rtv5hxCz"
        );
    }

    #[test]
    fn test_agrees_with_bitcoin_crate() {
        let compressed = hex::decode(PUBKEY_COMPRESSED).unwrap();
        let pk = bitcoin::PublicKey::from_slice(&compressed).unwrap();
        for network in Network::ALL {
            let expected = bitcoin::Address::p2pkh(pk, network.bitcoin_network()).to_string();
            assert_eq!(derive_address(&compressed, network).unwrap(), expected);
        }
    }

    #[test]
    fn test_rejects_malformed_public_keys() {
        assert!(derive_address(&[0x02; 32], Network::Main).is_err());
        assert!(derive_address(&[0x04; 33], Network::Main).is_err());
        assert!(derive_address(&[0x02; 65], Network::Main).is_err());
        assert!(derive_address(&[], Network::Main).is_err());
    }

    #[test]
    fn test_decode_address() {
        let compressed = hex::decode(PUBKEY_COMPRESSED).unwrap();
        let (network, hash) = decode_address("muUFbvTKDEokGTVUjScMhw1QF2rtv5hxCz").unwrap();
        assert_eq!(network, Network::Test);
        assert_eq!(hash, pubkey_hash(&compressed));

        assert_eq!(
            decode_address("1ExJJsNLQDNVVM1s1sdyt1o5P3GC5r32UH"),
            Err(FormatError::BadChecksum)
        );
        assert!(decode_address("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy").is_err());
    }
}
