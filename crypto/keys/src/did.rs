//!
//! `did:key` encoding and resolution for the supported key families.
//!
use crate::{KeyError, KeyResult, KeyType};
use multibase::Base;

/// Scheme prefix shared by every identifier this module produces.
pub const DID_KEY_PREFIX: &str = "did:key:";

/// Multicodec prefix for an Ed25519 public key.
pub(crate) const MULTICODEC_ED25519_PUB: [u8; 2] = [0xed, 0x01];

/// Multicodec prefix for a BLS12-381 G1 public key.
pub(crate) const MULTICODEC_BLS12381_G1_PUB: [u8; 2] = [0xea, 0x01];

/// Encodes a public key as `did:key:` + multibase(base58-btc) of the
/// 2-byte family tag followed by the raw public key bytes.
pub(crate) fn encode(key_type: KeyType, public: &[u8]) -> String {
    let mut tagged = Vec::with_capacity(2 + public.len());
    tagged.extend_from_slice(&key_type.multicodec_tag());
    tagged.extend_from_slice(public);
    format!("{}{}", DID_KEY_PREFIX, multibase::encode(Base::Base58Btc, tagged))
}

/// Resolves a `did:key` identifier back to its key family and raw public
/// key bytes. The inverse of DID derivation; no network resolution is
/// involved.
pub fn public_key_from_did(did: &str) -> KeyResult<(KeyType, Vec<u8>)> {
    let encoded = did.strip_prefix(DID_KEY_PREFIX).ok_or_else(|| KeyError::InvalidDidFormat(did.to_string()))?;
    let (_, data) = multibase::decode(encoded)?;
    match data.as_slice() {
        [0xed, 0x01, public @ ..] if public.len() == 32 => Ok((KeyType::Ed25519, public.to_vec())),
        [0xea, 0x01, public @ ..] if public.len() == 48 => Ok((KeyType::Bls12381, public.to_vec())),
        _ => Err(KeyError::UnsupportedMulticodec),
    }
}
