use crate::errors::{HeaderError, HeaderResult};
use crate::hashing;
use arbor_keys::{verify, Key};
use ipld_core::cid::Cid;
use serde::{Deserialize, Serialize};

/// The signed portion of a block header.
///
/// `accept` and `reject` are semantically sets (CIDs are unique content
/// hashes) but keep insertion order so the canonical encoding is
/// deterministic. A payload is immutable once constructed; mutating it
/// invalidates any signature already made over it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(rename = "Version")]
    pub version: i64,
    /// Parent headers this one builds upon.
    #[serde(rename = "Accept")]
    pub accept: Vec<Cid>,
    /// Ancestor headers this one vetoes out of canonical history.
    #[serde(rename = "Reject")]
    pub reject: Vec<Cid>,
    #[serde(rename = "Body")]
    pub body: Cid,
    #[serde(rename = "Schema")]
    pub schema_uri: String,
    #[serde(rename = "MediaType")]
    pub media_type: String,
    #[serde(rename = "Comment")]
    pub comment: String,
}

impl Payload {
    /// Canonical DAG-CBOR encoding: fixed field order, lists in insertion
    /// order, CIDs as typed links (CBOR tag 42).
    pub fn encode(&self) -> HeaderResult<Vec<u8>> {
        serde_ipld_dagcbor::to_vec(self).map_err(|e| HeaderError::Encode(e.to_string()))
    }

    /// Signs the canonical encoding with `key`, using the signer's DID as
    /// the signature context, and wraps the result into a [`Header`].
    pub fn sign(&self, key: &Key) -> HeaderResult<Header> {
        let bytes = self.encode()?;
        let issuer = key.did();
        let signature = key.sign(&bytes, &issuer)?;
        Ok(Header { payload: self.clone(), issuer, signature })
    }
}

/// A signed block header. Its own CID is not a field: the identifier is
/// the hash of the canonical encoding and is carried alongside (e.g. as
/// the ledger map key), since embedding it would be self-referential.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(rename = "Payload")]
    pub payload: Payload,
    /// DID of the signing key.
    #[serde(rename = "Issuer")]
    pub issuer: String,
    #[serde(rename = "Signature", with = "serde_bytes")]
    pub signature: Vec<u8>,
}

impl Header {
    pub fn encode(&self) -> HeaderResult<Vec<u8>> {
        serde_ipld_dagcbor::to_vec(self).map_err(|e| HeaderError::Encode(e.to_string()))
    }

    /// Content identifier of this header's canonical encoding.
    pub fn cid(&self) -> HeaderResult<Cid> {
        Ok(hashing::cid_of(&self.encode()?))
    }

    pub fn decode(bytes: &[u8]) -> HeaderResult<Header> {
        serde_ipld_dagcbor::from_slice(bytes).map_err(|e| HeaderError::MalformedHeader(e.to_string()))
    }

    /// Re-encodes the payload and checks the signature against the issuer
    /// DID, with the issuer DID as the signature context. A header failing
    /// this check must never enter a ledger.
    pub fn verify(&self) -> HeaderResult<()> {
        let bytes = self.payload.encode()?;
        verify(&self.issuer, &self.signature, &bytes, &self.issuer)?;
        Ok(())
    }
}
