use ed25519_dalek::{Signature, SigningKey, VerifyingKey, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha512};
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use thiserror::Error;
use zeroize::Zeroize;

mod did;

pub use did::{public_key_from_did, DID_KEY_PREFIX};

/// Maximum context length admitted by RFC 8032 context-carrying signatures.
pub const MAX_CONTEXT_LEN: usize = 255;

#[derive(Error, Debug)]
pub enum KeyError {
    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    #[error("signing context is {0} bytes, the maximum is 255")]
    ContextTooLong(usize),

    #[error("invalid DID format: {0}")]
    InvalidDidFormat(String),

    #[error("multibase decode error: {0}")]
    MultibaseDecodeError(#[from] multibase::Error),

    #[error("unsupported multicodec prefix in DID")]
    UnsupportedMulticodec,

    #[error("signature verification failed")]
    VerificationFailed,

    #[error("wrong private key block type: {0}")]
    WrongBlockType(String),

    #[error("no key material present")]
    NoKeyMaterial,

    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("ed25519 error: {0}")]
    Ed25519(#[from] ed25519_dalek::SignatureError),

    #[error("key file error: {0}")]
    Io(#[from] std::io::Error),
}

pub type KeyResult<T> = std::result::Result<T, KeyError>;

/// Supported signing key families. Adding a family means extending this
/// enum and the match arms dispatching on it; there is no open-ended
/// runtime registration.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub enum KeyType {
    Ed25519,
    Bls12381,
}

impl KeyType {
    fn as_str(&self) -> &'static str {
        match self {
            KeyType::Ed25519 => "Ed25519",
            KeyType::Bls12381 => "Bls12381",
        }
    }

    /// The PEM block tag labeling serialized private keys of this family.
    pub fn pem_tag(&self) -> &'static str {
        match self {
            KeyType::Ed25519 => "ED25519 PRIVATE KEY",
            KeyType::Bls12381 => "BLS12381 PRIVATE KEY",
        }
    }

    /// The 2-byte multicodec prefix selecting this family inside a `did:key`.
    pub fn multicodec_tag(&self) -> [u8; 2] {
        match self {
            KeyType::Ed25519 => did::MULTICODEC_ED25519_PUB,
            KeyType::Bls12381 => did::MULTICODEC_BLS12381_G1_PUB,
        }
    }
}

impl Display for KeyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for KeyType {
    type Error = KeyError;

    fn try_from(tag: &str) -> Result<Self, Self::Error> {
        match tag {
            "ED25519 PRIVATE KEY" => Ok(KeyType::Ed25519),
            "BLS12381 PRIVATE KEY" => Ok(KeyType::Bls12381),
            _ => Err(KeyError::WrongBlockType(tag.to_string())),
        }
    }
}

impl std::str::FromStr for KeyType {
    type Err = KeyError;

    /// Parses a key family name as supplied by callers selecting a family
    /// (e.g. a `--key-type` flag).
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "ed25519" => Ok(KeyType::Ed25519),
            "bls12381" | "bls12-381" => Ok(KeyType::Bls12381),
            _ => Err(KeyError::UnsupportedKeyType(name.to_string())),
        }
    }
}

/// A private signing key of one of the supported families.
///
/// Keys never cross the ledger boundary; only the DID and signatures do.
/// Ed25519 signatures are RFC 8032 prehashed (SHA-512) signatures carrying
/// the signing context. BLS12-381 follows the `min_pk` convention: public
/// keys are compressed G1 points (48 bytes), signatures compressed G2
/// points (96 bytes), with the context embedded in the hash-to-curve
/// domain-separation tag.
pub enum Key {
    Ed25519(SigningKey),
    Bls12381(blst::min_pk::SecretKey),
}

impl Key {
    /// Generates a fresh private key of the requested family from the OS
    /// entropy source.
    pub fn generate(key_type: KeyType) -> KeyResult<Key> {
        match key_type {
            KeyType::Ed25519 => Ok(Key::Ed25519(SigningKey::generate(&mut OsRng))),
            KeyType::Bls12381 => {
                let mut ikm = [0u8; 32];
                OsRng.fill_bytes(&mut ikm);
                let sk = blst::min_pk::SecretKey::key_gen(&ikm, &[])
                    .map_err(|e| KeyError::InvalidKeyMaterial(format!("bls keygen: {e:?}")))?;
                ikm.zeroize();
                Ok(Key::Bls12381(sk))
            }
        }
    }

    /// Reconstructs a key from raw private bytes (32-byte Ed25519 seed or
    /// 32-byte big-endian BLS scalar).
    pub fn from_private_bytes(key_type: KeyType, bytes: &[u8]) -> KeyResult<Key> {
        match key_type {
            KeyType::Ed25519 => {
                let seed: [u8; SECRET_KEY_LENGTH] = bytes
                    .try_into()
                    .map_err(|_| KeyError::InvalidKeyMaterial(format!("ed25519 private key length {}", bytes.len())))?;
                Ok(Key::Ed25519(SigningKey::from_bytes(&seed)))
            }
            KeyType::Bls12381 => {
                let sk = blst::min_pk::SecretKey::from_bytes(bytes)
                    .map_err(|e| KeyError::InvalidKeyMaterial(format!("bls private key: {e:?}")))?;
                Ok(Key::Bls12381(sk))
            }
        }
    }

    pub fn key_type(&self) -> KeyType {
        match self {
            Key::Ed25519(_) => KeyType::Ed25519,
            Key::Bls12381(_) => KeyType::Bls12381,
        }
    }

    pub fn public_bytes(&self) -> Vec<u8> {
        match self {
            Key::Ed25519(sk) => sk.verifying_key().to_bytes().to_vec(),
            Key::Bls12381(sk) => sk.sk_to_pk().to_bytes().to_vec(),
        }
    }

    pub fn private_bytes(&self) -> Vec<u8> {
        match self {
            Key::Ed25519(sk) => sk.to_bytes().to_vec(),
            Key::Bls12381(sk) => sk.to_bytes().to_vec(),
        }
    }

    /// Signs `message` bound to `context`. Every header signature in the
    /// ledger uses the signer's own DID as the context string.
    pub fn sign(&self, message: &[u8], context: &str) -> KeyResult<Vec<u8>> {
        match self {
            Key::Ed25519(sk) => {
                if context.len() > MAX_CONTEXT_LEN {
                    return Err(KeyError::ContextTooLong(context.len()));
                }
                let digest = Sha512::new().chain_update(message);
                let signature = sk.sign_prehashed(digest, Some(context.as_bytes()))?;
                Ok(signature.to_bytes().to_vec())
            }
            Key::Bls12381(sk) => {
                let dst = bls_dst(context);
                Ok(sk.sign(message, &dst, &[]).to_bytes().to_vec())
            }
        }
    }

    /// The `did:key` identifier of this key's public half.
    pub fn did(&self) -> String {
        did::encode(self.key_type(), &self.public_bytes())
    }

    /// Serializes the private key into a PEM block whose tag names the key
    /// family, so the family can be recovered on read.
    pub fn write_private(&self, path: impl AsRef<Path>) -> KeyResult<()> {
        let block = pem::Pem::new(self.key_type().pem_tag(), self.private_bytes());
        fs::write(path, pem::encode(&block))?;
        Ok(())
    }

    /// Inverse of [`Key::write_private`].
    pub fn read_private(path: impl AsRef<Path>) -> KeyResult<Key> {
        let data = fs::read_to_string(path)?;
        let block = pem::parse(data).map_err(|_| KeyError::NoKeyMaterial)?;
        let key_type = KeyType::try_from(block.tag())?;
        if block.contents().is_empty() {
            return Err(KeyError::NoKeyMaterial);
        }
        Key::from_private_bytes(key_type, block.contents())
    }
}

/// Checks `signature` over `message` bound to `context` against the public
/// key a DID resolves to.
pub fn verify(did: &str, signature: &[u8], message: &[u8], context: &str) -> KeyResult<()> {
    let (key_type, public) = public_key_from_did(did)?;
    match key_type {
        KeyType::Ed25519 => {
            if context.len() > MAX_CONTEXT_LEN {
                return Err(KeyError::ContextTooLong(context.len()));
            }
            let public: [u8; 32] =
                public.as_slice().try_into().map_err(|_| KeyError::InvalidKeyMaterial("ed25519 public key length".into()))?;
            let vk = VerifyingKey::from_bytes(&public).map_err(|_| KeyError::InvalidKeyMaterial("ed25519 public key".into()))?;
            let sig = Signature::from_slice(signature).map_err(|_| KeyError::VerificationFailed)?;
            vk.verify_prehashed(Sha512::new().chain_update(message), Some(context.as_bytes()), &sig)
                .map_err(|_| KeyError::VerificationFailed)
        }
        KeyType::Bls12381 => {
            let pk =
                blst::min_pk::PublicKey::from_bytes(&public).map_err(|_| KeyError::InvalidKeyMaterial("bls public key".into()))?;
            let sig = blst::min_pk::Signature::from_bytes(signature).map_err(|_| KeyError::VerificationFailed)?;
            let dst = bls_dst(context);
            match sig.verify(true, message, &dst, &[], &pk, true) {
                blst::BLST_ERROR::BLST_SUCCESS => Ok(()),
                _ => Err(KeyError::VerificationFailed),
            }
        }
    }
}

// Hash-to-curve domain-separation tag embedding the signing context,
// mirroring the ciphersuite naming of draft-irtf-cfrg-bls-signature.
fn bls_dst(context: &str) -> Vec<u8> {
    let mut dst = Vec::with_capacity(context.len() + 33);
    dst.extend_from_slice(b"BLS_SIG_");
    dst.extend_from_slice(context.as_bytes());
    dst.extend_from_slice(b"_XMD:SHA-256_SSWU_RO_NUL_");
    dst
}
