use arbor_consensus_core::{hashing, Cid, CidHashMap};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cid {0} not found in store")]
    NotFound(Cid),

    #[error("store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Byte-addressed block store collaborator. The ledger builder only ever
/// calls `get`; `put` exists for producers publishing new headers.
pub trait HeaderStore {
    fn get(&self, cid: &Cid) -> StoreResult<Vec<u8>>;
    fn put(&mut self, bytes: &[u8]) -> StoreResult<Cid>;
}

/// In-memory `HeaderStore`, used by tests and fixtures.
#[derive(Default)]
pub struct MemoryHeaderStore {
    blocks: CidHashMap<Vec<u8>>,
}

impl MemoryHeaderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Inserts bytes under an explicit key, trusting the caller that the
    /// key matches the content. Lets tests stage corrupt entries.
    pub fn insert(&mut self, cid: Cid, bytes: Vec<u8>) {
        self.blocks.insert(cid, bytes);
    }
}

impl HeaderStore for MemoryHeaderStore {
    fn get(&self, cid: &Cid) -> StoreResult<Vec<u8>> {
        self.blocks.get(cid).cloned().ok_or(StoreError::NotFound(*cid))
    }

    fn put(&mut self, bytes: &[u8]) -> StoreResult<Cid> {
        let cid = hashing::cid_of(bytes);
        self.blocks.insert(cid, bytes.to_vec());
        Ok(cid)
    }
}
