//!
//! Fixture builders shared by the consensus tests.
//!
use crate::model::ledger::Ledger;
use crate::model::stores::{HeaderStore, MemoryHeaderStore};
use arbor_consensus_core::{Cid, CidHashMap, Header, Payload, LEDGER_VERSION};
use arbor_keys::{Key, KeyType};

/// A struct with fluent API to streamline DAG fixture building. All
/// fixture headers are signed with one Ed25519 key and share one body CID.
pub struct DagBuilder {
    key: Key,
    body: Cid,
    headers: CidHashMap<Header>,
}

impl DagBuilder {
    pub fn new() -> Self {
        Self {
            key: Key::generate(KeyType::Ed25519).unwrap(),
            body: Cid::try_from("bafyreih3lbpdqibixvdr3twiqwqrx3tgxbcwuooaq6ieyxzjzkw5zoxb3m").unwrap(),
            headers: CidHashMap::default(),
        }
    }

    /// Signs a header with the given accept/reject links and retains it;
    /// returns its CID.
    pub fn header(&mut self, accept: &[Cid], reject: &[Cid]) -> Cid {
        let payload = Payload {
            version: LEDGER_VERSION,
            accept: accept.to_vec(),
            reject: reject.to_vec(),
            body: self.body,
            schema_uri: "https://w3c.github.io/json-ld-cbor/".to_string(),
            media_type: "application/vnd.ipld.dag-cbor".to_string(),
            comment: String::new(),
        };
        let header = payload.sign(&self.key).unwrap();
        let cid = header.cid().unwrap();
        self.headers.insert(cid, header);
        cid
    }

    /// A ledger holding every header built so far.
    pub fn ledger(&self, tip: Cid) -> Ledger {
        let mut ledger = Ledger::new(tip);
        ledger.headers = self.headers.clone();
        ledger
    }

    /// A ledger holding only the listed members, mirroring fixtures that
    /// stage partial views of the DAG.
    pub fn ledger_with(&self, tip: Cid, members: &[Cid]) -> Ledger {
        let mut ledger = Ledger::new(tip);
        for member in members {
            ledger.headers.insert(*member, self.headers[member].clone());
        }
        ledger
    }

    /// Encodes every header built so far into a fresh in-memory store.
    pub fn store(&self) -> MemoryHeaderStore {
        let mut store = MemoryHeaderStore::new();
        for header in self.headers.values() {
            store.put(&header.encode().unwrap()).unwrap();
        }
        store
    }
}
