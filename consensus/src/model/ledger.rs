use arbor_consensus_core::{Cid, CidHashMap, Header};
use itertools::Itertools;

/// A ledger snapshot: a designated tip and every header reachable from it
/// through accept and reject edges, keyed by content identifier.
///
/// The map key of each header is assumed to equal the content hash of its
/// canonical encoding (the builder enforces this on the way in). A ledger
/// is a derived, in-memory view: it is built fresh from a store per query
/// and never persisted. Only pruning mutates it.
pub struct Ledger {
    pub tip: Cid,
    pub headers: CidHashMap<Header>,
}

impl Ledger {
    pub fn new(tip: Cid) -> Self {
        Self { tip, headers: CidHashMap::default() }
    }

    /// The distinct body CIDs referenced by the retained headers, in
    /// stable order. Callers use this to pin or fetch ledger content.
    pub fn bodies(&self) -> Vec<Cid> {
        self.headers.values().map(|header| header.payload.body).sorted_unstable_by_key(|cid| cid.to_bytes()).dedup().collect()
    }
}
