//!
//! Ledger construction: the recursive closure over accept and reject
//! edges, materialized as an iterative worklist walk.
//!
use crate::errors::{BuildError, BuildResult};
use crate::model::ledger::Ledger;
use crate::model::stores::{HeaderStore, StoreError};
use arbor_consensus_core::{hashing, Cid, CidSet, Header, HeaderError};
use log::{trace, warn};

/// Outcome of a [`LedgerBuilder::build_partial`] walk: the verified ledger
/// plus the headers that were fetched but failed verification and were
/// left out (their own edges are not expanded).
pub struct PartialLedger {
    pub ledger: Ledger,
    pub rejected: Vec<(Cid, HeaderError)>,
}

enum VerifyPolicy {
    FailFast,
    Collect,
}

/// Builds [`Ledger`] snapshots from a header store by walking every
/// accept and reject link reachable from a tip.
///
/// The walk memoizes visited CIDs: each header is fetched and decoded at
/// most once regardless of how many diamond shapes re-converge on it, and
/// a reference set made cyclic by store corruption terminates instead of
/// recursing unboundedly.
pub struct LedgerBuilder<'a, S: HeaderStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: HeaderStore + ?Sized> LedgerBuilder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Builds the full ledger for `tip`, failing on the first header that
    /// cannot be fetched, decoded or verified.
    pub fn build(&self, tip: Cid) -> BuildResult<Ledger> {
        Ok(self.walk(tip, VerifyPolicy::FailFast)?.ledger)
    }

    /// Like [`LedgerBuilder::build`], but an unverifiable non-tip header
    /// is reported and skipped rather than failing the walk. The tip
    /// itself must always verify; there is no ledger without it.
    pub fn build_partial(&self, tip: Cid) -> BuildResult<PartialLedger> {
        self.walk(tip, VerifyPolicy::Collect)
    }

    fn walk(&self, tip: Cid, policy: VerifyPolicy) -> BuildResult<PartialLedger> {
        let mut ledger = Ledger::new(tip);
        let mut rejected: Vec<(Cid, HeaderError)> = Vec::new();
        let mut visited = CidSet::from([tip]);
        let mut pending = vec![tip];

        while let Some(cid) = pending.pop() {
            let header = self.fetch(cid)?;
            if let Err(e) = header.verify() {
                if matches!(policy, VerifyPolicy::FailFast) || cid == tip {
                    return Err(BuildError::UnverifiedHeader(cid, e));
                }
                warn!("skipping unverifiable header {cid}: {e}");
                rejected.push((cid, e));
                continue;
            }
            for link in header.payload.accept.iter().chain(header.payload.reject.iter()) {
                if visited.insert(*link) {
                    pending.push(*link);
                }
            }
            trace!("admitted header {cid} issued by {}", header.issuer);
            ledger.headers.insert(cid, header);
        }
        Ok(PartialLedger { ledger, rejected })
    }

    fn fetch(&self, cid: Cid) -> BuildResult<Header> {
        let bytes = match self.store.get(&cid) {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound(missing)) => return Err(BuildError::MissingHeader(missing)),
            Err(e) => return Err(e.into()),
        };
        let actual = hashing::cid_of(&bytes);
        if actual != cid {
            return Err(BuildError::CorruptStore { requested: cid, actual });
        }
        Header::decode(&bytes).map_err(|e| BuildError::MalformedHeader(cid, e.to_string()))
    }
}
