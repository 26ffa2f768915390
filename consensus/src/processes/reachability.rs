//!
//! Fork choice over the header DAG: which headers are canonically visible
//! from the tip, given every veto declared along the way.
//!
use crate::model::ledger::Ledger;
use arbor_consensus_core::{Cid, CidSet};
use std::sync::Arc;

/// Computes the visible set of a ledger: a header is visible iff at least
/// one accept path from the tip reaches it without the accumulated vetoes
/// of that particular path covering it.
///
/// Visibility is existential over paths. A single clean path marks a
/// header permanently visible, even when other paths to it are vetoed, so
/// the walk keeps an explicit stack of (header, accumulated reject set)
/// pairs and may re-expand a header under different accumulated sets.
/// The worst case is therefore exponential in the number of diamond
/// re-convergences; reject sets are deliberately not memoized per header,
/// since collapsing them would change the rule itself.
pub fn reachable(ledger: &Ledger) -> CidSet {
    let mut visible = CidSet::from([ledger.tip]);
    let mut stack: Vec<(Cid, Arc<CidSet>)> = Vec::new();
    if let Some(tip) = ledger.headers.get(&ledger.tip) {
        stack.push((ledger.tip, Arc::new(tip.payload.reject.iter().copied().collect())));
    }

    while let Some((cid, rejected)) = stack.pop() {
        if rejected.contains(&cid) {
            // vetoed along this particular route; some other path may
            // still reach it cleanly
            continue;
        }
        visible.insert(cid);
        let Some(header) = ledger.headers.get(&cid) else { continue };
        if header.payload.accept.is_empty() {
            continue;
        }
        let rejected = if header.payload.reject.is_empty() {
            rejected
        } else {
            let mut extended = (*rejected).clone();
            extended.extend(header.payload.reject.iter().copied());
            Arc::new(extended)
        };
        for accept in &header.payload.accept {
            stack.push((*accept, Arc::clone(&rejected)));
        }
    }
    visible
}
