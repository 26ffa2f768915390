//!
//! Pruning: the complement of the visible set, and its removal.
//!
use crate::model::ledger::Ledger;
use crate::processes::reachability::reachable;
use arbor_consensus_core::{Cid, CidSet};
use log::debug;

/// Headers with no clean accept path from the tip; safe to discard.
pub fn prunable(ledger: &Ledger) -> CidSet {
    let visible = reachable(ledger);
    ledger.headers.keys().filter(|cid| !visible.contains(cid)).copied().collect()
}

/// Removes every prunable header from the ledger and returns the removed
/// CIDs, sorted by CID byte representation for reproducible output.
pub fn prune(ledger: &mut Ledger) -> Vec<Cid> {
    let mut removed: Vec<Cid> = prunable(ledger).into_iter().collect();
    removed.sort_unstable_by_key(|cid| cid.to_bytes());
    for cid in &removed {
        ledger.headers.remove(cid);
    }
    debug!("pruned {} of {} headers below tip {}", removed.len(), removed.len() + ledger.headers.len(), ledger.tip);
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::DagBuilder;

    /// The shared fixture DAG exercised from several tips:
    ///
    /// ```text
    /// c0 <- c1 <- c2 <- c3 (rej c0)
    ///        |      \\<- c4 (rej c1)   c5 (acc c2, rej c2)
    ///        |\- c6 <- c7 (acc c2,c6) <- c8 (rej c6) <- c11 <- c12 (rej c2)
    ///         \- c9 <- c10 -----------------/             |
    ///                        c13 (acc c7,c12) <-----------/ <- c14 (rej c9)
    /// ```
    struct Battery {
        dag: DagBuilder,
        c: Vec<Cid>,
    }

    impl Battery {
        fn new() -> Self {
            let mut dag = DagBuilder::new();
            let c0 = dag.header(&[], &[]);
            let c1 = dag.header(&[c0], &[]);
            let c2 = dag.header(&[c1], &[]);
            let c3 = dag.header(&[c2], &[c0]);
            let c4 = dag.header(&[c2], &[c1]);
            let c5 = dag.header(&[c2], &[c2]);
            let c6 = dag.header(&[c1], &[]);
            let c7 = dag.header(&[c2, c6], &[]);
            let c8 = dag.header(&[c7], &[c6]);
            let c9 = dag.header(&[c1], &[]);
            let c10 = dag.header(&[c9], &[]);
            let c11 = dag.header(&[c8, c10], &[]);
            let c12 = dag.header(&[c11], &[c2]);
            let c13 = dag.header(&[c7, c12], &[]);
            let c14 = dag.header(&[c13], &[c9]);
            Self { dag, c: vec![c0, c1, c2, c3, c4, c5, c6, c7, c8, c9, c10, c11, c12, c13, c14] }
        }

        fn check(&self, tip: usize, members: &[usize], expected: &[usize]) {
            let member_cids: Vec<Cid> = members.iter().map(|i| self.c[*i]).collect();
            let mut ledger = self.dag.ledger_with(self.c[tip], &member_cids);
            let mut expected_cids: Vec<Cid> = expected.iter().map(|i| self.c[*i]).collect();
            expected_cids.sort_unstable_by_key(|cid| cid.to_bytes());
            assert_eq!(prune(&mut ledger), expected_cids, "wrong pruning from tip c{tip}");
            assert_eq!(ledger.headers.len(), members.len() - expected.len());
        }
    }

    #[test]
    fn genesis() {
        Battery::new().check(0, &[0], &[]);
    }

    #[test]
    fn two_blocks_linear() {
        Battery::new().check(1, &[0, 1], &[]);
    }

    #[test]
    fn three_blocks_linear() {
        Battery::new().check(2, &[0, 1, 2], &[]);
    }

    #[test]
    fn reject_genesis() {
        Battery::new().check(3, &[0, 1, 2, 3], &[0]);
    }

    #[test]
    fn reject_first_takes_exclusive_ancestors() {
        Battery::new().check(4, &[0, 1, 2, 4], &[0, 1]);
    }

    #[test]
    fn reject_own_parent_absorbs_whole_chain() {
        Battery::new().check(5, &[0, 1, 2, 5], &[0, 1, 2]);
    }

    #[test]
    fn parallel_paths_all_survive() {
        Battery::new().check(7, &[0, 1, 2, 6, 7], &[]);
    }

    #[test]
    fn reject_whole_parallel_path() {
        Battery::new().check(8, &[0, 1, 2, 6, 7, 8], &[6]);
    }

    #[test]
    fn merge_above_rejected_branch() {
        Battery::new().check(11, &[0, 1, 2, 6, 7, 8, 9, 10, 11], &[6]);
    }

    #[test]
    fn late_reject_of_shared_ancestor() {
        Battery::new().check(12, &[0, 1, 2, 6, 7, 8, 9, 10, 11, 12], &[2, 6]);
    }

    #[test]
    fn merge_resurrects_vetoed_headers() {
        // c13 accepts c7 directly, giving c2 and c6 clean paths again
        Battery::new().check(13, &[0, 1, 2, 6, 7, 8, 9, 10, 11, 12, 13], &[]);
    }

    #[test]
    fn reject_on_top_of_resurrecting_merge() {
        Battery::new().check(14, &[0, 1, 2, 6, 7, 8, 9, 10, 11, 12, 13, 14], &[9]);
    }

    #[test]
    fn existential_path_diamond() {
        // F rejects D, which sits between C and E; B's disjoint path keeps
        // the root visible while C and D fall
        let mut dag = DagBuilder::new();
        let a = dag.header(&[], &[]);
        let b = dag.header(&[a], &[]);
        let c = dag.header(&[a], &[]);
        let d = dag.header(&[c], &[]);
        let e = dag.header(&[d], &[]);
        let f = dag.header(&[b, e], &[d]);
        let g = dag.header(&[f], &[]);
        let mut ledger = dag.ledger(g);
        let mut expected = vec![c, d];
        expected.sort_unstable_by_key(|cid| cid.to_bytes());
        assert_eq!(prune(&mut ledger), expected);
        for survivor in [a, b, e, f, g] {
            assert!(ledger.headers.contains_key(&survivor));
        }
    }

    #[test]
    fn sibling_veto_does_not_block_the_other_branch() {
        // B rejects C, but the tip also reaches C through D/E without B,
        // so nothing is pruned
        let mut dag = DagBuilder::new();
        let a = dag.header(&[], &[]);
        let c = dag.header(&[a], &[]);
        let b = dag.header(&[a], &[c]);
        let d = dag.header(&[c], &[]);
        let e = dag.header(&[d], &[]);
        let f = dag.header(&[b, e], &[]);
        let g = dag.header(&[f], &[]);
        let mut ledger = dag.ledger(g);
        assert_eq!(prune(&mut ledger), vec![]);
    }

    #[test]
    fn self_vetoing_ancestor_still_counts() {
        // B both accepts and rejects the root R; R falls, and so does the
        // side header Y that nothing reaches from the tip
        let mut dag = DagBuilder::new();
        let r = dag.header(&[], &[]);
        let b = dag.header(&[r], &[r]);
        let a = dag.header(&[b], &[]);
        let y = dag.header(&[b], &[]);
        let x = dag.header(&[a], &[]);
        let t = dag.header(&[a, x], &[]);
        let mut ledger = dag.ledger(t);
        let mut expected = vec![r, y];
        expected.sort_unstable_by_key(|cid| cid.to_bytes());
        assert_eq!(prune(&mut ledger), expected);
    }

    #[test]
    fn prune_is_idempotent() {
        let battery = Battery::new();
        let members: Vec<Cid> = [0, 1, 2, 6, 7, 8, 9, 10, 11, 12].iter().map(|i| battery.c[*i]).collect();
        let mut ledger = battery.dag.ledger_with(battery.c[12], &members);
        let first = prune(&mut ledger);
        assert_eq!(first.len(), 2);
        let survivors = ledger.headers.len();
        assert_eq!(prune(&mut ledger), vec![]);
        assert_eq!(ledger.headers.len(), survivors);
    }

    #[test]
    fn prunable_leaves_the_ledger_untouched() {
        let battery = Battery::new();
        let members: Vec<Cid> = [0, 1, 2, 3].iter().map(|i| battery.c[*i]).collect();
        let ledger = battery.dag.ledger_with(battery.c[3], &members);
        assert_eq!(prunable(&ledger).len(), 1);
        assert_eq!(ledger.headers.len(), 4);
    }
}
