//!
//! Indexed graph views over a ledger snapshot, for consumers that want to
//! run graph algorithms or export the accept relation.
//!
use crate::model::ledger::Ledger;
use arbor_consensus_core::{Cid, CidHashMap, Header};
use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;

/// Stable index ↔ CID ↔ header lookup over a ledger snapshot. Indices are
/// assigned in CID byte order, so two tables over the same ledger agree.
pub struct HeaderTable<'a> {
    nodes: Vec<(Cid, &'a Header)>,
    index_by_cid: CidHashMap<usize>,
}

impl<'a> HeaderTable<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        let mut nodes: Vec<(Cid, &Header)> = ledger.headers.iter().map(|(cid, header)| (*cid, header)).collect();
        nodes.sort_unstable_by_key(|(cid, _)| cid.to_bytes());
        let index_by_cid = nodes.iter().enumerate().map(|(index, (cid, _))| (*cid, index)).collect();
        Self { nodes, index_by_cid }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn cid(&self, index: usize) -> Option<Cid> {
        self.nodes.get(index).map(|(cid, _)| *cid)
    }

    pub fn index(&self, cid: &Cid) -> Option<usize> {
        self.index_by_cid.get(cid).copied()
    }

    pub fn header(&self, cid: &Cid) -> Option<&'a Header> {
        self.index(cid).map(|index| self.nodes[index].1)
    }

    /// Directed graph over the accept relation, edges pointing from each
    /// header to the parents it accepts (or the reverse with `reverse`).
    /// Accept links leaving the snapshot are skipped.
    pub fn accept_graph(&self, reverse: bool) -> DiGraphMap<usize, ()> {
        let mut graph = DiGraphMap::new();
        for index in 0..self.nodes.len() {
            graph.add_node(index);
        }
        for (index, (_, header)) in self.nodes.iter().enumerate() {
            for accept in &header.payload.accept {
                let Some(parent) = self.index(accept) else { continue };
                if reverse {
                    graph.add_edge(parent, index, ());
                } else {
                    graph.add_edge(index, parent, ());
                }
            }
        }
        graph
    }

    /// Structural diagnostic: content addressing is assumed to rule out
    /// accept cycles, but a corrupted store can produce one.
    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.accept_graph(false))
    }
}
