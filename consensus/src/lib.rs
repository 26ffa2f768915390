pub mod errors;
pub mod model;
pub mod processes;

#[cfg(test)]
mod test_helpers;

pub use errors::{BuildError, BuildResult};
pub use model::graph::HeaderTable;
pub use model::ledger::Ledger;
pub use model::stores::{HeaderStore, MemoryHeaderStore, StoreError, StoreResult};
pub use processes::builder::{LedgerBuilder, PartialLedger};
pub use processes::pruning::{prunable, prune};
pub use processes::reachability::reachable;
