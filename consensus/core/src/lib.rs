pub mod errors;
pub mod hashing;
pub mod header;

use std::collections::{HashMap, HashSet};

pub use errors::{HeaderError, HeaderResult};
pub use header::{Header, Payload};
pub use ipld_core::cid::Cid;

/// Current header payload version.
pub const LEDGER_VERSION: i64 = 1;

pub type CidSet = HashSet<Cid>;
pub type CidHashMap<V> = HashMap<Cid, V>;
