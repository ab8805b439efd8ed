//! Configuration cache over the fast store
//!
//! Cache-aside reads, dual writes, and the periodic snapshot sync that
//! bounds drift between the two stores.

pub mod keys;
mod lookup;
mod mutator;
mod reader;
mod rule_set;
mod sync;
mod tasks;


pub use keys::EntityType;
pub use lookup::{Lookup, Record};
pub use mutator::{
    BatchFailure, BatchItem, BatchWriteReport, DualWriteMutator, WriteOp, WriteOutcome, WriteSummary,
};
pub use reader::CacheReader;
pub use sync::{SyncReport, spawn_sync_loop, sync_once};
pub use tasks::BackgroundTasks;
