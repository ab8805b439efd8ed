//! Redis storage implementation
//!
//! ## Module Structure
//!
//! - `pool` - Connection setup, no-op mode and health checks
//! - `cache` - Basic key operations (get, set, delete)
//! - `batch` - Multi-key reads and deletes
//! - `atomic` - Counter pipelines and server info
//! - `scan` - Cursor based key scans
//! - `store` - [`FastStore`](super::FastStore) implementation
//! - `tests` - Module tests

mod atomic;
mod batch;
mod cache;
mod pool;
mod scan;
mod store;

pub use pool::{RedisConnection, RedisPool};
