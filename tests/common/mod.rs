//! Common test utilities for config-center-rs
//!
//! This module provides shared test infrastructure for all tests:
//! - In-memory SQLite database support
//! - A harness wiring both stores to a manual clock
//! - Record factories
//! - A fast store that refuses every call
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::{TestHarness, fixtures};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let h = TestHarness::new().await;
//!     let ns = h.namespace("wechat").await;
//!     // ...
//! }
//! ```

pub mod database;
pub mod failing;
pub mod fixtures;

// Re-export commonly used items
pub use database::TestDatabase;
pub use failing::FailingStore;
pub use fixtures::{HOUR_START, NamespaceFactory, RuleFactory, TestHarness};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
