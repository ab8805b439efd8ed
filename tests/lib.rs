//! Test suite for config-center-rs
//!
//! This module organizes tests into two categories:
//!
//! ## Test Categories
//!
//! ### 1. Common Utilities (`common/`)
//! Shared test infrastructure including:
//! - In-memory database helpers
//! - Harness wiring both stores to a manual clock
//! - Record factories
//! - A fast store that is always unreachable
//!
//! ### 2. Integration Tests (`integration/`)
//! Tests that drive the public [`ConfigCenter`](config_center::ConfigCenter)
//! API against a real in-memory SQLite store:
//! - Read-after-write and degraded fast store behaviour
//! - Counter windows, usage and resets
//! - Snapshot sync and configuration loading
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all tests
//! cargo test
//!
//! # Run only unit tests
//! cargo test --lib
//!
//! # Run integration tests
//! cargo test --test lib
//! ```

pub mod common;
pub mod integration;
