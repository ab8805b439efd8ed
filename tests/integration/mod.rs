//! Integration tests for config-center-rs
//!
//! These tests verify the interaction between the relational store, the
//! fast store and the counters through the public API.

pub mod config_tests;
pub mod counter_tests;
pub mod dual_write_tests;
pub mod sync_tests;
