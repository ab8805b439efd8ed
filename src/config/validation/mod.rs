//! Configuration validation
//!
//! - `trait_def`: Core Validate trait definition
//! - `storage_validators`: Relational store and Redis validators
//! - `cache_validators`: Cache TTL, counter window and retry validators
//! - `tests`: Test suite for all validators

mod cache_validators;
mod storage_validators;
mod trait_def;

pub use trait_def::Validate;
