//! Core functionality for the config center
//!
//! This module contains the cache, counter and reporting logic.

pub mod cache;
pub mod context;
pub mod models;
pub mod rate_limiter;
pub mod reporter;

pub use context::AppContext;
