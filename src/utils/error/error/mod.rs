//! Error handling for the config center
//!
//! This module defines all error types used throughout the crate.

#![allow(missing_docs)]

mod conversions;
mod helpers;
#[cfg(test)]
mod tests;
mod types;

pub use types::{ConfigCenterError, Result};
