//! Utility modules for the config center
//!
//! - **clock**: injectable wall-clock used by window arithmetic
//! - **error**: error type and retry policy
//! - **logging**: tracing subscriber setup

pub mod clock;
pub mod error;
pub mod logging;

pub use clock::{Clock, ManualClock, SystemClock};
