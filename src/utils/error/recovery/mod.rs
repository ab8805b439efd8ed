//! Error recovery utilities

mod retry;

pub use retry::RetryPolicy;
