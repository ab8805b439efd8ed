//! Domain records for the config center
//!
//! These are the shapes written to the fast store, so field names and the
//! `1`/`0` status encoding are part of the key contract with the data plane.

pub mod location;
pub mod matcher;
pub mod namespace;
pub mod rule;
pub mod status;
pub mod upstream;

pub use location::*;
pub use matcher::*;
pub use namespace::*;
pub use rule::*;
pub use status::Status;
pub use upstream::*;

/// Timestamp type used on every record
pub type Timestamp = chrono::DateTime<chrono::Utc>;
