/// Location rule entity module
pub mod location;
/// Message matcher entity module
pub mod matcher;
/// Namespace entity module
pub mod namespace;
/// Rule entity module
pub mod rule;
/// Upstream server entity module
pub mod upstream;

pub use location::Entity as Location;
pub use matcher::Entity as Matcher;
pub use namespace::Entity as Namespace;
pub use rule::Entity as Rule;
pub use upstream::Entity as Upstream;

use crate::core::models::{Status, Timestamp};
use sea_orm::entity::prelude::DateTimeWithTimeZone;

/// Any non-zero status column reads as enabled
pub(crate) fn status_from_db(value: i32) -> Status {
    if value == 0 { Status::Disabled } else { Status::Enabled }
}

pub(crate) fn to_utc(value: &DateTimeWithTimeZone) -> Timestamp {
    value.with_timezone(&chrono::Utc)
}

/// Parse an optional JSON text column, dropping values that are not JSON
pub(crate) fn json_column(value: &Option<String>) -> Option<serde_json::Value> {
    value.as_deref().and_then(|raw| serde_json::from_str(raw).ok())
}

pub(crate) fn json_text(value: &Option<serde_json::Value>) -> Option<String> {
    value.as_ref().map(|v| v.to_string())
}
