// Module declarations
mod config_store;
mod connection;
mod location_ops;
mod matcher_ops;
mod namespace_ops;
mod rule_ops;
#[cfg(test)]
mod tests;
mod types;
mod upstream_ops;

// Re-export public types
pub use types::{DatabaseBackendType, SeaOrmDatabase};
