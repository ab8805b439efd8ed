//! Validation trait definition

/// Validation trait for configuration sections
pub trait Validate {
    /// Returns a human readable reason when the section is invalid
    fn validate(&self) -> Result<(), String>;
}
