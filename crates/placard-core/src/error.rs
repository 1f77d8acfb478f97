//! # Error Types
//!
//! Domain-specific error types for placard-core.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field names, placement ids)
//! 3. Errors are enum variants, never String

use thiserror::Error;

/// Core domain errors.
///
/// These errors represent structurally invalid remote data. They should be
/// caught at the sync boundary and treated as a failed cycle, never as a
/// reason to crash the engine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The wire payload could not be decoded into a placement snapshot.
    ///
    /// ## When This Occurs
    /// - `placements` is present but not an array
    /// - a placement object is missing its id
    /// - a message object is missing its metadata or message id
    ///
    /// A *missing* `placements` array is NOT this error: absence is a valid
    /// clear-everything signal handled by [`crate::payload::parse_snapshot`].
    #[error("Malformed snapshot payload: {0}")]
    MalformedPayload(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::MalformedPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::MalformedPayload("placements is not an array".into());
        assert!(err.to_string().contains("placements is not an array"));
    }
}
