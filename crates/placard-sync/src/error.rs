//! # Sync Error Types
//!
//! Error types for engine operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Payload      │  │     Construction        │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  ConfigLoad     │  │  Payload        │  │  MissingFetcher         │ │
//! │  │  ConfigSave     │  │  (from core)    │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fetch failures are deliberately NOT part of this enum: the fetch
//! collaborator reports a tagged [`crate::fetcher::FetchFailure`], and no
//! failure of any kind crosses the `sync()` boundary as an error.

use thiserror::Error;

/// Result type alias for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Engine error type.
///
/// ## Design Principles
/// - Each variant includes enough context for debugging
/// - Errors are categorized for different handling strategies
/// - All errors are `Send + Sync` for async compatibility
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// The fetched payload could not be decoded into a snapshot.
    #[error("Snapshot payload error: {0}")]
    Payload(#[from] placard_core::CoreError),

    // =========================================================================
    // Construction Errors
    // =========================================================================
    /// The agent builder was finalized without a fetch collaborator.
    #[error("A fetcher is required to build the agent")]
    MissingFetcher,
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SyncError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::ConfigLoadFailed(_) | SyncError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if this error came from decoding remote data.
    pub fn is_payload_error(&self) -> bool {
        matches!(self, SyncError::Payload(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_category() {
        assert!(SyncError::ConfigLoadFailed("io".into()).is_config_error());
        assert!(SyncError::ConfigSaveFailed("io".into()).is_config_error());
        assert!(!SyncError::MissingFetcher.is_config_error());
    }

    #[test]
    fn test_malformed_config_is_load_error() {
        let err = SyncError::from(toml::from_str::<toml::Value>("not = [valid").unwrap_err());
        assert!(err.is_config_error());
    }

    #[test]
    fn test_payload_error_category() {
        let core = placard_core::CoreError::MalformedPayload("not an array".into());
        let err = SyncError::from(core);
        assert!(err.is_payload_error());
        assert!(err.to_string().contains("not an array"));
    }
}
