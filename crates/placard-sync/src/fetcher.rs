//! # Fetch Collaborator Boundary
//!
//! This module defines **only** the fetch contract and its failure type.
//! No HTTP client, no auth, no retry policy belongs here: the host
//! application owns transport and injects an implementation.
//!
//! ## Failure Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fetch Failure Kinds                              │
//! │                                                                         │
//! │  FATAL (stop the cycle, broadcast disabled)                            │
//! │  ──────────────────────────────────────────                            │
//! │  • SubscriptionInactive  - feature turned off server-side              │
//! │  • InvalidApiKey         - credential rejected                         │
//! │                                                                         │
//! │  TRANSIENT (log, abort cycle, cache untouched, no notification)        │
//! │  ──────────────────────────────────────────────────────────────        │
//! │  • Network   - connect/timeout/DNS failures                            │
//! │  • Server    - 5xx-style upstream errors                               │
//! │  • Other     - anything else, reason string preserved                  │
//! │                                                                         │
//! │  No automatic retry exists for either class; recovery is a future      │
//! │  sync() call driven by the host.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The failure kind is decided by the collaborator, not by string matching
//! in the engine. [`FetchFailure::from_reason`] exists as a bridge for
//! transports that only surface the legacy reason string.

use async_trait::async_trait;
use thiserror::Error;

/// Legacy sentinel reason marking a server-side feature shutoff.
const REASON_SUBSCRIPTION_INACTIVE: &str = "SUBSCRIPTION_INACTIVE";

/// Legacy sentinel reason marking a rejected credential.
const REASON_INVALID_API_KEY: &str = "Invalid API Key";

// =============================================================================
// Fetch Failure
// =============================================================================

/// A failed snapshot fetch, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// The embedded-messaging subscription is inactive. Fatal: the engine
    /// broadcasts the disabled hook and expects the host to stop syncing.
    #[error("Subscription is inactive")]
    SubscriptionInactive,

    /// The API credential was rejected. Fatal, same handling as
    /// [`FetchFailure::SubscriptionInactive`].
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Network-level failure (connect, timeout, DNS).
    #[error("Network failure: {0}")]
    Network(String),

    /// The server answered with an error.
    #[error("Server failure: {0}")]
    Server(String),

    /// Any other failure, reason preserved verbatim.
    #[error("Fetch failed: {0}")]
    Other(String),
}

impl FetchFailure {
    /// Classifies a legacy failure-reason string.
    ///
    /// The two fatal sentinels are matched case-insensitively; everything
    /// else becomes [`FetchFailure::Other`] with the reason preserved.
    pub fn from_reason(reason: &str) -> Self {
        if reason.eq_ignore_ascii_case(REASON_SUBSCRIPTION_INACTIVE) {
            FetchFailure::SubscriptionInactive
        } else if reason.eq_ignore_ascii_case(REASON_INVALID_API_KEY) {
            FetchFailure::InvalidApiKey
        } else {
            FetchFailure::Other(reason.to_string())
        }
    }

    /// Returns true if this failure disables messaging for the caller.
    ///
    /// Fatal failures abort the cycle and fire the disabled hook; the
    /// engine itself stays usable, but the host is expected to stop
    /// requesting syncs.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FetchFailure::SubscriptionInactive | FetchFailure::InvalidApiKey
        )
    }
}

// =============================================================================
// Fetcher Trait
// =============================================================================

/// Raw fetch payload, decoded later by `placard_core::parse_snapshot`.
pub type RawPayload = serde_json::Value;

/// External snapshot-fetch contract.
///
/// Implementations must be object-safe so the agent can hold an
/// `Arc<dyn EmbeddedFetcher>` without knowing the concrete transport, and
/// `Send + Sync` so fetches can cross task boundaries.
#[async_trait]
pub trait EmbeddedFetcher: Send + Sync {
    /// Fetches the current placement snapshot.
    ///
    /// `known_message_ids` is the full set of message ids the client has
    /// ever seen, passed as a de-duplication hint to the server. The
    /// payload is returned raw; decoding and diffing happen in the engine.
    async fn fetch_snapshot(&self, known_message_ids: &[String])
        -> Result<RawPayload, FetchFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_sentinels_case_insensitive() {
        assert_eq!(
            FetchFailure::from_reason("subscription_inactive"),
            FetchFailure::SubscriptionInactive
        );
        assert_eq!(
            FetchFailure::from_reason("INVALID API KEY"),
            FetchFailure::InvalidApiKey
        );
    }

    #[test]
    fn test_unknown_reason_is_other() {
        let failure = FetchFailure::from_reason("HTTP 503");
        assert_eq!(failure, FetchFailure::Other("HTTP 503".into()));
        assert!(!failure.is_fatal());
    }

    #[test]
    fn test_fatality() {
        assert!(FetchFailure::SubscriptionInactive.is_fatal());
        assert!(FetchFailure::InvalidApiKey.is_fatal());
        assert!(!FetchFailure::Network("timeout".into()).is_fatal());
        assert!(!FetchFailure::Server("500".into()).is_fatal());
    }
}
