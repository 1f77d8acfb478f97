//! # Click Action Resolution
//!
//! Resolves a clicked message's target URL into a dispatchable action and
//! delegates execution to the host's action runner.
//!
//! ## URL Schemes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Click URL Handling                               │
//! │                                                                         │
//! │  action://<name>   ──► Custom action <name>                            │
//! │  itbl://<name>     ──► Custom action <name>  (legacy scheme, kept      │
//! │                        for compatibility with older campaigns)         │
//! │  anything else     ──► Open-URL action with the URL verbatim           │
//! │  empty string      ──► ignored, nothing dispatched                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

/// Scheme prefix for custom actions.
const SCHEME_ACTION: &str = "action://";

/// Legacy scheme prefix, handled identically to `action://`.
const SCHEME_LEGACY: &str = "itbl://";

// =============================================================================
// Action Types
// =============================================================================

/// Where an action originated. Reported to the runner so the host can
/// route or attribute execution per surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSource {
    /// An embedded-message surface.
    Embedded,
}

/// A dispatchable action resolved from a click URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EmbeddedAction {
    /// Named custom action handled by the host.
    Custom { name: String },

    /// Plain URL to open.
    OpenUrl { url: String },
}

impl EmbeddedAction {
    /// Resolves a clicked URL into an action.
    ///
    /// Returns `None` for an empty URL: nothing is dispatched.
    pub fn from_click_url(url: &str) -> Option<Self> {
        if url.is_empty() {
            return None;
        }

        if let Some(name) = url.strip_prefix(SCHEME_ACTION) {
            Some(EmbeddedAction::Custom { name: name.to_string() })
        } else if let Some(name) = url.strip_prefix(SCHEME_LEGACY) {
            Some(EmbeddedAction::Custom { name: name.to_string() })
        } else {
            Some(EmbeddedAction::OpenUrl { url: url.to_string() })
        }
    }
}

// =============================================================================
// Action Runner Trait
// =============================================================================

/// External action executor (deep links, browser, host callbacks).
pub trait ActionRunner: Send + Sync {
    /// Executes one resolved action.
    fn execute(&self, action: &EmbeddedAction, source: ActionSource);
}

/// No-op runner for hosts that do not handle clicks.
pub struct NoOpRunner;

impl ActionRunner for NoOpRunner {
    fn execute(&self, _action: &EmbeddedAction, _source: ActionSource) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_scheme_resolves_to_custom() {
        assert_eq!(
            EmbeddedAction::from_click_url("action://buy-now"),
            Some(EmbeddedAction::Custom { name: "buy-now".into() })
        );
    }

    #[test]
    fn test_legacy_scheme_resolves_to_custom() {
        assert_eq!(
            EmbeddedAction::from_click_url("itbl://hello"),
            Some(EmbeddedAction::Custom { name: "hello".into() })
        );
    }

    #[test]
    fn test_plain_url_resolves_to_open_url() {
        assert_eq!(
            EmbeddedAction::from_click_url("https://example.com/offer"),
            Some(EmbeddedAction::OpenUrl { url: "https://example.com/offer".into() })
        );
    }

    #[test]
    fn test_empty_url_is_ignored() {
        assert_eq!(EmbeddedAction::from_click_url(""), None);
    }
}
