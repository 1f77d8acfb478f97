//! # Session Tracker
//!
//! Tracks engagement sessions bounded by app foreground/background
//! transitions. Duration and metric computation is delegated to an
//! injected telemetry collaborator; this module only owns the session
//! window itself.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Lifecycle                                │
//! │                                                                         │
//! │  foreground ──► start_session()                                        │
//! │                   open already?  ──► close it (telemetry fires),       │
//! │                                      then open a fresh one             │
//! │                                                                         │
//! │  background ──► end_session()                                          │
//! │                   open?  ──► stamp ended_at, report to telemetry       │
//! │                   none?  ──► no-op                                     │
//! │                                                                         │
//! │  Detaching the last interested view also ends the session (wired in    │
//! │  the engine's remove_listener, a preserved legacy coupling).           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

// =============================================================================
// Session Value
// =============================================================================

/// One engagement session window.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedSession {
    /// Unique session identifier (UUID v4).
    pub id: String,

    /// When the session opened.
    pub started_at: DateTime<Utc>,

    /// When the session closed; `None` while still open.
    pub ended_at: Option<DateTime<Utc>>,
}

impl EmbeddedSession {
    fn open_now() -> Self {
        EmbeddedSession {
            id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Session duration, available once closed.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.ended_at.map(|end| end - self.started_at)
    }
}

// =============================================================================
// Telemetry Trait
// =============================================================================

/// External telemetry hook receiving closed sessions.
pub trait SessionTelemetry: Send + Sync {
    /// Records one closed session (`ended_at` is always set).
    fn track_session(&self, session: &EmbeddedSession);
}

/// No-op telemetry for hosts that do not report sessions.
pub struct NoOpTelemetry;

impl SessionTelemetry for NoOpTelemetry {
    fn track_session(&self, _session: &EmbeddedSession) {}
}

// =============================================================================
// Session Tracker
// =============================================================================

/// Owns the current session window, if any.
pub struct SessionTracker {
    telemetry: Arc<dyn SessionTelemetry>,
    current: Mutex<Option<EmbeddedSession>>,
}

impl SessionTracker {
    /// Creates a tracker reporting to the given telemetry collaborator.
    pub fn new(telemetry: Arc<dyn SessionTelemetry>) -> Self {
        SessionTracker {
            telemetry,
            current: Mutex::new(None),
        }
    }

    /// Opens a new session.
    ///
    /// If a session is already open it is closed and reported first, so a
    /// missed background transition never silently loses the earlier
    /// session's duration.
    pub fn start_session(&self) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(mut open) = current.take() {
            warn!(session_id = %open.id, "Session started while one was open, closing the old one");
            open.ended_at = Some(Utc::now());
            self.telemetry.track_session(&open);
        }

        let session = EmbeddedSession::open_now();
        debug!(session_id = %session.id, "Session started");
        *current = Some(session);
    }

    /// Closes the current session and reports it. No-op when none is open.
    pub fn end_session(&self) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());

        match current.take() {
            Some(mut session) => {
                session.ended_at = Some(Utc::now());
                debug!(session_id = %session.id, "Session ended");
                self.telemetry.track_session(&session);
            }
            None => debug!("end_session with no open session, ignoring"),
        }
    }

    /// Returns true while a session is open.
    pub fn is_active(&self) -> bool {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    struct RecordingTelemetry {
        sessions: StdMutex<Vec<EmbeddedSession>>,
    }

    impl RecordingTelemetry {
        fn new() -> Arc<Self> {
            Arc::new(RecordingTelemetry {
                sessions: StdMutex::new(Vec::new()),
            })
        }

        fn count(&self) -> usize {
            self.sessions.lock().unwrap().len()
        }
    }

    impl SessionTelemetry for RecordingTelemetry {
        fn track_session(&self, session: &EmbeddedSession) {
            self.sessions.lock().unwrap().push(session.clone());
        }
    }

    #[test]
    fn test_start_then_end_reports_once() {
        let telemetry = RecordingTelemetry::new();
        let tracker = SessionTracker::new(telemetry.clone());

        tracker.start_session();
        assert!(tracker.is_active());
        tracker.end_session();

        assert!(!tracker.is_active());
        assert_eq!(telemetry.count(), 1);
        let sessions = telemetry.sessions.lock().unwrap();
        assert!(sessions[0].ended_at.is_some());
        assert!(sessions[0].duration().is_some());
    }

    #[test]
    fn test_end_without_start_is_noop() {
        let telemetry = RecordingTelemetry::new();
        let tracker = SessionTracker::new(telemetry.clone());

        tracker.end_session();
        assert_eq!(telemetry.count(), 0);
    }

    #[test]
    fn test_double_start_closes_first_session() {
        let telemetry = RecordingTelemetry::new();
        let tracker = SessionTracker::new(telemetry.clone());

        tracker.start_session();
        tracker.start_session();

        // The first session was closed and reported, the second is open.
        assert_eq!(telemetry.count(), 1);
        assert!(tracker.is_active());

        tracker.end_session();
        assert_eq!(telemetry.count(), 2);

        let sessions = telemetry.sessions.lock().unwrap();
        assert_ne!(sessions[0].id, sessions[1].id);
    }
}
