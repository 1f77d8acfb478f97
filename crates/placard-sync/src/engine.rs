//! # Embedded Agent
//!
//! Main orchestrator for the sync engine. Drives fetch-reconcile-notify
//! cycles, owns the placement cache, and bridges app-lifecycle transitions
//! into session and sync activity.
//!
//! ## Cycle Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        One Sync Cycle                                   │
//! │                                                                         │
//! │  sync()                                                                 │
//! │    │  engine disabled? ──► Skipped                                      │
//! │    ▼                                                                    │
//! │  fetcher.fetch_snapshot(known_message_ids)        (only await point)   │
//! │    │                                                                    │
//! │    ├─ Err(fatal)      ──► notify_disabled() ──► MessagingDisabled      │
//! │    ├─ Err(transient)  ──► log only          ──► TransientFailure       │
//! │    ▼                                                                    │
//! │  parse_snapshot(payload)                                               │
//! │    ├─ Err             ──► log only          ──► MalformedPayload       │
//! │    ▼                                                                    │
//! │  reconciler.reconcile(snapshot)     (behind one mutex, serialized;     │
//! │    │                                 stale responses discarded via     │
//! │    │                                 monotonic cycle counter)          │
//! │    ▼                                                                    │
//! │  changed? ──► notify_updated()      ──► Applied { changed }            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Reconciliation runs behind a single async mutex, restoring the
//! single-writer invariant for the cache. Overlapping `sync()` calls race
//! only at the fetch; whichever response reaches the apply phase first
//! wins its slot, and a response from an older cycle is discarded once a
//! newer cycle has applied. Listener callbacks run synchronously on the
//! task that completed the cycle. In-flight fetches are never cancelled; a
//! hung fetch delays only its own cycle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use placard_core::{parse_snapshot, EmbeddedMessage, PlacementId};

use crate::actions::{ActionRunner, ActionSource, EmbeddedAction, NoOpRunner};
use crate::config::PlacardConfig;
use crate::error::{SyncError, SyncResult};
use crate::fetcher::EmbeddedFetcher;
use crate::listeners::{ListenerRegistry, UpdateListener};
use crate::reconcile::{NoOpTracker, ReceiptTracker, Reconciler};
use crate::session::{NoOpTelemetry, SessionTelemetry, SessionTracker};

// =============================================================================
// Sync Outcome
// =============================================================================

/// Report of one `sync()` call. Informational only: no failure ever
/// surfaces as an error to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The engine is disabled by configuration; nothing was fetched.
    Skipped,

    /// The snapshot was applied. `changed` mirrors whether listeners were
    /// notified.
    Applied { changed: bool },

    /// The response arrived after a newer cycle had already applied its
    /// snapshot and was discarded.
    Stale,

    /// Transient fetch failure; cache untouched, nobody notified.
    TransientFailure,

    /// Fatal fetch failure; the disabled hook was broadcast.
    MessagingDisabled,

    /// The payload could not be decoded; cache untouched, nobody notified.
    MalformedPayload,
}

// =============================================================================
// Engine State
// =============================================================================

/// Cache state guarded by the cycle mutex.
struct EngineState {
    reconciler: Reconciler,

    /// Highest cycle number whose snapshot has been applied.
    last_applied_cycle: u64,
}

// =============================================================================
// Embedded Agent
// =============================================================================

/// Client-side sync engine for placement-scoped embedded messages.
///
/// Constructed with injected collaborators (fetcher, receipt tracker,
/// action runner, session telemetry); hosts hold one instance and pass it
/// explicitly to lifecycle callbacks. No ambient singletons.
pub struct EmbeddedAgent {
    /// Engine configuration.
    config: Arc<PlacardConfig>,

    /// External snapshot fetch.
    fetcher: Arc<dyn EmbeddedFetcher>,

    /// Receipt analytics hook.
    tracker: Arc<dyn ReceiptTracker>,

    /// Click action executor.
    runner: Arc<dyn ActionRunner>,

    /// Cache state; the mutex serializes reconciliation cycles.
    state: Mutex<EngineState>,

    /// Update subscribers.
    listeners: ListenerRegistry,

    /// Engagement session window.
    session: SessionTracker,

    /// Monotonic sync-cycle counter.
    cycle: AtomicU64,
}

impl EmbeddedAgent {
    /// Creates an agent with no-op analytics, actions, and telemetry.
    pub fn new(config: PlacardConfig, fetcher: Arc<dyn EmbeddedFetcher>) -> Self {
        EmbeddedAgent {
            config: Arc::new(config),
            fetcher,
            tracker: Arc::new(NoOpTracker),
            runner: Arc::new(NoOpRunner),
            state: Mutex::new(EngineState {
                reconciler: Reconciler::new(),
                last_applied_cycle: 0,
            }),
            listeners: ListenerRegistry::new(),
            session: SessionTracker::new(Arc::new(NoOpTelemetry)),
            cycle: AtomicU64::new(0),
        }
    }

    /// Starts building an agent with custom collaborators.
    pub fn builder(config: PlacardConfig) -> EmbeddedAgentBuilder {
        EmbeddedAgentBuilder::new(config)
    }

    // =========================================================================
    // Sync Cycle
    // =========================================================================

    /// Runs one fetch-reconcile-notify cycle.
    ///
    /// Never returns an error: every failure mode is logged and reported
    /// through the returned [`SyncOutcome`] (and, for fatal failures, the
    /// listeners' disabled hook).
    pub async fn sync(&self) -> SyncOutcome {
        if !self.config.is_enabled() {
            debug!("Sync skipped, engine disabled by configuration");
            return SyncOutcome::Skipped;
        }

        let cycle = self.cycle.fetch_add(1, Ordering::SeqCst) + 1;
        let known = {
            let state = self.state.lock().await;
            state.reconciler.known_message_ids()
        };

        debug!(cycle, known_ids = known.len(), "Syncing messages");

        let payload = match self.fetcher.fetch_snapshot(&known).await {
            Ok(payload) => payload,
            Err(failure) if failure.is_fatal() => {
                error!(cycle, %failure, "Fatal fetch failure, stopping sync");
                self.listeners.notify_disabled();
                return SyncOutcome::MessagingDisabled;
            }
            Err(failure) => {
                warn!(cycle, %failure, "Error while fetching embedded messages");
                return SyncOutcome::TransientFailure;
            }
        };

        let snapshot = match parse_snapshot(&payload) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(cycle, error = %e, "Discarding undecodable snapshot");
                return SyncOutcome::MalformedPayload;
            }
        };

        let changed = {
            let mut state = self.state.lock().await;
            if state.last_applied_cycle > cycle {
                debug!(
                    cycle,
                    last_applied = state.last_applied_cycle,
                    "Discarding stale response, a newer cycle already applied"
                );
                return SyncOutcome::Stale;
            }

            let outcome = state.reconciler.reconcile(snapshot, self.tracker.as_ref());
            state.last_applied_cycle = cycle;
            outcome.changed
        };

        if changed {
            info!(cycle, "Visible message state changed, notifying listeners");
            self.listeners.notify_updated();
        }

        SyncOutcome::Applied { changed }
    }

    /// Clears the cache and all remembered bookkeeping without notifying
    /// listeners. Hosts that need a UI refresh afterwards should request a
    /// fresh `sync()`.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.reconciler.reset();
    }

    // =========================================================================
    // Cache Accessors
    // =========================================================================

    /// Returns the cached messages for a placement, in snapshot order, or
    /// `None` when the placement is not cached.
    pub async fn get_messages(&self, placement_id: PlacementId) -> Option<Vec<EmbeddedMessage>> {
        let state = self.state.lock().await;
        state.reconciler.messages(placement_id).map(<[_]>::to_vec)
    }

    /// Returns the placement ids currently cached, ascending.
    pub async fn get_placement_ids(&self) -> Vec<PlacementId> {
        let state = self.state.lock().await;
        state.reconciler.placement_ids()
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Registers an update listener. Duplicates are allowed.
    pub fn add_listener(&self, listener: Arc<dyn UpdateListener>) {
        self.listeners.add(listener);
    }

    /// Removes the first matching registration.
    ///
    /// Also ends the current session: detaching an interested view is
    /// treated as an implicit session-quit signal (preserved legacy
    /// behavior).
    pub fn remove_listener(&self, listener: &Arc<dyn UpdateListener>) {
        self.listeners.remove(listener);
        self.session.end_session();
    }

    /// Returns the registered listeners, in order.
    pub fn get_listeners(&self) -> Vec<Arc<dyn UpdateListener>> {
        self.listeners.all()
    }

    // =========================================================================
    // Click Handling
    // =========================================================================

    /// Resolves a clicked message's target URL and dispatches it to the
    /// action runner. Empty URLs are ignored.
    pub fn handle_click(
        &self,
        message: Option<&EmbeddedMessage>,
        button_id: Option<&str>,
        clicked_url: &str,
    ) {
        let Some(action) = EmbeddedAction::from_click_url(clicked_url) else {
            debug!("Ignoring click with empty URL");
            return;
        };

        debug!(
            message_id = message.map(|m| m.id()),
            button_id,
            ?action,
            "Dispatching embedded click"
        );
        self.runner.execute(&action, ActionSource::Embedded);
    }

    // =========================================================================
    // App-State Integration
    // =========================================================================

    /// Foreground transition: open a session, then run one sync cycle.
    pub async fn on_foreground(&self) {
        if self.config.session_tracking_enabled() {
            self.session.start_session();
        }
        if self.config.sync_on_foreground() {
            self.sync().await;
        }
    }

    /// Background transition: close the session. No sync is triggered and
    /// no in-flight fetch is cancelled.
    pub fn on_background(&self) {
        self.session.end_session();
    }

    /// Returns true while an engagement session is open.
    pub fn is_session_active(&self) -> bool {
        self.session.is_active()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for creating an [`EmbeddedAgent`] with custom collaborators.
pub struct EmbeddedAgentBuilder {
    config: PlacardConfig,
    fetcher: Option<Arc<dyn EmbeddedFetcher>>,
    tracker: Option<Arc<dyn ReceiptTracker>>,
    runner: Option<Arc<dyn ActionRunner>>,
    telemetry: Option<Arc<dyn SessionTelemetry>>,
}

impl EmbeddedAgentBuilder {
    /// Creates a new builder with the given config.
    pub fn new(config: PlacardConfig) -> Self {
        EmbeddedAgentBuilder {
            config,
            fetcher: None,
            tracker: None,
            runner: None,
            telemetry: None,
        }
    }

    /// Sets the snapshot fetcher (required).
    pub fn with_fetcher(mut self, fetcher: Arc<dyn EmbeddedFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Sets the receipt-tracking analytics hook.
    pub fn with_receipt_tracker(mut self, tracker: Arc<dyn ReceiptTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Sets the click action runner.
    pub fn with_action_runner(mut self, runner: Arc<dyn ActionRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Sets the session telemetry hook.
    pub fn with_session_telemetry(mut self, telemetry: Arc<dyn SessionTelemetry>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Builds the agent.
    pub fn build(self) -> SyncResult<EmbeddedAgent> {
        let fetcher = self.fetcher.ok_or(SyncError::MissingFetcher)?;
        let telemetry = self.telemetry.unwrap_or_else(|| Arc::new(NoOpTelemetry));

        Ok(EmbeddedAgent {
            config: Arc::new(self.config),
            fetcher,
            tracker: self.tracker.unwrap_or_else(|| Arc::new(NoOpTracker)),
            runner: self.runner.unwrap_or_else(|| Arc::new(NoOpRunner)),
            state: Mutex::new(EngineState {
                reconciler: Reconciler::new(),
                last_applied_cycle: 0,
            }),
            listeners: ListenerRegistry::new(),
            session: SessionTracker::new(telemetry),
            cycle: AtomicU64::new(0),
        })
    }
}
