//! # Placard Sync
//!
//! Client-side sync engine for placement-scoped embedded messages.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         EmbeddedAgent                                   │
//! │                                                                         │
//! │  ┌───────────┐   snapshot   ┌────────────┐   diff    ┌──────────────┐  │
//! │  │ Fetcher   │ ───────────► │ Reconciler │ ────────► │ Listeners    │  │
//! │  │ (dyn)     │              │ (cache)    │  changed  │ (fan-out)    │  │
//! │  └───────────┘              └────────────┘           └──────────────┘  │
//! │        ▲                          │                                     │
//! │        │ known ids                │ receipts (exactly once)             │
//! │        └──────────────────────────┴──► ReceiptTracker (dyn)            │
//! │                                                                         │
//! │  SessionTracker ◄── on_foreground / on_background / remove_listener    │
//! │  ActionRunner   ◄── handle_click                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The agent pulls full placement snapshots through an injected
//! [`EmbeddedFetcher`], diffs them against its in-memory cache, fires
//! first-delivery receipts exactly once per message id, and notifies
//! registered [`UpdateListener`]s only when the visible state actually
//! changed. All failure modes are absorbed and logged; `sync()` never
//! returns an error.

pub mod actions;
pub mod config;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod listeners;
pub mod reconcile;
pub mod session;

pub use actions::{ActionRunner, ActionSource, EmbeddedAction, NoOpRunner};
pub use config::PlacardConfig;
pub use engine::{EmbeddedAgent, EmbeddedAgentBuilder, SyncOutcome};
pub use error::{SyncError, SyncResult};
pub use fetcher::{EmbeddedFetcher, FetchFailure, RawPayload};
pub use listeners::{ListenerRegistry, UpdateListener};
pub use reconcile::{NoOpTracker, ReceiptTracker, ReconcileOutcome, Reconciler};
pub use session::{EmbeddedSession, NoOpTelemetry, SessionTelemetry, SessionTracker};
