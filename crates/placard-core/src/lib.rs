//! # placard-core: Pure Domain Model for Placard
//!
//! This crate is the **heart** of Placard. It contains the embedded-message
//! domain model as pure value types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Placard Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Host Application                             │   │
//! │  │    placement UIs ──► click handlers ──► lifecycle callbacks    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                placard-sync (engine crate)                      │   │
//! │  │    reconciliation, sync cycles, sessions, listener fan-out     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ placard-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │  payload  │  │   error   │                  │   │
//! │  │   │  Message  │  │  snapshot │  │ CoreError │                  │   │
//! │  │   │ Placement │  │  decoding │  │           │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE VALUE TYPES                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (EmbeddedMessage, Placement, elements)
//! - [`payload`] - Wire payload decoding into placement snapshots
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Immutable Values**: messages and placements are replaced wholesale,
//!    never patched field-by-field
//! 2. **No I/O**: network and file system access is FORBIDDEN here
//! 3. **Stable Identity**: equality is keyed by stable identifiers
//!    (string message id, integer placement id)
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod payload;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use placard_core::EmbeddedMessage` instead of
// `use placard_core::types::EmbeddedMessage`

pub use error::CoreError;
pub use payload::parse_snapshot;
pub use types::*;
