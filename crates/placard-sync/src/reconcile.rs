//! # Reconciliation Engine
//!
//! Diffs the in-memory placement cache against a full server snapshot,
//! applies the snapshot as the new cache state, and reports whether the
//! visible state changed.
//!
//! ## Cache Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Reconciler State                                 │
//! │                                                                         │
//! │  placements: BTreeMap<PlacementId, Vec<EmbeddedMessage>>               │
//! │      current visible state, item order = latest snapshot order         │
//! │                                                                         │
//! │  seen_message_ids: BTreeSet<String>                                    │
//! │      every message id ever cached, across all placements and syncs;    │
//! │      gates the "received" side effect to at-most-once per id and is    │
//! │      sent to the server as a de-duplication hint                       │
//! │                                                                         │
//! │  placement_baseline: BTreeSet<PlacementId>                             │
//! │      placement ids of the last applied snapshot; kept separately from  │
//! │      the map because an all-manifest placement never creates a map     │
//! │      entry but still counts as "present" for removal detection         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Change Detection
//! `changed` is set by structural differences only:
//! - a message id never seen before appears (fires `track_received` once)
//! - a previously cached message disappears from its placement
//! - a placement present in the baseline disappears from the snapshot
//! - a non-empty cache is cleared by an empty snapshot
//!
//! Re-ordering items inside a placement updates the stored order but does
//! NOT count as a change, and a message moving between placements fires
//! `changed` through its removal from the old placement, never a second
//! "received" track.
//!
//! Each placement's new list is built fresh from the snapshot (filtered of
//! content-less manifest entries) rather than by mutating the prior list
//! in place.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use placard_core::{EmbeddedMessage, Placement, PlacementId};

// =============================================================================
// Receipt Tracker Trait
// =============================================================================

/// Fire-and-forget analytics hook for newly received messages.
///
/// Called at most once per message id for the lifetime of the cache, even
/// when an id reappears in later snapshots or moves between placements.
pub trait ReceiptTracker: Send + Sync {
    /// Records one message as received.
    fn track_received(&self, message: &EmbeddedMessage);
}

/// No-op receipt tracker for hosts that do not report analytics.
pub struct NoOpTracker;

impl ReceiptTracker for NoOpTracker {
    fn track_received(&self, _message: &EmbeddedMessage) {}
}

// =============================================================================
// Reconcile Outcome
// =============================================================================

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Whether the visible state changed (listeners must be notified).
    pub changed: bool,

    /// Messages newly tracked as received during this pass.
    pub received: usize,

    /// Placements deleted because they left the snapshot.
    pub removed_placements: usize,
}

// =============================================================================
// Reconciler
// =============================================================================

/// Owns the placement cache and applies snapshots to it.
///
/// Process-lifetime state: created empty, mutated only inside
/// [`Reconciler::reconcile`], cleared by [`Reconciler::reset`] or by an
/// empty snapshot.
#[derive(Debug, Default)]
pub struct Reconciler {
    /// Current cached messages per placement, in latest-snapshot order.
    placements: BTreeMap<PlacementId, Vec<EmbeddedMessage>>,

    /// Every message id ever cached (receipt-tracking gate).
    seen_message_ids: BTreeSet<String>,

    /// Placement ids of the last applied snapshot.
    placement_baseline: BTreeSet<PlacementId>,
}

impl Reconciler {
    /// Creates an empty reconciler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a full snapshot to the cache.
    ///
    /// Newly received messages are reported to `tracker` before the pass
    /// returns; the returned outcome says whether listeners must be
    /// notified.
    pub fn reconcile(
        &mut self,
        snapshot: Vec<Placement>,
        tracker: &dyn ReceiptTracker,
    ) -> ReconcileOutcome {
        // Empty snapshot: a deliberate "nothing is live" signal. Clears the
        // whole cache including the receipt-tracking gate, so messages can
        // be re-received if the server turns the feature back on.
        if snapshot.is_empty() {
            let was_empty = self.placements.is_empty();
            self.placements.clear();
            self.seen_message_ids.clear();
            self.placement_baseline.clear();

            if was_empty {
                trace!("Empty snapshot over empty cache, nothing to do");
            } else {
                debug!("Empty snapshot, cache cleared");
            }
            return ReconcileOutcome {
                changed: !was_empty,
                ..Default::default()
            };
        }

        let mut outcome = ReconcileOutcome::default();
        let mut current_ids: BTreeSet<PlacementId> = BTreeSet::new();

        for placement in snapshot {
            current_ids.insert(placement.id);
            self.apply_placement(placement, tracker, &mut outcome);
        }

        // Placements absent from the snapshot are removed wholesale.
        let removed: Vec<PlacementId> = self
            .placement_baseline
            .difference(&current_ids)
            .copied()
            .collect();
        for id in &removed {
            self.placements.remove(id);
            debug!(placement_id = id, "Placement removed");
        }
        if !removed.is_empty() {
            outcome.changed = true;
            outcome.removed_placements = removed.len();
        }

        // New baseline regardless of whether anything changed.
        self.placement_baseline = current_ids;

        debug!(
            changed = outcome.changed,
            received = outcome.received,
            removed_placements = outcome.removed_placements,
            "Reconciliation pass complete"
        );
        outcome
    }

    /// Applies one placement from the snapshot.
    fn apply_placement(
        &mut self,
        placement: Placement,
        tracker: &dyn ReceiptTracker,
        outcome: &mut ReconcileOutcome,
    ) {
        let placement_id = placement.id;

        // Fresh ordered list from the snapshot, manifest entries dropped.
        let mut next: Vec<EmbeddedMessage> = Vec::with_capacity(placement.messages.len());
        let mut snapshot_ids: BTreeSet<&str> = BTreeSet::new();

        for message in &placement.messages {
            if !message.has_content() {
                trace!(
                    message_id = message.id(),
                    placement_id,
                    "Skipping content-less manifest entry"
                );
                continue;
            }

            snapshot_ids.insert(message.id());

            if !self.seen_message_ids.contains(message.id()) {
                debug!(message_id = message.id(), placement_id, "New message received");
                tracker.track_received(message);
                self.seen_message_ids.insert(message.id().to_string());
                outcome.changed = true;
                outcome.received += 1;
            }

            next.push(message.clone());
        }

        match self.placements.get(&placement_id) {
            Some(prior) => {
                // Any previously cached message missing from the snapshot
                // is a removal.
                for old in prior {
                    if !snapshot_ids.contains(old.id()) {
                        debug!(
                            message_id = old.id(),
                            placement_id,
                            "Message removed from placement"
                        );
                        outcome.changed = true;
                    }
                }
                self.placements.insert(placement_id, next);
            }
            None => {
                // A placement whose filtered list is empty never creates an
                // entry; an empty list is only stored once at least one
                // message has been cached for it.
                if !next.is_empty() {
                    self.placements.insert(placement_id, next);
                }
            }
        }
    }

    /// Clears all cache state without notifying anyone.
    pub fn reset(&mut self) {
        self.placements.clear();
        self.seen_message_ids.clear();
        self.placement_baseline.clear();
        debug!("Reconciler state reset");
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the cached messages for a placement, in snapshot order.
    pub fn messages(&self, placement_id: PlacementId) -> Option<&[EmbeddedMessage]> {
        self.placements.get(&placement_id).map(Vec::as_slice)
    }

    /// Returns the placement ids currently present in the cache, ascending.
    pub fn placement_ids(&self) -> Vec<PlacementId> {
        self.placements.keys().copied().collect()
    }

    /// Returns every message id ever seen, in deterministic order.
    ///
    /// Sent to the server with each fetch as a de-duplication hint.
    pub fn known_message_ids(&self) -> Vec<String> {
        self.seen_message_ids.iter().cloned().collect()
    }
}
