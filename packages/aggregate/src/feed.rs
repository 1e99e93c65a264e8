//! Snapshot publication.
//!
//! The feed is the single point through which new snapshots become
//! visible: a watch channel holding an `Arc<Snapshot>`, replaced wholesale
//! when a cycle settles. Readers can only ever observe a fully settled
//! snapshot. A second watch channel carries the cycle-in-flight flag that
//! backs the loading indicator.

use std::sync::Arc;

use pulse_map_metrics_models::Snapshot;
use tokio::sync::watch;

/// Publisher/subscription hub for snapshots and the loading flag.
///
/// The scheduler is the sole writer; everything else subscribes.
#[derive(Debug)]
pub struct SnapshotFeed {
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    in_flight_tx: watch::Sender<bool>,
}

impl SnapshotFeed {
    /// Creates a feed holding an empty snapshot, with the in-flight flag
    /// raised until the first cycle lands.
    #[must_use]
    pub fn new() -> Self {
        let (snapshot_tx, _) = watch::channel(Arc::new(Snapshot::empty()));
        let (in_flight_tx, _) = watch::channel(true);
        Self {
            snapshot_tx,
            in_flight_tx,
        }
    }

    /// Atomically replaces the current snapshot and clears the in-flight
    /// flag.
    pub fn publish(&self, snapshot: Snapshot) {
        log::debug!(
            "Publishing snapshot with {} areas (generated {})",
            snapshot.len(),
            snapshot.generated_at,
        );
        self.snapshot_tx.send_replace(Arc::new(snapshot));
        self.in_flight_tx.send_replace(false);
    }

    /// Raises the in-flight flag for the duration of a cycle.
    pub fn mark_in_flight(&self) {
        self.in_flight_tx.send_replace(true);
    }

    /// Returns the latest fully settled snapshot.
    #[must_use]
    pub fn latest(&self) -> Arc<Snapshot> {
        self.snapshot_tx.borrow().clone()
    }

    /// Subscribes to snapshot replacements.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshot_tx.subscribe()
    }

    /// Subscribes to the cycle-in-flight flag (the loading indicator).
    #[must_use]
    pub fn subscribe_in_flight(&self) -> watch::Receiver<bool> {
        self.in_flight_tx.subscribe()
    }
}

impl Default for SnapshotFeed {
    fn default() -> Self {
        Self::new()
    }
}
