//! Recurring aggregation scheduler.
//!
//! Owns a single background task: an immediate first cycle, then one
//! cycle per interval tick. The cycle is awaited inline in the loop, so
//! two cycles can never overlap; a tick that fires while a cycle is still
//! settling is delayed, not stacked. Teardown cancels the loop and joins
//! the task, and nothing is published after cancellation.

use std::sync::Arc;
use std::time::Duration;

use pulse_map_catalog::AreaCatalog;
use pulse_map_source::AreaFetcher;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::cycle::run_cycle;
use crate::feed::SnapshotFeed;

/// Default refresh cadence.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Handle to the recurring aggregation task.
#[derive(Debug)]
pub struct Scheduler {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl Scheduler {
    /// Spawns the aggregation loop: one cycle immediately, then one per
    /// `every` tick, each published through `feed`.
    #[must_use]
    pub fn spawn(
        fetcher: Arc<dyn AreaFetcher>,
        catalog: Arc<AreaCatalog>,
        every: Duration,
        feed: Arc<SnapshotFeed>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            refresh_loop(fetcher, catalog, every, feed, token).await;
        });
        Self { handle, cancel }
    }

    /// Cancels the recurring loop and waits for the task to finish.
    ///
    /// An in-flight cycle is abandoned without publishing.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(error) = self.handle.await {
            log::error!("Aggregation task failed to join: {error}");
        }
    }
}

async fn refresh_loop(
    fetcher: Arc<dyn AreaFetcher>,
    catalog: Arc<AreaCatalog>,
    every: Duration,
    feed: Arc<SnapshotFeed>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    log::info!(
        "Aggregation loop started: {} areas every {every:?}",
        catalog.len(),
    );

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        feed.mark_in_flight();

        let outcome = tokio::select! {
            () = cancel.cancelled() => break,
            outcome = run_cycle(fetcher.as_ref(), &catalog) => outcome,
        };

        if outcome.snapshot.is_empty() && !outcome.failures.is_empty() {
            log::warn!(
                "Cycle produced no data ({} failures); keeping schedule and retrying next tick",
                outcome.failures.len(),
            );
        }

        feed.publish(outcome.snapshot);
    }

    log::info!("Aggregation loop stopped");
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pulse_map_metrics_models::RawMetricSample;
    use pulse_map_source::SourceError;

    use super::*;

    struct StaticFetcher;

    #[async_trait]
    impl AreaFetcher for StaticFetcher {
        async fn fetch_area(&self, area: &str) -> Result<RawMetricSample, SourceError> {
            Ok(RawMetricSample {
                area_name: Some(area.to_string()),
                congestion_label: Some("보통".to_string()),
                ..RawMetricSample::default()
            })
        }
    }

    fn one_area_catalog() -> Arc<AreaCatalog> {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"AREA_NM":"강남역"},
             "geometry":{"type":"Polygon","coordinates":[[[127.02,37.49],[127.03,37.49],[127.03,37.5],[127.02,37.49]]]}}
        ]}"#;
        Arc::new(AreaCatalog::from_geojson_str(json).unwrap())
    }

    #[tokio::test]
    async fn first_cycle_publishes_immediately() {
        let feed = Arc::new(SnapshotFeed::new());
        let mut rx = feed.subscribe();

        let scheduler = Scheduler::spawn(
            Arc::new(StaticFetcher),
            one_area_catalog(),
            Duration::from_secs(1800),
            Arc::clone(&feed),
        );

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
        assert!(!*feed.subscribe_in_flight().borrow());

        scheduler.shutdown().await;
    }

    #[tokio::test]
    async fn repeated_ticks_republish() {
        let feed = Arc::new(SnapshotFeed::new());
        let mut rx = feed.subscribe();

        let scheduler = Scheduler::spawn(
            Arc::new(StaticFetcher),
            one_area_catalog(),
            Duration::from_millis(10),
            Arc::clone(&feed),
        );

        rx.changed().await.unwrap();
        let first = rx.borrow().generated_at;
        rx.changed().await.unwrap();
        let second = rx.borrow().generated_at;
        assert!(second >= first);

        scheduler.shutdown().await;
    }

    #[tokio::test]
    async fn nothing_is_published_after_shutdown() {
        let feed = Arc::new(SnapshotFeed::new());
        let mut rx = feed.subscribe();

        let scheduler = Scheduler::spawn(
            Arc::new(StaticFetcher),
            one_area_catalog(),
            Duration::from_millis(10),
            Arc::clone(&feed),
        );

        rx.changed().await.unwrap();
        scheduler.shutdown().await;

        let _ = rx.borrow_and_update();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!rx.has_changed().unwrap_or(false));
    }
}
