//! One full aggregation cycle.
//!
//! All per-area fetches are issued up front and joined together, so a slow
//! or failing area never blocks or cancels its siblings. The snapshot is
//! keyed by the catalog name that was queried, not the name the endpoint
//! echoes back, so catalog joins cannot drift.

use std::collections::BTreeMap;

use chrono::Utc;
use futures::future::join_all;
use pulse_map_catalog::AreaCatalog;
use pulse_map_metrics_models::{NormalizedAreaMetric, Snapshot};
use pulse_map_source::{AreaFetcher, SourceError, normalize};

/// A fetch that failed for one area during a cycle.
#[derive(Debug)]
pub struct AreaFailure {
    /// The catalog area name that was queried.
    pub area: String,
    /// What went wrong.
    pub error: SourceError,
}

/// Result of one fully settled cycle.
#[derive(Debug)]
pub struct CycleOutcome {
    /// Complete snapshot built from the successful fetches.
    pub snapshot: Snapshot,
    /// Areas whose fetch failed this cycle; absent from the snapshot.
    pub failures: Vec<AreaFailure>,
}

impl CycleOutcome {
    /// Number of areas that produced a metric this cycle.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.snapshot.len()
    }
}

/// Runs one aggregation cycle across every catalog area, fully
/// concurrently, and waits for all outcomes to settle.
///
/// Failures are collected per area and never abort the cycle; a cycle in
/// which every area fails still settles and yields an empty snapshot.
pub async fn run_cycle(fetcher: &dyn AreaFetcher, catalog: &AreaCatalog) -> CycleOutcome {
    let fetches = catalog.areas().iter().map(|area| async {
        let outcome = fetcher.fetch_area(&area.name).await;
        (area.name.as_str(), outcome)
    });

    let mut areas: BTreeMap<String, NormalizedAreaMetric> = BTreeMap::new();
    let mut failures: Vec<AreaFailure> = Vec::new();

    for (name, outcome) in join_all(fetches).await {
        match outcome {
            Ok(sample) => {
                areas.insert(name.to_string(), normalize(&sample));
            }
            Err(error) => {
                log::warn!("Fetch failed for {name}: {error}");
                failures.push(AreaFailure {
                    area: name.to_string(),
                    error,
                });
            }
        }
    }

    let snapshot = Snapshot {
        areas,
        generated_at: Utc::now(),
    };

    log::info!(
        "Cycle settled: {} of {} areas reported ({} failed)",
        snapshot.len(),
        catalog.len(),
        failures.len(),
    );

    CycleOutcome { snapshot, failures }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pulse_map_metrics_models::RawMetricSample;

    use super::*;

    /// Fetcher that fails a configurable set of areas.
    struct ScriptedFetcher {
        failing: Mutex<HashSet<String>>,
    }

    impl ScriptedFetcher {
        fn failing(areas: &[&str]) -> Self {
            Self {
                failing: Mutex::new(areas.iter().map(ToString::to_string).collect()),
            }
        }

        fn recover(&self) {
            self.failing.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl AreaFetcher for ScriptedFetcher {
        async fn fetch_area(&self, area: &str) -> Result<RawMetricSample, SourceError> {
            if self.failing.lock().unwrap().contains(area) {
                return Err(SourceError::Status {
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                });
            }
            Ok(RawMetricSample {
                area_name: Some(area.to_string()),
                commercial_label: Some("바쁜".to_string()),
                payment_count: 10,
                ..RawMetricSample::default()
            })
        }
    }

    fn three_area_catalog() -> AreaCatalog {
        let features: Vec<String> = ["강남역", "명동 관광특구", "여의도"]
            .iter()
            .map(|name| {
                format!(
                    r#"{{"type":"Feature","properties":{{"AREA_NM":"{name}"}},"geometry":{{"type":"Polygon","coordinates":[[[127.0,37.5],[127.01,37.5],[127.01,37.51],[127.0,37.5]]]}}}}"#
                )
            })
            .collect();
        let json = format!(
            r#"{{"type":"FeatureCollection","features":[{}]}}"#,
            features.join(",")
        );
        AreaCatalog::from_geojson_str(&json).unwrap()
    }

    #[tokio::test]
    async fn partial_failures_still_settle_the_cycle() {
        let catalog = three_area_catalog();
        let fetcher = ScriptedFetcher::failing(&["명동 관광특구"]);

        let outcome = run_cycle(&fetcher, &catalog).await;

        assert_eq!(outcome.succeeded(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].area, "명동 관광특구");
        assert!(outcome.snapshot.contains("강남역"));
        assert!(!outcome.snapshot.contains("명동 관광특구"));
    }

    #[tokio::test]
    async fn later_cycle_recovers_all_areas() {
        let catalog = three_area_catalog();
        let fetcher = ScriptedFetcher::failing(&["강남역", "여의도"]);

        let first = run_cycle(&fetcher, &catalog).await;
        assert_eq!(first.succeeded(), 1);

        fetcher.recover();
        let second = run_cycle(&fetcher, &catalog).await;
        assert_eq!(second.succeeded(), 3);
        assert!(second.failures.is_empty());
    }

    #[tokio::test]
    async fn every_area_failing_yields_an_empty_snapshot() {
        let catalog = three_area_catalog();
        let fetcher = ScriptedFetcher::failing(&["강남역", "명동 관광특구", "여의도"]);

        let outcome = run_cycle(&fetcher, &catalog).await;

        assert!(outcome.snapshot.is_empty());
        assert_eq!(outcome.failures.len(), 3);
    }

    #[tokio::test]
    async fn successful_samples_are_normalized() {
        let catalog = three_area_catalog();
        let fetcher = ScriptedFetcher::failing(&[]);

        let outcome = run_cycle(&fetcher, &catalog).await;
        let metric = outcome.snapshot.get("강남역").unwrap();
        assert_eq!(
            metric.severity,
            pulse_map_metrics_models::SeverityLevel::Crowded
        );
        assert_eq!(metric.payment_count, 10);
    }
}
