#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Citydata metric fetching and normalization.
//!
//! One request per area per configured dataset family (crowd population,
//! commercial activity), parsed leniently: missing tags become absent
//! fields, unparsable numbers become zero, and only transport-level
//! problems surface as errors. A failed area never affects its siblings;
//! the aggregation layer decides what to do with the failure.

pub mod citydata;
pub mod normalize;
pub mod retry;
pub mod taxonomy;
pub mod xml;

use async_trait::async_trait;
use pulse_map_metrics_models::RawMetricSample;

pub use citydata::{CityDataClient, Dataset};
pub use normalize::normalize;

/// Capability of fetching one area's raw metrics.
///
/// The aggregation layer fans out over this trait, so cycle behavior can
/// be exercised without touching the network.
#[async_trait]
pub trait AreaFetcher: Send + Sync {
    /// Fetches the raw metric sample for `area`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on a transport-level failure for this area.
    async fn fetch_area(&self, area: &str) -> Result<RawMetricSample, SourceError>;
}

/// Errors that can occur while fetching one area's metrics.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP {status}")]
    Status {
        /// The response status code.
        status: reqwest::StatusCode,
    },

    /// Response body was not a well-formed XML document.
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Client was constructed without any dataset key.
    #[error("at least one dataset API key must be configured")]
    NoDatasetConfigured,
}
