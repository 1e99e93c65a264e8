//! Seoul citydata endpoint client.
//!
//! One logical fetch per area: a request to each configured dataset family
//! (`citydata_ppltn` for crowd population, `citydata_cmrcl` for commercial
//! activity), merged into a single [`RawMetricSample`]. Field extraction is
//! tag-oriented and lenient; see [`crate::xml`].

use async_trait::async_trait;
use pulse_map_metrics_models::{RawCategoryEntry, RawMetricSample};
use roxmltree::Document;

use crate::{AreaFetcher, SourceError, retry, xml};

/// Default public endpoint base.
pub const DEFAULT_BASE_URL: &str = "http://openapi.seoul.go.kr:8088";

/// Placeholder for absent category labels, kept verbatim in the output.
const MISSING_LABEL: &str = "N/A";

/// The two citydata dataset families this client understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// Crowd population and congestion (`citydata_ppltn`).
    Population,
    /// Commercial activity and payments (`citydata_cmrcl`).
    Commercial,
}

impl Dataset {
    /// URL path segment for this dataset.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Population => "citydata_ppltn",
            Self::Commercial => "citydata_cmrcl",
        }
    }
}

/// Client for the per-area citydata endpoints.
///
/// Holds one API key per dataset family; families without a key are
/// skipped entirely. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CityDataClient {
    http: reqwest::Client,
    base_url: String,
    population_key: Option<String>,
    commercial_key: Option<String>,
}

impl CityDataClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::NoDatasetConfigured`] if neither dataset key
    /// is provided.
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        population_key: Option<String>,
        commercial_key: Option<String>,
    ) -> Result<Self, SourceError> {
        if population_key.is_none() && commercial_key.is_none() {
            return Err(SourceError::NoDatasetConfigured);
        }
        Ok(Self {
            http,
            base_url: base_url.into(),
            population_key,
            commercial_key,
        })
    }

    /// Fetches and extracts the metrics for one area.
    ///
    /// Issues one request per configured dataset and merges the results.
    /// Missing tags become absent fields or zero defaults; only a
    /// transport failure or an unparsable XML body fails the area.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when any configured dataset request fails.
    /// The caller isolates the failure to this area.
    #[allow(clippy::future_not_send)]
    pub async fn fetch_area(&self, area: &str) -> Result<RawMetricSample, SourceError> {
        let mut sample = RawMetricSample::default();

        if let Some(key) = &self.population_key {
            let body = self.fetch_body(key, Dataset::Population, area).await?;
            apply_population_body(&mut sample, &body)?;
        }

        if let Some(key) = &self.commercial_key {
            let body = self.fetch_body(key, Dataset::Commercial, area).await?;
            apply_commercial_body(&mut sample, &body)?;
        }

        log::trace!(
            "Fetched {area}: congestion={:?} commercial={:?} categories={}",
            sample.congestion_label,
            sample.commercial_label,
            sample.categories.len(),
        );
        Ok(sample)
    }

    #[allow(clippy::future_not_send)]
    async fn fetch_body(
        &self,
        key: &str,
        dataset: Dataset,
        area: &str,
    ) -> Result<String, SourceError> {
        let url = endpoint_url(&self.base_url, key, dataset, area);
        retry::send_text(|| self.http.get(&url)).await
    }
}

#[async_trait]
impl AreaFetcher for CityDataClient {
    async fn fetch_area(&self, area: &str) -> Result<RawMetricSample, SourceError> {
        Self::fetch_area(self, area).await
    }
}

/// Builds the per-area request URL. Area names are Korean, so the final
/// path segment is percent-encoded.
#[must_use]
pub fn endpoint_url(base_url: &str, key: &str, dataset: Dataset, area: &str) -> String {
    format!(
        "{}/{key}/xml/{}/1/5/{}",
        base_url.trim_end_matches('/'),
        dataset.path(),
        urlencoding::encode(area),
    )
}

/// Extracts the population-dataset fields from a response body into
/// `sample`.
///
/// # Errors
///
/// Returns [`SourceError::Xml`] if the body is not well-formed XML.
pub fn apply_population_body(
    sample: &mut RawMetricSample,
    body: &str,
) -> Result<(), SourceError> {
    let doc = Document::parse(body)?;

    if sample.area_name.is_none() {
        sample.area_name = xml::tag_text(&doc, "AREA_NM").map(ToOwned::to_owned);
    }
    sample.population_min = xml::lenient_u64(xml::tag_text(&doc, "AREA_PPLTN_MIN"));
    sample.population_max = xml::lenient_u64(xml::tag_text(&doc, "AREA_PPLTN_MAX"));
    sample.congestion_label = xml::tag_text(&doc, "AREA_CONGEST_LVL").map(ToOwned::to_owned);
    sample.observed_at = xml::tag_text(&doc, "PPLTN_TIME").map(ToOwned::to_owned);

    Ok(())
}

/// Extracts the commercial-dataset fields from a response body into
/// `sample`.
///
/// # Errors
///
/// Returns [`SourceError::Xml`] if the body is not well-formed XML.
pub fn apply_commercial_body(
    sample: &mut RawMetricSample,
    body: &str,
) -> Result<(), SourceError> {
    let doc = Document::parse(body)?;

    if sample.area_name.is_none() {
        sample.area_name = xml::tag_text(&doc, "AREA_NM").map(ToOwned::to_owned);
    }
    sample.commercial_label = xml::tag_text(&doc, "AREA_CMRCL_LVL").map(ToOwned::to_owned);
    sample.payment_count = xml::lenient_u64(xml::tag_text(&doc, "AREA_SH_PAYMENT_CNT"));
    sample.payment_min = xml::lenient_u64(xml::tag_text(&doc, "AREA_SH_PAYMENT_AMT_MIN"));
    sample.payment_max = xml::lenient_u64(xml::tag_text(&doc, "AREA_SH_PAYMENT_AMT_MAX"));

    sample.categories = xml::tagged_elements(&doc, "CMRCL_RSB")
        .map(|element| RawCategoryEntry {
            large_category: xml::child_text(element, "RSB_LRG_CTGR")
                .unwrap_or(MISSING_LABEL)
                .to_string(),
            mid_category: xml::child_text(element, "RSB_MID_CTGR")
                .unwrap_or(MISSING_LABEL)
                .to_string(),
            payment_count: xml::lenient_u64(xml::child_text(element, "RSB_SH_PAYMENT_CNT")),
        })
        .collect();

    Ok(())
}
