#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Severity taxonomy and per-area metric record types.
//!
//! This crate defines the canonical activity scale used across the entire
//! pulse-map system. Both upstream vocabularies (crowd congestion and
//! commercial activity) normalize onto the same four ordered levels, with
//! an explicit fallback for anything the endpoints invent later.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Activity level for a district, from 1 (calm) to 4 (crowded).
///
/// [`SeverityLevel::Unknown`] is the fallback for absent or unrecognized
/// upstream labels; it is never produced for a label in the fixed
/// vocabulary.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SeverityLevel {
    /// Level 1: sparse foot traffic, little commercial activity.
    Calm = 1,
    /// Level 2: ordinary weekday level.
    Moderate = 2,
    /// Level 3: noticeably above normal.
    Busy = 3,
    /// Level 4: peak congestion / peak commercial activity.
    Crowded = 4,
    /// Absent or unrecognized upstream label.
    Unknown = 0,
}

impl SeverityLevel {
    /// Returns the numeric rank of this level (0 for [`Self::Unknown`]).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Returns `true` for the four fixed levels, `false` for the fallback.
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Returns the four fixed levels in ascending order, fallback excluded.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Calm, Self::Moderate, Self::Busy, Self::Crowded]
    }
}

/// One `<CMRCL_RSB>` element of a commercial-activity response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategoryEntry {
    /// Large (top-level) business category label.
    pub large_category: String,
    /// Mid-level business category label.
    pub mid_category: String,
    /// Payment count reported for this category.
    pub payment_count: u64,
}

/// Per-area result of one fetch, before normalization.
///
/// Numeric fields are already zero-defaulted by the lenient extraction in
/// the fetcher; labels stay raw so the taxonomy mapping happens in exactly
/// one place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMetricSample {
    /// Area name echoed by the endpoint, when present.
    pub area_name: Option<String>,
    /// Raw congestion label (`AREA_CONGEST_LVL`).
    pub congestion_label: Option<String>,
    /// Raw commercial-activity label (`AREA_CMRCL_LVL`).
    pub commercial_label: Option<String>,
    /// Upstream observation time (`PPLTN_TIME`), raw text.
    pub observed_at: Option<String>,
    /// Lower population bound.
    pub population_min: u64,
    /// Upper population bound.
    pub population_max: u64,
    /// Total payment count across the area.
    pub payment_count: u64,
    /// Minimum payment amount.
    pub payment_min: u64,
    /// Maximum payment amount.
    pub payment_max: u64,
    /// Detailed per-category entries, in response order.
    pub categories: Vec<RawCategoryEntry>,
}

/// A mid-level category and its payment count within a [`CategoryGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MidCategoryCount {
    /// Mid-level business category label.
    pub mid_category: String,
    /// Payment count reported for this mid category.
    pub payment_count: u64,
}

/// Detailed categories grouped by large category.
///
/// Groups appear in first-seen order; mid categories within a group are
/// de-duplicated by label, first occurrence winning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    /// Large (top-level) business category label.
    pub large_category: String,
    /// Distinct mid categories under this large category.
    pub mid_categories: Vec<MidCategoryCount>,
}

/// Canonical per-area record after taxonomy normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAreaMetric {
    /// Canonical activity level.
    pub severity: SeverityLevel,
    /// Lower population bound.
    pub population_min: u64,
    /// Upper population bound.
    pub population_max: u64,
    /// Total payment count across the area.
    pub payment_count: u64,
    /// Minimum payment amount.
    pub payment_min: u64,
    /// Maximum payment amount.
    pub payment_max: u64,
    /// Upstream observation time, raw text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<String>,
    /// Grouped, de-duplicated category breakdown.
    pub categories: Vec<CategoryGroup>,
}

/// Latest known state across all areas, as of the most recent fully
/// settled aggregation cycle.
///
/// Replaced wholesale each cycle, never merged incrementally. Keyed by the
/// catalog area name. `BTreeMap` so everything derived from a snapshot
/// iterates in a stable order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Per-area metrics.
    pub areas: BTreeMap<String, NormalizedAreaMetric>,
    /// When this cycle settled.
    pub generated_at: DateTime<Utc>,
}

impl Snapshot {
    /// Creates an empty snapshot stamped now.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            areas: BTreeMap::new(),
            generated_at: Utc::now(),
        }
    }

    /// Returns the metric for `area`, if the last cycle produced one.
    #[must_use]
    pub fn get(&self, area: &str) -> Option<&NormalizedAreaMetric> {
        self.areas.get(area)
    }

    /// Returns `true` if the last cycle produced a metric for `area`.
    #[must_use]
    pub fn contains(&self, area: &str) -> bool {
        self.areas.contains_key(area)
    }

    /// Number of areas with a current metric.
    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Returns `true` if no area has a current metric.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}
