//! Raw sample to canonical metric conversion.
//!
//! Severity comes from the commercial-activity label when one is present,
//! falling back to the congestion label; the detailed category list is
//! grouped by large category with duplicate mid categories dropped.

use pulse_map_metrics_models::{
    CategoryGroup, MidCategoryCount, NormalizedAreaMetric, RawCategoryEntry, RawMetricSample,
    SeverityLevel,
};

use crate::taxonomy::severity_from_label;

/// Converts one raw per-area sample into the canonical record.
#[must_use]
pub fn normalize(raw: &RawMetricSample) -> NormalizedAreaMetric {
    NormalizedAreaMetric {
        severity: resolve_severity(raw),
        population_min: raw.population_min,
        population_max: raw.population_max,
        payment_count: raw.payment_count,
        payment_min: raw.payment_min,
        payment_max: raw.payment_max,
        observed_at: raw.observed_at.clone(),
        categories: group_categories(&raw.categories),
    }
}

fn resolve_severity(raw: &RawMetricSample) -> SeverityLevel {
    match severity_from_label(raw.commercial_label.as_deref()) {
        SeverityLevel::Unknown => severity_from_label(raw.congestion_label.as_deref()),
        level => level,
    }
}

/// Groups detailed entries by large category in first-seen order,
/// de-duplicating mid categories within each group (first wins).
#[must_use]
pub fn group_categories(entries: &[RawCategoryEntry]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for entry in entries {
        let mid = MidCategoryCount {
            mid_category: entry.mid_category.clone(),
            payment_count: entry.payment_count,
        };

        if let Some(group) = groups
            .iter_mut()
            .find(|group| group.large_category == entry.large_category)
        {
            let duplicate = group
                .mid_categories
                .iter()
                .any(|existing| existing.mid_category == mid.mid_category);
            if !duplicate {
                group.mid_categories.push(mid);
            }
        } else {
            groups.push(CategoryGroup {
                large_category: entry.large_category.clone(),
                mid_categories: vec![mid],
            });
        }
    }

    groups
}
