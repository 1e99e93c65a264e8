//! Catalog × snapshot join.
//!
//! One feature per area present in both the catalog and the snapshot;
//! areas without a current metric contribute nothing (a visual no-data
//! state, not an error). Pure: identical inputs yield identical output,
//! feature order following catalog order.

use geojson::{Feature, FeatureCollection, JsonObject};
use pulse_map_catalog::AreaCatalog;
use pulse_map_metrics_models::{NormalizedAreaMetric, Snapshot};

/// Property key carrying the area name, kept in the upstream spelling so
/// click handlers and panels read one canonical key.
pub const AREA_NAME_KEY: &str = "AREA_NM";

/// Joins the catalog with a snapshot into a renderable feature
/// collection.
#[must_use]
pub fn merge(catalog: &AreaCatalog, snapshot: &Snapshot) -> FeatureCollection {
    let features: Vec<Feature> = catalog
        .areas()
        .iter()
        .filter_map(|area| {
            let metric = snapshot.get(&area.name)?;
            Some(Feature {
                bbox: None,
                geometry: Some(area.geometry.clone()),
                id: None,
                properties: Some(feature_properties(&area.name, metric)),
                foreign_members: None,
            })
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Serializes a metric into feature properties, adding the area name.
fn feature_properties(name: &str, metric: &NormalizedAreaMetric) -> JsonObject {
    let mut properties = match serde_json::to_value(metric) {
        Ok(serde_json::Value::Object(map)) => map,
        // NormalizedAreaMetric always serializes to an object.
        _ => JsonObject::new(),
    };
    properties.insert(
        AREA_NAME_KEY.to_string(),
        serde_json::Value::String(name.to_string()),
    );
    properties
}
