//! Headless map renderer.
//!
//! Stands in for a real tile engine when pulse-map runs as a data
//! service: it tracks sources and layers so overlay sync behaves exactly
//! as it would against a live map, and logs what a renderer would draw.

use std::collections::BTreeMap;

use geojson::{FeatureCollection, JsonObject};
use pulse_map_overlay::{ExtrusionLayerSpec, MapRenderer, OverlayError, ScreenPoint};

/// Renderer that records overlay state instead of drawing it.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    sources: BTreeMap<String, usize>,
    layers: Vec<String>,
}

impl MapRenderer for HeadlessRenderer {
    fn has_source(&self, source_id: &str) -> bool {
        self.sources.contains_key(source_id)
    }

    fn add_geojson_source(
        &mut self,
        source_id: &str,
        data: &FeatureCollection,
    ) -> Result<(), OverlayError> {
        log::info!(
            "renderer: created source {source_id} with {} features",
            data.features.len()
        );
        self.sources
            .insert(source_id.to_string(), data.features.len());
        Ok(())
    }

    fn set_source_data(
        &mut self,
        source_id: &str,
        data: &FeatureCollection,
    ) -> Result<(), OverlayError> {
        let Some(count) = self.sources.get_mut(source_id) else {
            return Err(OverlayError::Renderer {
                message: format!("no such source: {source_id}"),
            });
        };
        *count = data.features.len();
        log::info!(
            "renderer: source {source_id} now carries {} features",
            data.features.len()
        );
        Ok(())
    }

    fn add_fill_extrusion_layer(&mut self, spec: &ExtrusionLayerSpec) -> Result<(), OverlayError> {
        log::info!(
            "renderer: added extrusion layer {} over source {}",
            spec.id,
            spec.source
        );
        self.layers.push(spec.id.clone());
        Ok(())
    }

    fn query_features_at(&self, _point: ScreenPoint) -> Vec<JsonObject> {
        Vec::new()
    }

    fn fly_to(&mut self, center: [f64; 2], zoom: f64) {
        log::info!(
            "renderer: fly to [{:.4}, {:.4}] at zoom {zoom}",
            center[0],
            center[1]
        );
    }
}
