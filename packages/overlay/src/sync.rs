//! Idempotent overlay synchronization.
//!
//! The first sync for a map instance creates the data source and the
//! extrusion layer; every later sync only replaces the source data. The
//! source and layer handles therefore stay stable across snapshot
//! replacements, which is what keeps hover state alive and prevents a
//! full-layer flicker on refresh.

use geojson::FeatureCollection;

use crate::renderer::{ExtrusionLayerSpec, MapRenderer};
use crate::{OverlayError, paint};

/// Identifier of the overlay's geojson source.
pub const SOURCE_ID: &str = "area-metrics";

/// Identifier of the overlay's extrusion layer.
pub const LAYER_ID: &str = "area-metrics-3d";

/// Keeps a renderer's overlay source in sync with merged collections.
#[derive(Debug, Default)]
pub struct OverlaySync;

impl OverlaySync {
    /// Upserts the merged collection into the renderer.
    ///
    /// Creates source and layer on first use (checked against the
    /// renderer itself, so a fresh map instance always gets its layer);
    /// afterwards only the data payload changes.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError`] if the renderer rejects an operation.
    pub fn sync<R: MapRenderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        collection: &FeatureCollection,
    ) -> Result<(), OverlayError> {
        if renderer.has_source(SOURCE_ID) {
            renderer.set_source_data(SOURCE_ID, collection)?;
            log::debug!(
                "Overlay data replaced: {} features",
                collection.features.len()
            );
            return Ok(());
        }

        renderer.add_geojson_source(SOURCE_ID, collection)?;
        renderer.add_fill_extrusion_layer(&ExtrusionLayerSpec {
            id: LAYER_ID.to_string(),
            source: SOURCE_ID.to_string(),
            color: paint::color_match_expression(),
            height: paint::height_match_expression(),
            opacity: paint::FILL_OPACITY,
        })?;
        log::info!(
            "Overlay created: source {SOURCE_ID}, layer {LAYER_ID}, {} features",
            collection.features.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use geojson::JsonObject;

    use crate::renderer::ScreenPoint;

    use super::*;

    /// Records every renderer operation for assertions.
    #[derive(Default)]
    struct RecordingRenderer {
        sources: Vec<(String, String)>,
        layers: Vec<ExtrusionLayerSpec>,
        data_updates: Vec<(String, String)>,
    }

    impl RecordingRenderer {
        fn current_data(&self) -> Option<&str> {
            self.data_updates
                .last()
                .map(|(_, data)| data.as_str())
                .or_else(|| self.sources.last().map(|(_, data)| data.as_str()))
        }
    }

    impl MapRenderer for RecordingRenderer {
        fn has_source(&self, source_id: &str) -> bool {
            self.sources.iter().any(|(id, _)| id == source_id)
        }

        fn add_geojson_source(
            &mut self,
            source_id: &str,
            data: &FeatureCollection,
        ) -> Result<(), OverlayError> {
            self.sources.push((
                source_id.to_string(),
                serde_json::to_string(data).unwrap(),
            ));
            Ok(())
        }

        fn set_source_data(
            &mut self,
            source_id: &str,
            data: &FeatureCollection,
        ) -> Result<(), OverlayError> {
            if !self.has_source(source_id) {
                return Err(OverlayError::Renderer {
                    message: format!("no such source: {source_id}"),
                });
            }
            self.data_updates.push((
                source_id.to_string(),
                serde_json::to_string(data).unwrap(),
            ));
            Ok(())
        }

        fn add_fill_extrusion_layer(
            &mut self,
            spec: &ExtrusionLayerSpec,
        ) -> Result<(), OverlayError> {
            self.layers.push(spec.clone());
            Ok(())
        }

        fn query_features_at(&self, _point: ScreenPoint) -> Vec<JsonObject> {
            Vec::new()
        }

        fn fly_to(&mut self, _center: [f64; 2], _zoom: f64) {}
    }

    fn collection(feature_names: &[&str]) -> FeatureCollection {
        let features = feature_names
            .iter()
            .map(|name| geojson::Feature {
                bbox: None,
                geometry: None,
                id: None,
                properties: Some({
                    let mut props = JsonObject::new();
                    props.insert("AREA_NM".to_string(), serde_json::json!(name));
                    props.insert("severity".to_string(), serde_json::json!("busy"));
                    props
                }),
                foreign_members: None,
            })
            .collect();
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    #[test]
    fn first_sync_creates_source_and_layer() {
        let mut renderer = RecordingRenderer::default();
        let mut sync = OverlaySync::default();

        sync.sync(&mut renderer, &collection(&["강남역"])).unwrap();

        assert_eq!(renderer.sources.len(), 1);
        assert_eq!(renderer.sources[0].0, SOURCE_ID);
        assert_eq!(renderer.layers.len(), 1);
        assert_eq!(renderer.layers[0].id, LAYER_ID);
        assert_eq!(renderer.layers[0].source, SOURCE_ID);
        assert!(renderer.data_updates.is_empty());
    }

    #[test]
    fn later_syncs_only_replace_data() {
        let mut renderer = RecordingRenderer::default();
        let mut sync = OverlaySync::default();

        sync.sync(&mut renderer, &collection(&["강남역"])).unwrap();
        sync.sync(&mut renderer, &collection(&["강남역", "여의도"]))
            .unwrap();
        sync.sync(&mut renderer, &collection(&["여의도"])).unwrap();

        assert_eq!(renderer.sources.len(), 1, "source must not be recreated");
        assert_eq!(renderer.layers.len(), 1, "layer must not be recreated");
        assert_eq!(renderer.data_updates.len(), 2);
    }

    #[test]
    fn repeated_sync_with_equal_input_is_idempotent() {
        let mut renderer = RecordingRenderer::default();
        let mut sync = OverlaySync::default();
        let data = collection(&["강남역", "여의도"]);

        sync.sync(&mut renderer, &data).unwrap();
        sync.sync(&mut renderer, &data).unwrap();

        let expected = serde_json::to_string(&data).unwrap();
        assert_eq!(renderer.current_data(), Some(expected.as_str()));
        assert_eq!(renderer.layers.len(), 1);
    }

    #[test]
    fn layer_paint_uses_severity_match_expressions() {
        let mut renderer = RecordingRenderer::default();
        let mut sync = OverlaySync::default();

        sync.sync(&mut renderer, &collection(&[])).unwrap();

        let spec = &renderer.layers[0];
        assert_eq!(spec.color[0], "match");
        assert_eq!(spec.height[0], "match");
        assert!((spec.opacity - 0.5).abs() < f64::EPSILON);
    }
}
