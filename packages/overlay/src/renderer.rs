//! Map renderer capability.
//!
//! The real tile engine lives outside this system; everything the core
//! needs from it is captured here as an object-safe trait: source/layer
//! upserts, point queries against the rendered overlay, and camera moves.

use geojson::{FeatureCollection, JsonObject};

use crate::OverlayError;

/// A screen-space point, as delivered by a click event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// Horizontal pixel offset.
    pub x: f64,
    /// Vertical pixel offset.
    pub y: f64,
}

/// Everything needed to create the 3D extrusion layer once.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrusionLayerSpec {
    /// Layer identifier.
    pub id: String,
    /// Backing source identifier.
    pub source: String,
    /// Categorical color expression.
    pub color: serde_json::Value,
    /// Categorical height expression.
    pub height: serde_json::Value,
    /// Fill opacity.
    pub opacity: f64,
}

/// Operations the overlay consumes from the map rendering engine.
pub trait MapRenderer {
    /// Returns `true` if a source with this id already exists.
    fn has_source(&self, source_id: &str) -> bool;

    /// Creates a geojson-backed source.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError`] if the renderer rejects the source.
    fn add_geojson_source(
        &mut self,
        source_id: &str,
        data: &FeatureCollection,
    ) -> Result<(), OverlayError>;

    /// Replaces an existing source's data in place.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError`] if the source does not exist.
    fn set_source_data(
        &mut self,
        source_id: &str,
        data: &FeatureCollection,
    ) -> Result<(), OverlayError>;

    /// Adds the 3D extrusion layer over its source.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError`] if the renderer rejects the layer.
    fn add_fill_extrusion_layer(&mut self, spec: &ExtrusionLayerSpec) -> Result<(), OverlayError>;

    /// Returns the properties of overlay features rendered at a screen
    /// point, topmost first.
    fn query_features_at(&self, point: ScreenPoint) -> Vec<JsonObject>;

    /// Moves the camera to a coordinate at a zoom level.
    fn fly_to(&mut self, center: [f64; 2], zoom: f64);
}
