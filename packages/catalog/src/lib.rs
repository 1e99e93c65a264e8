#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Static area geometry catalog.
//!
//! Loads a `GeoJSON` `FeatureCollection` with one feature per district,
//! each carrying a unique `AREA_NM` property. The catalog is immutable for
//! the lifetime of the process; every aggregation cycle and every overlay
//! merge joins against it by area name.

use std::path::Path;
use std::str::FromStr;

use geojson::{GeoJson, Geometry, Value};

/// The default area catalog baked into the binary at compile time.
const EMBEDDED_AREAS: &str = include_str!("../assets/seoul_areas.geojson");

/// Errors that can occur while loading the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input was not valid `GeoJSON`.
    #[error("GeoJSON parse error: {0}")]
    Geojson(#[from] geojson::Error),

    /// Input parsed but was not a `FeatureCollection`.
    #[error("expected a GeoJSON FeatureCollection")]
    NotFeatureCollection,

    /// Two features carried the same `AREA_NM`.
    #[error("duplicate area name in catalog: {name}")]
    DuplicateArea {
        /// The offending area name.
        name: String,
    },

    /// No usable features were found.
    #[error("catalog contains no usable areas")]
    Empty,
}

/// One named district and its boundary geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaDescriptor {
    /// Unique area name (`AREA_NM`).
    pub name: String,
    /// Boundary geometry, usually a polygon.
    pub geometry: Geometry,
}

impl AreaDescriptor {
    /// Returns a reference coordinate for this area: the first coordinate
    /// of a polygon's first exterior ring, or `None` for non-polygon
    /// geometry.
    #[must_use]
    pub fn anchor_coordinate(&self) -> Option<[f64; 2]> {
        match &self.geometry.value {
            Value::Polygon(rings) => {
                let position = rings.first()?.first()?;
                Some([*position.first()?, *position.get(1)?])
            }
            _ => None,
        }
    }
}

/// Immutable collection of all known areas, in catalog file order.
#[derive(Debug, Clone)]
pub struct AreaCatalog {
    areas: Vec<AreaDescriptor>,
}

impl AreaCatalog {
    /// Loads the catalog that is embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the embedded asset is malformed.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_geojson_str(EMBEDDED_AREAS)
    }

    /// Loads a catalog from a `GeoJSON` file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_geojson_str(&content)
    }

    /// Parses a catalog from `GeoJSON` text.
    ///
    /// Features without an `AREA_NM` property or without geometry are
    /// skipped with a warning; duplicate names are an error.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the input is not a `FeatureCollection`,
    /// contains duplicate area names, or yields no usable areas.
    pub fn from_geojson_str(content: &str) -> Result<Self, CatalogError> {
        let GeoJson::FeatureCollection(collection) = GeoJson::from_str(content)? else {
            return Err(CatalogError::NotFeatureCollection);
        };

        let mut areas: Vec<AreaDescriptor> = Vec::with_capacity(collection.features.len());

        for feature in collection.features {
            let Some(name) = feature
                .properties
                .as_ref()
                .and_then(|props| props.get("AREA_NM"))
                .and_then(serde_json::Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())
            else {
                log::warn!("Skipping catalog feature without an AREA_NM property");
                continue;
            };

            let Some(geometry) = feature.geometry else {
                log::warn!("Skipping catalog feature {name}: no geometry");
                continue;
            };

            if areas.iter().any(|area| area.name == name) {
                return Err(CatalogError::DuplicateArea {
                    name: name.to_string(),
                });
            }

            areas.push(AreaDescriptor {
                name: name.to_string(),
                geometry,
            });
        }

        if areas.is_empty() {
            return Err(CatalogError::Empty);
        }

        log::debug!("Loaded area catalog with {} areas", areas.len());
        Ok(Self { areas })
    }

    /// All areas, in catalog order.
    #[must_use]
    pub fn areas(&self) -> &[AreaDescriptor] {
        &self.areas
    }

    /// Exact-match lookup by area name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&AreaDescriptor> {
        self.areas.iter().find(|area| area.name == name)
    }

    /// Number of areas in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Returns `true` if the catalog has no areas.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_json(features: &str) -> String {
        format!(r#"{{"type":"FeatureCollection","features":[{features}]}}"#)
    }

    fn polygon_feature(name: &str, first: [f64; 2]) -> String {
        format!(
            r#"{{"type":"Feature","properties":{{"AREA_NM":"{name}"}},"geometry":{{"type":"Polygon","coordinates":[[[{},{}],[{},{}],[{},{}],[{},{}]]]}}}}"#,
            first[0],
            first[1],
            first[0] + 0.01,
            first[1],
            first[0] + 0.01,
            first[1] + 0.01,
            first[0],
            first[1],
        )
    }

    #[test]
    fn loads_named_polygon_features() {
        let json = catalog_json(&polygon_feature("강남역", [127.027, 37.497]));
        let catalog = AreaCatalog::from_geojson_str(&json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.find("강남역").is_some());
        assert!(catalog.find("홍대입구역").is_none());
    }

    #[test]
    fn anchor_is_first_ring_first_coordinate() {
        let json = catalog_json(&polygon_feature("Gangnam", [127.027, 37.497]));
        let catalog = AreaCatalog::from_geojson_str(&json).unwrap();
        let anchor = catalog.find("Gangnam").unwrap().anchor_coordinate();
        assert_eq!(anchor, Some([127.027, 37.497]));
    }

    #[test]
    fn non_polygon_geometry_has_no_anchor() {
        let json = catalog_json(
            r#"{"type":"Feature","properties":{"AREA_NM":"Point Area"},"geometry":{"type":"Point","coordinates":[127.0,37.5]}}"#,
        );
        let catalog = AreaCatalog::from_geojson_str(&json).unwrap();
        assert_eq!(catalog.find("Point Area").unwrap().anchor_coordinate(), None);
    }

    #[test]
    fn skips_features_without_name() {
        let unnamed = r#"{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[127.0,37.5]}}"#;
        let json = catalog_json(&format!(
            "{},{}",
            unnamed,
            polygon_feature("명동", [126.985, 37.563])
        ));
        let catalog = AreaCatalog::from_geojson_str(&json).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn rejects_duplicate_names() {
        let json = catalog_json(&format!(
            "{},{}",
            polygon_feature("명동", [126.985, 37.563]),
            polygon_feature("명동", [126.986, 37.564])
        ));
        assert!(matches!(
            AreaCatalog::from_geojson_str(&json),
            Err(CatalogError::DuplicateArea { name }) if name == "명동"
        ));
    }

    #[test]
    fn rejects_empty_collection() {
        let json = catalog_json("");
        assert!(matches!(
            AreaCatalog::from_geojson_str(&json),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn embedded_catalog_parses() {
        let catalog = AreaCatalog::embedded().unwrap();
        assert!(!catalog.is_empty());
        for area in catalog.areas() {
            assert!(area.anchor_coordinate().is_some(), "{} has no anchor", area.name);
        }
    }
}
