//! Area name search and camera navigation.
//!
//! Stateless: resolves a typed name against the static catalog only,
//! never the live snapshot, so search works even while data is loading.

use pulse_map_catalog::AreaCatalog;

/// Zoom level used when flying to a found area.
pub const SEARCH_ZOOM: f64 = 14.0;

/// A camera move the renderer should perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigateCommand {
    /// Target coordinate (lng, lat).
    pub center: [f64; 2],
    /// Target zoom level.
    pub zoom: f64,
}

/// User-visible search failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// No catalog area has this name.
    #[error("no area named \"{0}\" was found")]
    NotFound(String),

    /// The area exists but its geometry yields no reference coordinate.
    #[error("no usable coordinates for \"{0}\"")]
    GeometryUnusable(String),
}

/// Resolves a typed query to a fly-to command.
///
/// The query is trimmed, then matched exactly (case-sensitive) against
/// catalog area names.
///
/// # Errors
///
/// Returns [`SearchError::NotFound`] for an unknown name and
/// [`SearchError::GeometryUnusable`] for an area without a polygon
/// anchor; both messages embed the queried name.
pub fn search(catalog: &AreaCatalog, query: &str) -> Result<NavigateCommand, SearchError> {
    let name = query.trim();

    let Some(area) = catalog.find(name) else {
        return Err(SearchError::NotFound(name.to_string()));
    };

    let Some(center) = area.anchor_coordinate() else {
        return Err(SearchError::GeometryUnusable(name.to_string()));
    };

    Ok(NavigateCommand {
        center,
        zoom: SEARCH_ZOOM,
    })
}
