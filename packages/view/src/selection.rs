//! Selection and inspection-panel state machine.
//!
//! Driven by two click surfaces: clicks that land on an overlay feature
//! and clicks on the map at large. A clicked feature without a severity
//! property deselects, exactly like an off-feature click; regions the
//! overlay knows nothing about are not interactive. Snapshot replacement
//! never closes an open panel unless the selected area vanished.

use geojson::JsonObject;
use pulse_map_metrics_models::{NormalizedAreaMetric, Snapshot};

/// Property key carrying the area name on overlay features.
const AREA_NAME_KEY: &str = "AREA_NM";

/// Property key whose presence marks a feature as interactive.
const SEVERITY_KEY: &str = "severity";

/// Current selection and panel state. Lives for the view's lifetime;
/// there is no terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// Nothing selected.
    #[default]
    Idle,
    /// An area is selected but the panel is closed.
    Selected(String),
    /// The inspection panel is open at normal height.
    PanelOpen(String),
    /// The inspection panel covers the screen.
    PanelFullScreen(String),
}

impl SelectionState {
    /// Handles a click that landed on a rendered feature.
    ///
    /// A feature carrying both an area name and a severity property opens
    /// the panel for that area, replacing any prior selection. A feature
    /// missing either key deselects.
    pub fn click_feature(&mut self, properties: &JsonObject) {
        let has_metric = properties.contains_key(SEVERITY_KEY);
        let area = properties
            .get(AREA_NAME_KEY)
            .and_then(serde_json::Value::as_str);

        match (has_metric, area) {
            (true, Some(area)) => {
                *self = Self::PanelOpen(area.to_string());
            }
            _ => {
                log::debug!("Click on non-interactive feature; deselecting");
                *self = Self::Idle;
            }
        }
    }

    /// Handles a click on the map at large, given whatever overlay
    /// features were rendered under the pointer.
    pub fn click_map(&mut self, features_at_point: &[JsonObject]) {
        match features_at_point.first() {
            None => *self = Self::Idle,
            Some(properties) => self.click_feature(properties),
        }
    }

    /// Toggles the panel between normal and fullscreen height. No-op
    /// unless the panel is open.
    pub fn toggle_fullscreen(&mut self) {
        *self = match std::mem::take(self) {
            Self::PanelOpen(area) => Self::PanelFullScreen(area),
            Self::PanelFullScreen(area) => Self::PanelOpen(area),
            other => other,
        };
    }

    /// Reconciles the selection with a freshly published snapshot: the
    /// selection survives if its area is still present, otherwise it
    /// reverts to idle.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) {
        if let Some(area) = self.selected_area()
            && !snapshot.contains(area)
        {
            log::debug!("Selected area {area} left the snapshot; deselecting");
            *self = Self::Idle;
        }
    }

    /// The selected area name, if any.
    #[must_use]
    pub fn selected_area(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Selected(area) | Self::PanelOpen(area) | Self::PanelFullScreen(area) => {
                Some(area)
            }
        }
    }

    /// Returns `true` while the inspection panel is visible.
    #[must_use]
    pub const fn panel_open(&self) -> bool {
        matches!(self, Self::PanelOpen(_) | Self::PanelFullScreen(_))
    }

    /// Returns `true` while the panel covers the screen.
    #[must_use]
    pub const fn full_screen(&self) -> bool {
        matches!(self, Self::PanelFullScreen(_))
    }

    /// Resolves the selected area's current metric from a snapshot.
    #[must_use]
    pub fn selected_metric<'a>(&self, snapshot: &'a Snapshot) -> Option<&'a NormalizedAreaMetric> {
        snapshot.get(self.selected_area()?)
    }
}
