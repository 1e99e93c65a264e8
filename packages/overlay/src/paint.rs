//! Severity-driven paint tables.
//!
//! Color and extrusion height are both keyed on the canonical severity
//! value, with an explicit fallback arm for anything outside the fixed
//! scale (including `"unknown"`). The match expressions are plain JSON in
//! the `["match", ["get", key], ...]` shape the extrusion layer consumes.

use pulse_map_metrics_models::SeverityLevel;
use serde_json::{Value, json};

/// Fill color for features whose severity is outside the fixed scale.
pub const FALLBACK_COLOR: &str = "gray";

/// Extrusion height (meters) for features outside the fixed scale.
pub const FALLBACK_HEIGHT: f64 = 50.0;

/// Overlay fill opacity.
pub const FILL_OPACITY: f64 = 0.5;

/// Fill color for one severity level.
#[must_use]
pub const fn severity_color(level: SeverityLevel) -> &'static str {
    match level {
        SeverityLevel::Calm => "green",
        SeverityLevel::Moderate => "yellow",
        SeverityLevel::Busy => "orange",
        SeverityLevel::Crowded => "red",
        SeverityLevel::Unknown => FALLBACK_COLOR,
    }
}

/// Extrusion height in meters for one severity level.
#[must_use]
pub const fn severity_height(level: SeverityLevel) -> f64 {
    match level {
        SeverityLevel::Calm => 30.0,
        SeverityLevel::Moderate => 60.0,
        SeverityLevel::Busy => 90.0,
        SeverityLevel::Crowded => 120.0,
        SeverityLevel::Unknown => FALLBACK_HEIGHT,
    }
}

/// Builds the categorical color match expression over the `severity`
/// property.
#[must_use]
pub fn color_match_expression() -> Value {
    match_expression(|level| json!(severity_color(level)), json!(FALLBACK_COLOR))
}

/// Builds the categorical height match expression over the `severity`
/// property.
#[must_use]
pub fn height_match_expression() -> Value {
    match_expression(|level| json!(severity_height(level)), json!(FALLBACK_HEIGHT))
}

fn match_expression(arm: impl Fn(SeverityLevel) -> Value, fallback: Value) -> Value {
    let mut expression = vec![json!("match"), json!(["get", "severity"])];
    for level in SeverityLevel::all() {
        expression.push(json!(level.as_ref()));
        expression.push(arm(*level));
    }
    expression.push(fallback);
    Value::Array(expression)
}
