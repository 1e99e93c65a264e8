//! Label-to-severity taxonomy mapping.
//!
//! The two citydata dataset families describe the same idea with two
//! vocabularies: congestion (`여유`/`보통`/`약간 붐빔`/`붐빔`) and
//! commercial activity (`한산한`/`보통`/`분주한`/`바쁜`). Both map onto the
//! shared [`SeverityLevel`] scale. Matching is exact after trimming; the
//! endpoints occasionally emit labels outside the documented vocabulary
//! (`확인 불가` and friends), which all land on the fallback.

use pulse_map_metrics_models::SeverityLevel;

/// Maps a raw upstream label to the canonical severity level.
///
/// Total: absent and unrecognized labels return
/// [`SeverityLevel::Unknown`], never an error.
#[must_use]
pub fn severity_from_label(raw: Option<&str>) -> SeverityLevel {
    let Some(label) = raw else {
        return SeverityLevel::Unknown;
    };

    match label.trim() {
        "한산한" | "여유" => SeverityLevel::Calm,
        "보통" => SeverityLevel::Moderate,
        "분주한" | "약간 붐빔" => SeverityLevel::Busy,
        "바쁜" | "붐빔" => SeverityLevel::Crowded,
        _ => SeverityLevel::Unknown,
    }
}
