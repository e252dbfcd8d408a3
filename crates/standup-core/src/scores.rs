//! Deterministic quality-check results attached to a summary.

use serde::{Deserialize, Serialize};

use crate::summary::StandupSummary;

/// Results of the deterministic quality checks for one generated output.
///
/// The three optional fields are mode-exclusive: `json_parseable` and
/// `json_schema_compliant` are populated for JSON-mode output and `None` for
/// summary mode; `headings_present` is the reverse. The two ID checks are
/// always populated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityScores {
    /// Whether the output parsed as any JSON value (JSON mode only).
    #[serde(default)]
    pub json_parseable: Option<bool>,
    /// Whether the parsed JSON matched the standup schema (JSON mode only).
    #[serde(default)]
    pub json_schema_compliant: Option<bool>,
    /// Whether all three required headings were present (summary mode only).
    #[serde(default)]
    pub headings_present: Option<bool>,
    /// Whether every referenced commit ID matched the hash pattern.
    pub all_ids_valid: bool,
    /// Whether no referenced commit ID fell outside the input set.
    pub no_hallucinated_ids: bool,
    /// Number of applicable checks that passed.
    pub pass_count: u32,
    /// Number of applicable checks for this mode.
    pub total_checks: u32,
}

impl QualityScores {
    /// True when every applicable check passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.json_parseable.unwrap_or(true)
            && self.json_schema_compliant.unwrap_or(true)
            && self.headings_present.unwrap_or(true)
            && self.all_ids_valid
            && self.no_hallucinated_ids
    }
}

/// A summary together with its quality scores, when scoring ran.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResult {
    /// The parsed summary.
    pub summary: StandupSummary,
    /// Quality scores, `None` when scoring was disabled for the call.
    #[serde(default)]
    pub scores: Option<QualityScores>,
}
