//! Structured standup summaries and the prompt modes that produce them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which generation target a call aims for.
///
/// Selects the user prompt template, the parser branch, and the scorer branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PromptMode {
    /// Free text with `## Yesterday` / `## Today` / `## Blockers` headings.
    Summary,
    /// A single JSON object with categories, commits, and blockers.
    Json,
}

impl PromptMode {
    /// Both modes, in the order the benchmark iterates them.
    pub const ALL: [PromptMode; 2] = [PromptMode::Summary, PromptMode::Json];

    /// Parse a mode name case-insensitively (`"summary"`, `"JSON"`, ...).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "SUMMARY" => Some(Self::Summary),
            "JSON" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Summary => f.write_str("SUMMARY"),
            Self::Json => f.write_str("JSON"),
        }
    }
}

/// Completion state of a single summary item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemStatus {
    /// Work is finished.
    Done,
    /// Work has started but is not finished.
    InProgress,
    /// The model did not state a status, or stated an unrecognized one.
    #[default]
    Unknown,
}

/// One line of a summary section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryItem {
    /// Commit the item refers to, when the output named one.
    #[serde(default)]
    pub commit_id: Option<String>,
    /// Item text with any list marker stripped.
    pub text: String,
    /// Completion state, [`ItemStatus::Unknown`] unless the output said so.
    #[serde(default)]
    pub status: ItemStatus,
}

impl SummaryItem {
    /// A plain text item with no commit reference and unknown status.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            commit_id: None,
            text: text.into(),
            status: ItemStatus::Unknown,
        }
    }
}

/// A named group of summary items, in output order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarySection {
    /// Section heading (`Yesterday`, `Bug Fixes`, `Blockers`, ...).
    pub name: String,
    /// Items in the order the output listed them.
    pub items: Vec<SummaryItem>,
}

/// A parsed standup summary.
///
/// Owned exclusively by the call that produced it; immutable after
/// construction. `raw` always preserves the full generated text so callers
/// can diagnose parse fallbacks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandupSummary {
    /// The raw generated text, verbatim.
    pub raw: String,
    /// Report date, empty when the output did not carry one.
    pub date: String,
    /// Primary author, empty when the output did not carry one.
    pub author: String,
    /// Ordered sections. A `Blockers` section, when present, is last.
    pub sections: Vec<SummarySection>,
    /// The mode this summary was produced in.
    pub mode: PromptMode,
}
