//! Benchmark test cases loaded from `case-*.json` files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use standup_core::records::ChangeRecord;

/// A single benchmark test case.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkCase {
    /// Case identifier, referenced by the `--cases` filter.
    pub id: String,
    /// Human-readable description of what the case exercises.
    pub description: String,
    /// The commits fed to the engine.
    pub commits: Vec<CommitEntry>,
    /// What good output looks like for this case.
    #[serde(default)]
    pub expectations: Expectations,
}

/// A commit as written in a case file.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitEntry {
    /// Commit hash.
    pub id: String,
    /// Author display name.
    pub author_name: String,
    /// Author email.
    pub author_email: String,
    /// Commit date as text.
    pub when_date: String,
    /// Commit message.
    pub message: String,
}

impl CommitEntry {
    /// Convert to the engine's record type.
    #[must_use]
    pub fn to_record(&self) -> ChangeRecord {
        ChangeRecord {
            id: self.id.clone(),
            author_name: self.author_name.clone(),
            author_email: self.author_email.clone(),
            date: self.when_date.clone(),
            message: self.message.clone(),
        }
    }
}

/// Expected output properties, split per mode.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expectations {
    /// Expectations for summary-mode output.
    #[serde(default)]
    pub summary: SummaryExpectations,
    /// Expectations for JSON-mode output.
    #[serde(default)]
    pub json: JsonExpectations,
}

/// Expectations for summary-mode output.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryExpectations {
    /// Headings the output must contain.
    #[serde(default = "default_required_headings")]
    pub required_headings: Vec<String>,
    /// Commit IDs a faithful summary should reference.
    #[serde(default)]
    pub must_mention_ids: Vec<String>,
    /// Commit IDs that must not appear (e.g. from another author).
    #[serde(default)]
    pub forbidden_ids: Vec<String>,
    /// Free-form reviewer notes.
    #[serde(default)]
    pub notes: String,
}

impl Default for SummaryExpectations {
    fn default() -> Self {
        Self {
            required_headings: default_required_headings(),
            must_mention_ids: Vec::new(),
            forbidden_ids: Vec::new(),
            notes: String::new(),
        }
    }
}

/// Expectations for JSON-mode output.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonExpectations {
    /// Whether the output must parse as JSON.
    #[serde(default = "default_true")]
    pub must_parse_as_json: bool,
    /// Category names a good grouping should produce.
    #[serde(default)]
    pub expected_categories: Vec<String>,
    /// Total commit count across categories, `-1` when unconstrained.
    #[serde(default = "default_commit_count")]
    pub expected_commit_count: i32,
    /// Free-form reviewer notes.
    #[serde(default)]
    pub notes: String,
}

impl Default for JsonExpectations {
    fn default() -> Self {
        Self {
            must_parse_as_json: true,
            expected_categories: Vec::new(),
            expected_commit_count: default_commit_count(),
            notes: String::new(),
        }
    }
}

fn default_required_headings() -> Vec<String> {
    vec![
        "## Yesterday".to_string(),
        "## Today".to_string(),
        "## Blockers".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

fn default_commit_count() -> i32 {
    -1
}

/// Load one case file.
pub fn load_case(path: &Path) -> Result<BenchmarkCase> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read case file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse case file: {}", path.display()))
}

/// Load every `case-*.json` in `dir`, sorted by file name.
pub fn load_cases(dir: &Path) -> Result<Vec<BenchmarkCase>> {
    ensure!(dir.is_dir(), "bench directory does not exist: {}", dir.display());

    let mut paths: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("failed to list bench directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("case-") && name.ends_with(".json"))
        })
        .collect();
    paths.sort();

    paths.iter().map(|path| load_case(path)).collect()
}
