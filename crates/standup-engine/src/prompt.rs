//! System instruction and per-mode user prompt templates.

use standup_core::records::ChangeRecord;
use standup_core::summary::PromptMode;

use crate::formatter::format_records;

/// Marker substituted with the formatted record block. Each user template
/// contains it exactly once.
const RECORDS_MARKER: &str = "{{commits}}";

/// Default system instruction.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a developer assistant that creates concise standup summaries from Git commits.";

/// Default user template for [`PromptMode::Summary`].
pub const DEFAULT_SUMMARY_TEMPLATE: &str = r#"You are a developer assistant that creates daily standup summaries from Git commits.

Given the following Git commits, produce a concise standup report with exactly these three markdown headings:

## Yesterday
(Summarise work completed based on the commits)

## Today
(Infer planned work as a continuation, or state "Continue work on …")

## Blockers
(List any obstacles mentioned in commit messages, or "None")

Reference commit IDs where relevant. Be concise and actionable.

Commits:
{{commits}}"#;

/// Default user template for [`PromptMode::Json`].
pub const DEFAULT_JSON_TEMPLATE: &str = r#"You are a developer assistant that creates structured standup data from Git commits.

Given the following Git commits, produce a JSON object with this exact structure:
{
  "date": "<YYYY-MM-DD of the most recent commit>",
  "author": "<primary author name>",
  "categories": [
    {
      "name": "<category, e.g. Bug Fixes, Features, Refactoring, CI/Config, Documentation>",
      "commits": [
        {
          "id": "<commit hash from input>",
          "summary": "<one-line summary>",
          "status": "done | in-progress | unknown"
        }
      ]
    }
  ],
  "blockers": ["<any obstacles, or empty array>"]
}

Rules:
- Output ONLY valid JSON, no markdown fences, no extra text.
- Every commit ID must come from the input — do not invent IDs.
- Group commits into logical categories.
- If there are multiple authors, use the most frequent as "author".

Commits:
{{commits}}"#;

/// Builds the prompts sent to a backend.
///
/// Holds the system instruction and one user template per mode. Immutable
/// once built; overrides are applied with the `with_*` constructors.
#[derive(Clone, Debug)]
pub struct PromptBuilder {
    system_prompt: String,
    summary_template: String,
    json_template: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    /// A builder carrying the default templates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            summary_template: DEFAULT_SUMMARY_TEMPLATE.into(),
            json_template: DEFAULT_JSON_TEMPLATE.into(),
        }
    }

    /// Replace the system instruction.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Replace the user template for one mode. The template should contain
    /// the `{{commits}}` marker exactly once.
    #[must_use]
    pub fn with_user_template(mut self, mode: PromptMode, template: impl Into<String>) -> Self {
        match mode {
            PromptMode::Summary => self.summary_template = template.into(),
            PromptMode::Json => self.json_template = template.into(),
        }
        self
    }

    /// Build the user prompt: format the records and substitute them into
    /// the mode-selected template. One-time verbatim replacement, not
    /// recursive; marker-like text inside commit messages is left alone.
    #[must_use]
    pub fn build_user_prompt(&self, records: &[ChangeRecord], mode: PromptMode) -> String {
        let formatted = format_records(records);
        let template = match mode {
            PromptMode::Summary => &self.summary_template,
            PromptMode::Json => &self.json_template,
        };
        template.replacen(RECORDS_MARKER, &formatted, 1)
    }

    /// The system instruction, unchanged.
    #[must_use]
    pub fn build_system_prompt(&self) -> &str {
        &self.system_prompt
    }
}
