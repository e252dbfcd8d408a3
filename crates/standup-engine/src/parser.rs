//! Best-effort parsing of generated output into a structured summary.
//!
//! Two independent textual algorithms, selected by [`PromptMode`]. Neither
//! ever fails: malformed output degrades to a summary with empty sections
//! and the raw text preserved for diagnostics.

use serde_json::Value;
use standup_core::summary::{
    ItemStatus, PromptMode, StandupSummary, SummaryItem, SummarySection,
};

/// Parse raw generated text for the given mode.
#[must_use]
pub fn parse(raw: &str, mode: PromptMode) -> StandupSummary {
    match mode {
        PromptMode::Summary => parse_summary(raw),
        PromptMode::Json => parse_json(raw),
    }
}

/// Single left-to-right scan over lines.
///
/// A `## ` line closes the open section and opens a new one; any other
/// non-blank line under an open heading becomes an item with a leading
/// `- ` / `* ` marker stripped. Text before the first heading is ignored.
fn parse_summary(raw: &str) -> StandupSummary {
    let mut sections = Vec::new();
    let mut current_heading: Option<String> = None;
    let mut current_items: Vec<SummaryItem> = Vec::new();

    for line in raw.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("## ") {
            if let Some(heading) = current_heading.take() {
                sections.push(SummarySection {
                    name: heading,
                    items: std::mem::take(&mut current_items),
                });
            }
            current_heading = Some(rest.trim().to_string());
        } else if current_heading.is_some() && !trimmed.is_empty() {
            let text = trimmed.strip_prefix("- ").unwrap_or(trimmed);
            let text = text.strip_prefix("* ").unwrap_or(text).trim();
            if !text.is_empty() {
                current_items.push(SummaryItem::text(text));
            }
        }
    }
    if let Some(heading) = current_heading {
        sections.push(SummarySection {
            name: heading,
            items: current_items,
        });
    }

    StandupSummary {
        raw: raw.to_string(),
        date: String::new(),
        author: String::new(),
        sections,
        mode: PromptMode::Summary,
    }
}

/// Parse the raw text as the standup JSON document.
///
/// Any parse or shape failure yields the empty-summary fallback; the caller
/// never sees an error.
fn parse_json(raw: &str) -> StandupSummary {
    let (date, author, sections) = try_parse_json(raw).unwrap_or_default();
    StandupSummary {
        raw: raw.to_string(),
        date,
        author,
        sections,
        mode: PromptMode::Json,
    }
}

/// `None` on any shape violation: non-object root, a present-but-mistyped
/// field, or a non-primitive where a primitive is required. Absent fields
/// default instead of failing.
fn try_parse_json(raw: &str) -> Option<(String, String, Vec<SummarySection>)> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let obj = value.as_object()?;

    let date = optional_text(obj.get("date"))?;
    let author = optional_text(obj.get("author"))?;

    let mut sections = match obj.get("categories") {
        None => Vec::new(),
        Some(categories) => categories
            .as_array()?
            .iter()
            .map(parse_category)
            .collect::<Option<Vec<_>>>()?,
    };

    let blockers: Vec<String> = match obj.get("blockers") {
        None => Vec::new(),
        Some(blockers) => blockers
            .as_array()?
            .iter()
            .map(primitive_content)
            .collect::<Option<Vec<_>>>()?,
    };
    if !blockers.is_empty() {
        sections.push(SummarySection {
            name: "Blockers".to_string(),
            items: blockers.into_iter().map(SummaryItem::text).collect(),
        });
    }

    Some((date, author, sections))
}

fn parse_category(category: &Value) -> Option<SummarySection> {
    let obj = category.as_object()?;
    let name = optional_text(obj.get("name"))?;
    let items = match obj.get("commits") {
        None => Vec::new(),
        Some(commits) => commits
            .as_array()?
            .iter()
            .map(parse_commit_item)
            .collect::<Option<Vec<_>>>()?,
    };
    Some(SummarySection { name, items })
}

fn parse_commit_item(commit: &Value) -> Option<SummaryItem> {
    let obj = commit.as_object()?;
    let commit_id = match obj.get("id") {
        None => None,
        Some(id) => Some(primitive_content(id)?),
    };
    let text = optional_text(obj.get("summary"))?;
    let status = match obj.get("status") {
        None => None,
        Some(status) => Some(primitive_content(status)?),
    };
    Some(SummaryItem {
        commit_id,
        text,
        status: parse_status(status.as_deref()),
    })
}

/// Absent → empty string; present non-primitive → `None`.
fn optional_text(value: Option<&Value>) -> Option<String> {
    match value {
        None => Some(String::new()),
        Some(value) => primitive_content(value),
    }
}

/// The text content of a JSON primitive; `None` for arrays and objects.
fn primitive_content(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_status(value: Option<&str>) -> ItemStatus {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("done") => ItemStatus::Done,
        Some("in-progress" | "in_progress") => ItemStatus::InProgress,
        _ => ItemStatus::Unknown,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
