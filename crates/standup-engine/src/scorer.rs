//! Deterministic quality checks against raw generated output.
//!
//! Five independent, non-failing boolean checks plus aggregation. Every
//! check wraps its own parsing attempt and degrades to `false` / empty-set
//! rather than propagating an error.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use standup_core::scores::QualityScores;
use standup_core::summary::PromptMode;

/// Number of applicable checks in summary mode: headings + the two ID checks.
pub const SUMMARY_TOTAL_CHECKS: u32 = 3;

/// Number of applicable checks in JSON mode: parseable + schema + the two ID
/// checks.
pub const JSON_TOTAL_CHECKS: u32 = 4;

/// The headings a summary-mode output must contain, each as a full trimmed
/// line, compared case-insensitively.
const REQUIRED_HEADINGS: [&str; 3] = ["## Yesterday", "## Today", "## Blockers"];

/// Extraction pattern: a quoted `"id": "<hex>"` field or an `ID: <hex>`
/// label, hex 7–40 chars, matched case-insensitively.
static ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:"id"\s*:\s*"([0-9a-f]{7,40})")|(?:ID:\s*([0-9a-f]{7,40}))"#).unwrap()
});

/// Validity pattern: a full lowercase hex string of 7–40 chars.
static HASH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[0-9a-f]{7,40}$").unwrap());

/// True iff the output parses as any JSON value.
#[must_use]
pub fn is_json_parseable(output: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(output).is_ok()
}

/// True iff the output parses to an object carrying `date`, `author`, a
/// `blockers` array, and a `categories` array where every category has a
/// `name` and a `commits` array whose every element has `id` and `summary`.
#[must_use]
pub fn is_json_schema_compliant(output: &str) -> bool {
    use serde_json::Value;

    let Ok(value) = serde_json::from_str::<Value>(output) else {
        return false;
    };
    let Some(obj) = value.as_object() else {
        return false;
    };

    let has_date = obj.contains_key("date");
    let has_author = obj.contains_key("author");
    let has_blockers = matches!(obj.get("blockers"), Some(Value::Array(_)));
    let has_categories = match obj.get("categories") {
        Some(Value::Array(categories)) => categories.iter().all(|category| {
            let Some(category) = category.as_object() else {
                return false;
            };
            category.contains_key("name")
                && match category.get("commits") {
                    Some(Value::Array(commits)) => commits.iter().all(|commit| {
                        commit
                            .as_object()
                            .is_some_and(|c| c.contains_key("id") && c.contains_key("summary"))
                    }),
                    _ => false,
                }
        }),
        _ => false,
    };

    has_date && has_author && has_blockers && has_categories
}

/// True iff the output contains each required heading as an exact
/// case-insensitive match of a trimmed line, in any order.
#[must_use]
pub fn has_required_headings(output: &str) -> bool {
    REQUIRED_HEADINGS.iter().all(|heading| {
        output
            .lines()
            .any(|line| line.trim().eq_ignore_ascii_case(heading))
    })
}

/// True iff every extracted ID matches the commit hash pattern. Vacuously
/// true when no IDs were extracted. Redundant with extraction, but kept as a
/// named invariant for reporting.
#[must_use]
pub fn all_referenced_ids_valid(output: &str) -> bool {
    let ids = extract_ids(output);
    ids.is_empty() || ids.iter().all(|id| HASH_PATTERN.is_match(id))
}

/// IDs referenced by the output that are not in the known-valid set.
#[must_use]
pub fn find_hallucinated_ids(output: &str, known_ids: &HashSet<String>) -> HashSet<String> {
    extract_ids(output)
        .into_iter()
        .filter(|id| !known_ids.contains(id))
        .collect()
}

/// Union of all IDs captured by either arm of the extraction pattern.
fn extract_ids(output: &str) -> HashSet<String> {
    ID_PATTERN
        .captures_iter(output)
        .flat_map(|captures| {
            [captures.get(1), captures.get(2)]
                .into_iter()
                .flatten()
                .map(|m| m.as_str().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Run all checks applicable to `mode` and aggregate pass counts.
///
/// The two JSON checks are populated only for [`PromptMode::Json`]; the
/// headings check only for [`PromptMode::Summary`]. The two ID checks always
/// run. `total_checks` is [`SUMMARY_TOTAL_CHECKS`] or [`JSON_TOTAL_CHECKS`].
#[must_use]
pub fn score(output: &str, mode: PromptMode, known_ids: &HashSet<String>) -> QualityScores {
    let hallucinated = find_hallucinated_ids(output, known_ids);

    let (json_parseable, json_schema_compliant, headings_present) = match mode {
        PromptMode::Summary => (None, None, Some(has_required_headings(output))),
        PromptMode::Json => (
            Some(is_json_parseable(output)),
            Some(is_json_schema_compliant(output)),
            None,
        ),
    };

    let all_ids_valid = all_referenced_ids_valid(output);
    let no_hallucinated_ids = hallucinated.is_empty();

    let checks: Vec<bool> = [json_parseable, json_schema_compliant, headings_present]
        .into_iter()
        .flatten()
        .chain([all_ids_valid, no_hallucinated_ids])
        .collect();
    debug_assert_eq!(
        checks.len() as u32,
        match mode {
            PromptMode::Summary => SUMMARY_TOTAL_CHECKS,
            PromptMode::Json => JSON_TOTAL_CHECKS,
        }
    );

    QualityScores {
        json_parseable,
        json_schema_compliant,
        headings_present,
        all_ids_valid,
        no_hallucinated_ids,
        pass_count: checks.iter().filter(|passed| **passed).count() as u32,
        total_checks: checks.len() as u32,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> HashSet<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    // ── Headings ────────────────────────────────────────────────────────

    #[test]
    fn headings_present_with_all_three() {
        let output = "## Yesterday\nstuff\n## Today\nstuff\n## Blockers\nNone";
        assert!(has_required_headings(output));
    }

    #[test]
    fn headings_matched_case_insensitively() {
        let output = "## yesterday\n## TODAY\n## Blockers";
        assert!(has_required_headings(output));
    }

    #[test]
    fn headings_missing_one_fails() {
        let output = "## Yesterday\n## Today";
        assert!(!has_required_headings(output));
    }

    #[test]
    fn heading_must_be_whole_line() {
        // Inline mention does not count as a heading.
        let output = "I did ## Yesterday things\n## Today\n## Blockers";
        assert!(!has_required_headings(output));
    }

    // ── JSON checks ─────────────────────────────────────────────────────

    #[test]
    fn parseable_accepts_any_json_value() {
        assert!(is_json_parseable("{}"));
        assert!(is_json_parseable("[1,2]"));
        assert!(is_json_parseable("\"text\""));
        assert!(!is_json_parseable("not json"));
    }

    #[test]
    fn schema_compliant_happy_path() {
        let output = r#"{"date":"2025-01-15","author":"Alice","categories":[{"name":"Fixes","commits":[{"id":"abc1234","summary":"s"}]}],"blockers":[]}"#;
        assert!(is_json_schema_compliant(output));
    }

    #[test]
    fn schema_requires_blockers_array() {
        let output = r#"{"date":"","author":"","categories":[]}"#;
        assert!(!is_json_schema_compliant(output));
    }

    #[test]
    fn schema_requires_commit_id_and_summary() {
        let output = r#"{"date":"","author":"","categories":[{"name":"Fixes","commits":[{"id":"abc1234"}]}],"blockers":[]}"#;
        assert!(!is_json_schema_compliant(output));
    }

    #[test]
    fn schema_rejects_category_without_commits() {
        let output =
            r#"{"date":"","author":"","categories":[{"name":"Fixes"}],"blockers":[]}"#;
        assert!(!is_json_schema_compliant(output));
    }

    #[test]
    fn schema_accepts_empty_categories() {
        let output = r#"{"date":"","author":"","categories":[],"blockers":[]}"#;
        assert!(is_json_schema_compliant(output));
    }

    // ── ID extraction ───────────────────────────────────────────────────

    #[test]
    fn extracts_both_label_and_field_forms() {
        let output = r#"Commit ID: abc1234 and {"id": "def5678"}"#;
        let extracted = extract_ids(output);
        assert_eq!(extracted, ids(&["abc1234", "def5678"]));
    }

    #[test]
    fn short_hex_not_extracted() {
        // 6 chars is below the 7-char minimum.
        assert!(extract_ids("ID: abc123").is_empty());
    }

    #[test]
    fn hallucinated_ids_are_the_set_difference() {
        let hallucinated = find_hallucinated_ids("see ID: bad9999 here", &ids(&["abc1234"]));
        assert_eq!(hallucinated, ids(&["bad9999"]));
    }

    #[test]
    fn known_ids_are_not_hallucinated() {
        let hallucinated =
            find_hallucinated_ids("ID: abc1234 and ID: bad9999", &ids(&["abc1234"]));
        assert_eq!(hallucinated, ids(&["bad9999"]));
    }

    #[test]
    fn no_ids_means_vacuously_valid() {
        assert!(all_referenced_ids_valid("no identifiers here"));
    }

    #[test]
    fn uppercase_ids_extracted_but_invalid() {
        // Extraction is case-insensitive; validity requires lowercase hex.
        let output = "ID: ABCDEF1234";
        assert_eq!(extract_ids(output), ids(&["ABCDEF1234"]));
        assert!(!all_referenced_ids_valid(output));
    }

    // ── score ───────────────────────────────────────────────────────────

    #[test]
    fn summary_mode_populates_only_headings() {
        let output = "## Yesterday\n## Today\n## Blockers\n- ID: abc1234";
        let scores = score(output, PromptMode::Summary, &ids(&["abc1234"]));

        assert_eq!(scores.json_parseable, None);
        assert_eq!(scores.json_schema_compliant, None);
        assert_eq!(scores.headings_present, Some(true));
        assert!(scores.all_ids_valid);
        assert!(scores.no_hallucinated_ids);
        assert_eq!(scores.pass_count, 3);
        assert_eq!(scores.total_checks, SUMMARY_TOTAL_CHECKS);
        assert!(scores.all_passed());
    }

    #[test]
    fn json_mode_populates_both_json_checks() {
        let output = r#"{"date":"d","author":"a","categories":[{"name":"n","commits":[{"id":"abc1234","summary":"s"}]}],"blockers":[]}"#;
        let scores = score(output, PromptMode::Json, &ids(&["abc1234"]));

        assert_eq!(scores.json_parseable, Some(true));
        assert_eq!(scores.json_schema_compliant, Some(true));
        assert_eq!(scores.headings_present, None);
        assert_eq!(scores.pass_count, 4);
        assert_eq!(scores.total_checks, JSON_TOTAL_CHECKS);
        assert!(scores.all_passed());
    }

    #[test]
    fn hallucinated_id_fails_scoring() {
        let output = "## Yesterday\n## Today\n## Blockers\nID: bad9999";
        let scores = score(output, PromptMode::Summary, &ids(&["abc1234"]));

        assert!(!scores.no_hallucinated_ids);
        assert_eq!(scores.pass_count, 2);
        assert!(!scores.all_passed());
    }

    #[test]
    fn garbage_json_output_scores_zero_json_checks() {
        let scores = score("not json", PromptMode::Json, &ids(&[]));
        assert_eq!(scores.json_parseable, Some(false));
        assert_eq!(scores.json_schema_compliant, Some(false));
        // No IDs referenced, so both ID checks pass vacuously.
        assert_eq!(scores.pass_count, 2);
        assert_eq!(scores.total_checks, JSON_TOTAL_CHECKS);
    }
}
