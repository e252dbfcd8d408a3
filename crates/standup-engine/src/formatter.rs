//! Renders change records into the plain-text block embedded in prompts.

use standup_core::records::ChangeRecord;

/// Format records for prompt embedding.
///
/// Each record renders as four labelled lines followed by a `---` delimiter;
/// records are joined by a newline with no trailing separator. Empty input
/// yields the empty string.
#[must_use]
pub fn format_records(records: &[ChangeRecord]) -> String {
    records
        .iter()
        .map(|record| {
            format!(
                "ID: {}\nAuthor: {} <{}>\nDate: {}\nMessage: {}\n---",
                record.id, record.author_name, record.author_email, record.date, record.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, message: &str) -> ChangeRecord {
        ChangeRecord {
            id: id.into(),
            author_name: "Alice".into(),
            author_email: "alice@example.com".into(),
            date: "2025-01-15".into(),
            message: message.into(),
        }
    }

    #[test]
    fn empty_input_yields_empty_string() {
        assert_eq!(format_records(&[]), "");
    }

    #[test]
    fn single_record_exact_layout() {
        let formatted = format_records(&[record("abc1234", "Fix login bug")]);
        assert_eq!(
            formatted,
            "ID: abc1234\nAuthor: Alice <alice@example.com>\nDate: 2025-01-15\nMessage: Fix login bug\n---"
        );
    }

    #[test]
    fn records_joined_without_trailing_separator() {
        let formatted = format_records(&[record("abc1234", "one"), record("def5678", "two")]);
        assert!(formatted.starts_with("ID: abc1234\n"));
        assert!(formatted.contains("---\nID: def5678\n"));
        assert!(formatted.ends_with("\n---"));
    }
}
