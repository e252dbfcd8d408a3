//! Change records supplied by the source-control collaborator.

use serde::{Deserialize, Serialize};

/// A single commit-like change record.
///
/// Supplied per call by the change-record source (a git client, a benchmark
/// case file, a mock). Immutable once constructed; the engine only reads it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    /// Commit hash.
    pub id: String,
    /// Author display name.
    pub author_name: String,
    /// Author email address.
    pub author_email: String,
    /// Commit date, already rendered as text by the source.
    pub date: String,
    /// Full commit message.
    pub message: String,
}
