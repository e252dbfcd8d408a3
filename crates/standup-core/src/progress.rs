//! Progress events emitted by the streaming summarization pipeline.

use serde::Serialize;

use crate::scores::ScoredResult;

/// One step of the streaming summarization pipeline.
///
/// Events are emitted in strict order: `BuildingPrompt`, `Generating`, zero
/// or more `Streaming`, `Parsing`, optionally `Scoring`, then exactly one
/// terminal event, `Complete` or `Failed`. No event revisits an earlier
/// state. Events live only for the duration of one call; they are never
/// persisted or shared across calls.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProgressEvent {
    /// The prompt is being assembled from the change records.
    BuildingPrompt,
    /// The backend call has started.
    Generating,
    /// A text fragment arrived from the backend.
    Streaming {
        /// The newly received fragment.
        delta: String,
        /// Running concatenation of all fragments so far.
        accumulated: String,
    },
    /// Generation finished; the output is being parsed.
    Parsing,
    /// The parsed output is being scored (only when scoring is enabled).
    Scoring,
    /// Terminal: the pipeline finished.
    Complete {
        /// The summary, with scores when scoring was enabled.
        result: ScoredResult,
    },
    /// Terminal: generation failed before a full output was received.
    Failed {
        /// Rendered backend error message.
        error: String,
    },
}

impl ProgressEvent {
    /// True for the two terminal variants.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Failed { .. })
    }
}
