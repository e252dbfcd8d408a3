//! Summarization orchestration.
//!
//! [`SummaryEngine`] wires the prompt builder, a backend, the parser, and
//! optionally the scorer into three call shapes: one-shot, one-shot with
//! scores, and a progress-emitting streaming pipeline.

use std::collections::HashSet;
use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use standup_core::config::GenerationConfig;
use standup_core::progress::ProgressEvent;
use standup_core::records::ChangeRecord;
use standup_core::scores::ScoredResult;
use standup_core::summary::{PromptMode, StandupSummary};
use standup_llm::{Backend, BackendResult};
use tracing::{debug, instrument};

use crate::parser;
use crate::prompt::PromptBuilder;
use crate::scorer;

/// Boxed stream of [`ProgressEvent`]s for one streaming summarization call.
pub type ProgressStream = Pin<Box<dyn Stream<Item = ProgressEvent> + Send>>;

/// Orchestrates prompt building, generation, parsing, and scoring.
///
/// Each call is an independent sequential pipeline; the engine holds no
/// mutable state, so concurrent calls only contend inside the backend.
pub struct SummaryEngine {
    backend: Arc<dyn Backend>,
    prompts: PromptBuilder,
    config: GenerationConfig,
    scoring_enabled: bool,
}

impl SummaryEngine {
    /// Start building an engine around `backend`.
    #[must_use]
    pub fn builder(backend: Arc<dyn Backend>) -> SummaryEngineBuilder {
        SummaryEngineBuilder::new(backend)
    }

    fn full_prompt(&self, records: &[ChangeRecord], mode: PromptMode) -> String {
        format!(
            "{}\n\n{}",
            self.prompts.build_system_prompt(),
            self.prompts.build_user_prompt(records, mode)
        )
    }

    /// Generate and parse a summary.
    ///
    /// Backend faults propagate unchanged; parsing is best-effort and never
    /// fails for malformed output.
    #[instrument(skip_all, fields(backend = self.backend.name(), mode = %mode, records = records.len()))]
    pub async fn summarize(
        &self,
        records: &[ChangeRecord],
        mode: PromptMode,
    ) -> BackendResult<StandupSummary> {
        let prompt = self.full_prompt(records, mode);
        let raw = self.backend.generate(&prompt, &self.config).await?;
        debug!(chars = raw.len(), "generation complete");
        Ok(parser::parse(&raw, mode))
    }

    /// Generate, parse, and score a summary.
    ///
    /// The input record IDs form the trusted-ID set for the scorer. Scores
    /// are always computed here, regardless of the engine's scoring flag.
    pub async fn summarize_and_score(
        &self,
        records: &[ChangeRecord],
        mode: PromptMode,
    ) -> BackendResult<ScoredResult> {
        let summary = self.summarize(records, mode).await?;
        let known_ids: HashSet<String> = records.iter().map(|r| r.id.clone()).collect();
        let scores = scorer::score(&summary.raw, mode, &known_ids);
        Ok(ScoredResult {
            summary,
            scores: Some(scores),
        })
    }

    /// Stream the summarization pipeline as [`ProgressEvent`]s.
    ///
    /// Events arrive in strict order: `BuildingPrompt`, `Generating`, zero or
    /// more `Streaming`, `Parsing`, then `Scoring` iff scoring is enabled for
    /// this engine, then exactly one terminal `Complete` or `Failed`. A
    /// backend fault during stream setup or fragment delivery becomes a
    /// terminal `Failed`; parsing and scoring are total and cannot fail.
    ///
    /// Dropping the stream cancels the pipeline: fragment production stops at
    /// the backend and no terminal event is emitted. The stream is consumed
    /// at most once; call again to restart the whole pipeline.
    #[must_use]
    pub fn summarize_with_progress(
        &self,
        records: Vec<ChangeRecord>,
        mode: PromptMode,
    ) -> ProgressStream {
        let backend = Arc::clone(&self.backend);
        let prompts = self.prompts.clone();
        let config = self.config;
        let scoring_enabled = self.scoring_enabled;

        Box::pin(async_stream::stream! {
            yield ProgressEvent::BuildingPrompt;
            let prompt = format!(
                "{}\n\n{}",
                prompts.build_system_prompt(),
                prompts.build_user_prompt(&records, mode)
            );

            yield ProgressEvent::Generating;
            let mut fragments = match backend.generate_stream(&prompt, &config).await {
                Ok(stream) => stream,
                Err(e) => {
                    yield ProgressEvent::Failed { error: e.to_string() };
                    return;
                }
            };

            let mut accumulated = String::new();
            while let Some(fragment) = fragments.next().await {
                match fragment {
                    Ok(delta) => {
                        accumulated.push_str(&delta);
                        yield ProgressEvent::Streaming {
                            delta,
                            accumulated: accumulated.clone(),
                        };
                    }
                    Err(e) => {
                        yield ProgressEvent::Failed { error: e.to_string() };
                        return;
                    }
                }
            }

            yield ProgressEvent::Parsing;
            let summary = parser::parse(&accumulated, mode);

            let scores = if scoring_enabled {
                yield ProgressEvent::Scoring;
                let known_ids: HashSet<String> =
                    records.iter().map(|r| r.id.clone()).collect();
                Some(scorer::score(&accumulated, mode, &known_ids))
            } else {
                None
            };

            yield ProgressEvent::Complete {
                result: ScoredResult { summary, scores },
            };
        })
    }
}

/// Builder for [`SummaryEngine`].
pub struct SummaryEngineBuilder {
    backend: Arc<dyn Backend>,
    prompts: PromptBuilder,
    config: GenerationConfig,
    scoring_enabled: bool,
}

impl SummaryEngineBuilder {
    /// Builder with default prompts, default generation config, and scoring
    /// disabled.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            prompts: PromptBuilder::new(),
            config: GenerationConfig::default(),
            scoring_enabled: false,
        }
    }

    /// Replace the prompt builder (custom system prompt or templates).
    #[must_use]
    pub fn prompts(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    /// Replace the generation sampling parameters.
    #[must_use]
    pub fn generation_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable or disable the `Scoring` phase of the streaming pipeline.
    #[must_use]
    pub fn scoring(mut self, enabled: bool) -> Self {
        self.scoring_enabled = enabled;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> SummaryEngine {
        SummaryEngine {
            backend: self.backend,
            prompts: self.prompts,
            config: self.config,
            scoring_enabled: self.scoring_enabled,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
