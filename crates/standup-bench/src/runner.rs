//! The benchmark loop.
//!
//! Iterates backends → cases → modes → repetitions, in that nested order,
//! sequentially by design so runs never contend for shared inference
//! resources. Each generate call races a per-call deadline; timeouts and
//! errors are tallied separately and never abort the run.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use standup_core::config::GenerationConfig;
use standup_core::records::ChangeRecord;
use standup_core::summary::PromptMode;
use standup_engine::prompt::PromptBuilder;
use standup_engine::scorer;
use standup_llm::{Backend, BackendRegistry};
use tracing::{info, warn};

use crate::case::BenchmarkCase;
use crate::metrics::{determinism, median, percentile};
use crate::report::{BackendSummary, CaseResult, HumanScore};

/// Knobs for one benchmark run.
#[derive(Clone, Debug)]
pub struct RunnerOptions {
    /// Repetitions per (case, mode).
    pub runs_per_case: u32,
    /// Case IDs to run, `None` for all.
    pub case_filter: Option<HashSet<String>>,
    /// Prompt modes to exercise.
    pub modes: Vec<PromptMode>,
    /// Per-call deadline.
    pub timeout: Duration,
    /// Sampling parameters for every call.
    pub generation: GenerationConfig,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            runs_per_case: 5,
            case_filter: None,
            modes: PromptMode::ALL.to_vec(),
            timeout: Duration::from_secs(30),
            generation: GenerationConfig::default(),
        }
    }
}

/// Per-backend failure counts.
#[derive(Clone, Copy, Debug, Default)]
pub struct BackendTally {
    /// Calls that exceeded the deadline.
    pub timeouts: u32,
    /// Calls that returned an error.
    pub errors: u32,
}

/// Drives benchmark cases through the configured backends.
pub struct BenchmarkRunner {
    cases: Vec<BenchmarkCase>,
    options: RunnerOptions,
    prompts: PromptBuilder,
    results: Vec<CaseResult>,
    outputs: HashMap<String, Vec<String>>,
    tallies: HashMap<String, BackendTally>,
}

impl BenchmarkRunner {
    /// Create a runner over `cases`, applying the case filter up front.
    #[must_use]
    pub fn new(cases: Vec<BenchmarkCase>, options: RunnerOptions) -> Self {
        let cases = match &options.case_filter {
            Some(filter) => cases
                .into_iter()
                .filter(|case| filter.contains(&case.id))
                .collect(),
            None => cases,
        };
        Self {
            cases,
            options,
            prompts: PromptBuilder::new(),
            results: Vec::new(),
            outputs: HashMap::new(),
            tallies: HashMap::new(),
        }
    }

    /// Run every registered backend over every case, mode, and repetition.
    ///
    /// A timed-out call is abandoned best-effort and excluded from latency
    /// aggregation; an erroring call is tallied and skipped; both advance
    /// the loop. One backend's failures never affect another's evaluation.
    pub async fn run(&mut self, registry: &BackendRegistry) {
        info!(
            cases = self.cases.len(),
            backends = registry.len(),
            runs_per_case = self.options.runs_per_case,
            "starting benchmark"
        );

        let options = &self.options;
        let prompts = &self.prompts;
        let cases = &self.cases;
        let results = &mut self.results;
        let outputs = &mut self.outputs;
        let tallies = &mut self.tallies;

        for name in registry.names() {
            let Some(backend) = registry.get(&name) else {
                continue;
            };
            info!(backend = %name, "running backend");

            let backend_outputs = outputs.entry(name.clone()).or_default();
            let tally = tallies.entry(name.clone()).or_default();

            for case in cases {
                let records: Vec<ChangeRecord> =
                    case.commits.iter().map(super::case::CommitEntry::to_record).collect();
                let known_ids: HashSet<String> =
                    case.commits.iter().map(|c| c.id.clone()).collect();

                for &mode in &options.modes {
                    let prompt = prompts.build_user_prompt(&records, mode);

                    for run in 1..=options.runs_per_case {
                        let started = Instant::now();
                        let outcome = tokio::time::timeout(
                            options.timeout,
                            backend.generate(&prompt, &options.generation),
                        )
                        .await;
                        let latency_ms = started.elapsed().as_millis() as u64;

                        let output = match outcome {
                            Err(_) => {
                                tally.timeouts += 1;
                                warn!(case = %case.id, %mode, run, latency_ms, "generation timed out");
                                continue;
                            }
                            Ok(Err(e)) => {
                                tally.errors += 1;
                                warn!(case = %case.id, %mode, run, error = %e, "generation failed");
                                continue;
                            }
                            Ok(Ok(output)) => output,
                        };

                        backend_outputs.push(output.clone());
                        let auto_score = scorer::score(&output, mode, &known_ids);
                        info!(
                            case = %case.id,
                            %mode,
                            run,
                            latency_ms,
                            chars = output.len(),
                            passed = auto_score.all_passed(),
                            "run complete"
                        );

                        results.push(CaseResult {
                            case_id: case.id.clone(),
                            backend: name.clone(),
                            mode,
                            run,
                            latency_ms,
                            char_count: output.len(),
                            auto_score,
                            human_score: None,
                        });
                    }
                }
            }

            info!(
                backend = %name,
                timeouts = tally.timeouts,
                errors = tally.errors,
                "backend finished"
            );
        }
    }

    /// All collected results, in execution order.
    #[must_use]
    pub fn results(&self) -> &[CaseResult] {
        &self.results
    }

    /// Failure tallies per backend.
    #[must_use]
    pub fn tallies(&self) -> &HashMap<String, BackendTally> {
        &self.tallies
    }

    /// Aggregate per-backend summaries over the collected results.
    #[must_use]
    pub fn build_summaries(&self) -> Vec<BackendSummary> {
        let mut order: Vec<&str> = Vec::new();
        for result in &self.results {
            if !order.contains(&result.backend.as_str()) {
                order.push(&result.backend);
            }
        }

        order
            .into_iter()
            .map(|name| {
                let rows: Vec<&CaseResult> = self
                    .results
                    .iter()
                    .filter(|r| r.backend == name)
                    .collect();

                let mut latencies: Vec<u64> = rows.iter().map(|r| r.latency_ms).collect();
                latencies.sort_unstable();
                let mut throughputs: Vec<f64> = rows
                    .iter()
                    .map(|r| {
                        if r.latency_ms > 0 {
                            r.char_count as f64 / (r.latency_ms as f64 / 1000.0)
                        } else {
                            0.0
                        }
                    })
                    .collect();
                throughputs.sort_by(f64::total_cmp);

                let pass_count = rows.iter().filter(|r| r.auto_score.all_passed()).count();
                let auto_pass_rate = if rows.is_empty() {
                    0.0
                } else {
                    pass_count as f64 / rows.len() as f64
                };

                BackendSummary {
                    backend: name.to_string(),
                    avg_faithfulness: average_human(&rows, |h| h.faithfulness),
                    avg_completeness: average_human(&rows, |h| h.completeness),
                    avg_structure: average_human(&rows, |h| h.structure),
                    auto_pass_rate,
                    latency_p50: percentile(&latencies, 50.0),
                    latency_p95: percentile(&latencies, 95.0),
                    throughput_median: median(&throughputs),
                    determinism: determinism(
                        self.outputs.get(name).map_or(&[][..], Vec::as_slice),
                    ),
                }
            })
            .collect()
    }
}

/// Mean of one human-score dimension across scored rows, 0 when none exist.
fn average_human(rows: &[&CaseResult], dimension: impl Fn(&HumanScore) -> u32) -> f64 {
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.human_score.as_ref().map(|h| f64::from(dimension(h))))
        .collect();
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
