//! Report generation: CSV export, Markdown comparison tables, pass/fail
//! thresholds, and cloud-vs-local delta analysis.

use std::fmt;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use standup_core::scores::QualityScores;
use standup_core::summary::PromptMode;

/// One row per (case, backend, mode, run).
#[derive(Clone, Debug)]
pub struct CaseResult {
    /// Case identifier.
    pub case_id: String,
    /// Backend name.
    pub backend: String,
    /// Prompt mode the run used.
    pub mode: PromptMode,
    /// 1-based repetition index.
    pub run: u32,
    /// Wall-clock latency of the generate call.
    pub latency_ms: u64,
    /// Output length in characters.
    pub char_count: usize,
    /// Deterministic quality checks for the output.
    pub auto_score: QualityScores,
    /// Manual rubric scores, merged in after a review pass.
    pub human_score: Option<HumanScore>,
}

/// Manual rubric scores on a 0–2 scale per dimension.
#[derive(Clone, Copy, Debug, Default)]
pub struct HumanScore {
    /// Output sticks to what the commits say.
    pub faithfulness: u32,
    /// Output covers all relevant commits.
    pub completeness: u32,
    /// Output follows the requested structure.
    pub structure: u32,
    /// "Today" items are actionable.
    pub actionability: u32,
    /// Output is concise and readable.
    pub clarity: u32,
}

impl HumanScore {
    /// Sum across all five dimensions.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.faithfulness + self.completeness + self.structure + self.actionability + self.clarity
    }
}

/// Aggregate over all of one backend's case results.
#[derive(Clone, Debug)]
pub struct BackendSummary {
    /// Backend name.
    pub backend: String,
    /// Mean human faithfulness score, 0 when no human scores exist.
    pub avg_faithfulness: f64,
    /// Mean human completeness score.
    pub avg_completeness: f64,
    /// Mean human structure score.
    pub avg_structure: f64,
    /// Fraction of runs where every auto check passed.
    pub auto_pass_rate: f64,
    /// Median latency (nearest-rank).
    pub latency_p50: u64,
    /// 95th percentile latency (nearest-rank).
    pub latency_p95: u64,
    /// Median throughput in chars/sec.
    pub throughput_median: f64,
    /// Average pairwise output similarity.
    pub determinism: f64,
}

/// Outcome of one threshold criterion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThresholdStatus {
    /// Criterion met.
    Pass,
    /// Criterion missed but within tolerance.
    Warn,
    /// Criterion missed.
    Fail,
}

impl fmt::Display for ThresholdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("PASS"),
            Self::Warn => f.write_str("WARN"),
            Self::Fail => f.write_str("FAIL"),
        }
    }
}

/// One evaluated threshold criterion.
#[derive(Clone, Debug)]
pub struct ThresholdResult {
    /// Criterion label.
    pub criterion: &'static str,
    /// Observed value.
    pub value: f64,
    /// Threshold the value was compared against.
    pub threshold: f64,
    /// Pass/warn/fail outcome.
    pub status: ThresholdStatus,
}

/// Evaluate the three fixed acceptance criteria for one backend.
///
/// Faithfulness ≥ 1.5 and auto-pass rate ≥ 0.9 are binary; latency p50 gets
/// a warn band up to 15 s.
#[must_use]
pub fn evaluate_thresholds(summary: &BackendSummary) -> Vec<ThresholdResult> {
    vec![
        ThresholdResult {
            criterion: "Faithfulness",
            value: summary.avg_faithfulness,
            threshold: 1.5,
            status: if summary.avg_faithfulness >= 1.5 {
                ThresholdStatus::Pass
            } else {
                ThresholdStatus::Fail
            },
        },
        ThresholdResult {
            criterion: "Structure (auto pass rate)",
            value: summary.auto_pass_rate,
            threshold: 0.9,
            status: if summary.auto_pass_rate >= 0.9 {
                ThresholdStatus::Pass
            } else {
                ThresholdStatus::Fail
            },
        },
        ThresholdResult {
            criterion: "Latency p50 (ms)",
            value: summary.latency_p50 as f64,
            threshold: 8000.0,
            status: if summary.latency_p50 <= 8000 {
                ThresholdStatus::Pass
            } else if summary.latency_p50 <= 15_000 {
                ThresholdStatus::Warn
            } else {
                ThresholdStatus::Fail
            },
        },
    ]
}

// ── Markdown ────────────────────────────────────────────────────────────────

/// The backend comparison table.
#[must_use]
pub fn markdown_table(summaries: &[BackendSummary]) -> String {
    let mut out = String::new();
    out.push_str("| Backend | Faithfulness (avg) | Completeness (avg) | Structure | Auto-checks pass% | Latency p50 | Latency p95 | Throughput | Determinism |\n");
    out.push_str("|---------|--------------------|---------------------|-----------|--------------------|-------------|-------------|------------|-------------|\n");
    for s in summaries {
        let _ = writeln!(
            out,
            "| {} | {:.2} | {:.2} | {:.2} | {:.1}% | {}ms | {}ms | {:.1} c/s | {:.3} |",
            s.backend,
            s.avg_faithfulness,
            s.avg_completeness,
            s.avg_structure,
            s.auto_pass_rate * 100.0,
            s.latency_p50,
            s.latency_p95,
            s.throughput_median,
            s.determinism,
        );
    }
    out
}

/// The full Markdown report: comparison table, per-backend thresholds, and,
/// when a backend whose name contains `"cloud"` exists, a delta section
/// comparing every other backend against it.
#[must_use]
pub fn render_markdown_report(
    generated_at: &str,
    case_count: usize,
    runs_per_case: u32,
    summaries: &[BackendSummary],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Benchmark Results");
    let _ = writeln!(out);
    let _ = writeln!(out, "Generated: {generated_at}");
    let _ = writeln!(out, "Cases: {case_count}");
    let _ = writeln!(out, "Runs per case: {runs_per_case}");
    let _ = writeln!(out);
    let _ = writeln!(out, "## Comparison Table");
    let _ = writeln!(out);
    out.push_str(&markdown_table(summaries));
    let _ = writeln!(out);

    let _ = writeln!(out, "## Pass/Fail Thresholds");
    let _ = writeln!(out);
    for summary in summaries {
        let _ = writeln!(out, "### {}", summary.backend);
        for t in evaluate_thresholds(summary) {
            let _ = writeln!(
                out,
                "- [{}] {}: {:.2} (threshold: {:.2})",
                t.status, t.criterion, t.value, t.threshold
            );
        }
        let _ = writeln!(out);
    }

    let cloud = summaries
        .iter()
        .find(|s| s.backend.to_lowercase().contains("cloud"));
    if let Some(cloud) = cloud {
        let _ = writeln!(out, "## Cloud vs Local Delta Analysis");
        let _ = writeln!(out);
        for summary in summaries.iter().filter(|s| s.backend != cloud.backend) {
            out.push_str(&delta_markdown(&compute_deltas(summary, cloud), &summary.backend));
            let _ = writeln!(out);
        }
    }

    out
}

// ── CSV ─────────────────────────────────────────────────────────────────────

const CSV_HEADER: &str = "case_id,backend,prompt_type,run,latency_ms,char_count,json_parseable,json_schema_compliant,headings_present,all_ids_valid,no_hallucinated_ids,faithfulness,completeness,structure,actionability,clarity,total_human,total_auto_pass";

fn opt_bool(value: Option<bool>) -> String {
    value.map(|b| b.to_string()).unwrap_or_default()
}

fn opt_u32(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Render all results as CSV, one row per run, optionals rendered empty.
#[must_use]
pub fn render_csv(results: &[CaseResult]) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');
    for r in results {
        let hs = r.human_score;
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            r.case_id,
            r.backend,
            r.mode,
            r.run,
            r.latency_ms,
            r.char_count,
            opt_bool(r.auto_score.json_parseable),
            opt_bool(r.auto_score.json_schema_compliant),
            opt_bool(r.auto_score.headings_present),
            r.auto_score.all_ids_valid,
            r.auto_score.no_hallucinated_ids,
            opt_u32(hs.map(|h| h.faithfulness)),
            opt_u32(hs.map(|h| h.completeness)),
            opt_u32(hs.map(|h| h.structure)),
            opt_u32(hs.map(|h| h.actionability)),
            opt_u32(hs.map(|h| h.clarity)),
            opt_u32(hs.map(|h| h.total())),
            r.auto_score.pass_count,
        );
    }
    out
}

/// Write the CSV report to `path`.
pub fn write_csv(results: &[CaseResult], path: &Path) -> Result<()> {
    std::fs::write(path, render_csv(results))
        .with_context(|| format!("failed to write CSV report: {}", path.display()))
}

// ── Cloud vs local deltas ───────────────────────────────────────────────────

/// Per-metric difference between a local backend and the cloud baseline.
#[derive(Clone, Debug)]
pub struct DeltaRow {
    /// Metric label.
    pub metric: &'static str,
    /// The local backend's value.
    pub local_value: f64,
    /// The cloud baseline's value.
    pub cloud_value: f64,
    /// `local - cloud`.
    pub delta: f64,
    /// Delta as a percentage of the cloud value, 0 when the baseline is 0.
    pub delta_pct: f64,
}

/// Compute per-metric deltas of `local` against `cloud`.
#[must_use]
pub fn compute_deltas(local: &BackendSummary, cloud: &BackendSummary) -> Vec<DeltaRow> {
    fn row(metric: &'static str, local: f64, cloud: f64) -> DeltaRow {
        DeltaRow {
            metric,
            local_value: local,
            cloud_value: cloud,
            delta: local - cloud,
            delta_pct: if cloud == 0.0 {
                0.0
            } else {
                ((local - cloud) / cloud) * 100.0
            },
        }
    }

    vec![
        row("Faithfulness", local.avg_faithfulness, cloud.avg_faithfulness),
        row("Completeness", local.avg_completeness, cloud.avg_completeness),
        row("Structure", local.avg_structure, cloud.avg_structure),
        row("Auto pass rate", local.auto_pass_rate, cloud.auto_pass_rate),
        row(
            "Latency p50 (ms)",
            local.latency_p50 as f64,
            cloud.latency_p50 as f64,
        ),
        row(
            "Throughput (c/s)",
            local.throughput_median,
            cloud.throughput_median,
        ),
        row("Determinism", local.determinism, cloud.determinism),
    ]
}

/// Render a delta table for one local backend.
#[must_use]
pub fn delta_markdown(deltas: &[DeltaRow], local_name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "### {local_name} vs Cloud");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Metric | Local | Cloud | Delta | Delta % |");
    let _ = writeln!(out, "|--------|-------|-------|-------|---------|");
    for d in deltas {
        let _ = writeln!(
            out,
            "| {} | {:.2} | {:.2} | {:.2} | {:.1}% |",
            d.metric, d.local_value, d.cloud_value, d.delta, d.delta_pct
        );
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str) -> BackendSummary {
        BackendSummary {
            backend: name.into(),
            avg_faithfulness: 1.8,
            avg_completeness: 1.6,
            avg_structure: 1.9,
            auto_pass_rate: 0.95,
            latency_p50: 4200,
            latency_p95: 7800,
            throughput_median: 52.3,
            determinism: 0.84,
        }
    }

    fn scores() -> QualityScores {
        QualityScores {
            json_parseable: None,
            json_schema_compliant: None,
            headings_present: Some(true),
            all_ids_valid: true,
            no_hallucinated_ids: true,
            pass_count: 3,
            total_checks: 3,
        }
    }

    fn result() -> CaseResult {
        CaseResult {
            case_id: "case-01".into(),
            backend: "rest-local".into(),
            mode: PromptMode::Summary,
            run: 1,
            latency_ms: 1234,
            char_count: 256,
            auto_score: scores(),
            human_score: None,
        }
    }

    // ── Thresholds ──────────────────────────────────────────────────────

    #[test]
    fn all_criteria_pass() {
        let results = evaluate_thresholds(&summary("b"));
        assert!(results.iter().all(|t| t.status == ThresholdStatus::Pass));
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn low_faithfulness_fails() {
        let mut s = summary("b");
        s.avg_faithfulness = 1.4;
        assert_eq!(evaluate_thresholds(&s)[0].status, ThresholdStatus::Fail);
    }

    #[test]
    fn faithfulness_boundary_passes() {
        let mut s = summary("b");
        s.avg_faithfulness = 1.5;
        assert_eq!(evaluate_thresholds(&s)[0].status, ThresholdStatus::Pass);
    }

    #[test]
    fn low_pass_rate_fails() {
        let mut s = summary("b");
        s.auto_pass_rate = 0.85;
        assert_eq!(evaluate_thresholds(&s)[1].status, ThresholdStatus::Fail);
    }

    #[test]
    fn latency_warn_band() {
        let mut s = summary("b");
        s.latency_p50 = 12_000;
        assert_eq!(evaluate_thresholds(&s)[2].status, ThresholdStatus::Warn);
        s.latency_p50 = 20_000;
        assert_eq!(evaluate_thresholds(&s)[2].status, ThresholdStatus::Fail);
        s.latency_p50 = 8000;
        assert_eq!(evaluate_thresholds(&s)[2].status, ThresholdStatus::Pass);
    }

    // ── CSV ─────────────────────────────────────────────────────────────

    #[test]
    fn csv_header_is_exact() {
        let csv = render_csv(&[]);
        assert_eq!(
            csv.lines().next().unwrap(),
            "case_id,backend,prompt_type,run,latency_ms,char_count,json_parseable,json_schema_compliant,headings_present,all_ids_valid,no_hallucinated_ids,faithfulness,completeness,structure,actionability,clarity,total_human,total_auto_pass"
        );
    }

    #[test]
    fn csv_row_renders_optionals_empty() {
        let csv = render_csv(&[result()]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "case-01,rest-local,SUMMARY,1,1234,256,,,true,true,true,,,,,,,3"
        );
    }

    #[test]
    fn csv_row_includes_human_scores() {
        let mut r = result();
        r.human_score = Some(HumanScore {
            faithfulness: 2,
            completeness: 1,
            structure: 2,
            actionability: 1,
            clarity: 2,
        });
        let csv = render_csv(&[r]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.ends_with(",2,1,2,1,2,8,3"));
    }

    #[test]
    fn csv_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&[result()], &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    // ── Markdown ────────────────────────────────────────────────────────

    #[test]
    fn table_has_one_row_per_backend() {
        let table = markdown_table(&[summary("a"), summary("b")]);
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("| a | 1.80 | 1.60 | 1.90 | 95.0% | 4200ms | 7800ms | 52.3 c/s | 0.840 |"));
    }

    #[test]
    fn report_includes_delta_section_only_with_cloud() {
        let with_cloud = render_markdown_report(
            "2025-01-15T00:00:00Z",
            3,
            5,
            &[summary("rest-local"), summary("rest-cloud")],
        );
        assert!(with_cloud.contains("## Cloud vs Local Delta Analysis"));
        assert!(with_cloud.contains("### rest-local vs Cloud"));

        let without_cloud = render_markdown_report(
            "2025-01-15T00:00:00Z",
            3,
            5,
            &[summary("rest-local")],
        );
        assert!(!without_cloud.contains("Delta Analysis"));
    }

    #[test]
    fn report_lists_thresholds_per_backend() {
        let report =
            render_markdown_report("2025-01-15T00:00:00Z", 1, 2, &[summary("rest-local")]);
        assert!(report.contains("### rest-local"));
        assert!(report.contains("- [PASS] Faithfulness: 1.80 (threshold: 1.50)"));
        assert!(report.contains("Runs per case: 2"));
    }

    // ── Deltas ──────────────────────────────────────────────────────────

    #[test]
    fn deltas_cover_seven_metrics() {
        let deltas = compute_deltas(&summary("local"), &summary("cloud"));
        assert_eq!(deltas.len(), 7);
        assert!(deltas.iter().all(|d| d.delta.abs() < f64::EPSILON));
    }

    #[test]
    fn delta_pct_zero_when_baseline_zero() {
        let mut cloud = summary("cloud");
        cloud.avg_faithfulness = 0.0;
        let local = summary("local");
        let deltas = compute_deltas(&local, &cloud);
        assert!((deltas[0].delta_pct - 0.0).abs() < f64::EPSILON);
        assert!((deltas[0].delta - 1.8).abs() < f64::EPSILON);
    }

    #[test]
    fn delta_pct_computed_against_cloud() {
        let mut local = summary("local");
        local.latency_p50 = 6000;
        let mut cloud = summary("cloud");
        cloud.latency_p50 = 4000;
        let deltas = compute_deltas(&local, &cloud);
        let latency = deltas.iter().find(|d| d.metric == "Latency p50 (ms)").unwrap();
        assert!((latency.delta - 2000.0).abs() < f64::EPSILON);
        assert!((latency.delta_pct - 50.0).abs() < f64::EPSILON);
    }
}
