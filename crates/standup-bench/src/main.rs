//! Benchmark CLI comparing standup generation backends.
//!
//! Configures REST backends for a local endpoint and an optional cloud
//! baseline, runs every case × mode × repetition combination, and writes
//! `benchmark-report.md` plus `benchmark-results.csv` to the output
//! directory.

#![deny(unsafe_code)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use standup_bench::case::load_cases;
use standup_bench::report::{render_markdown_report, write_csv};
use standup_bench::runner::{BenchmarkRunner, RunnerOptions};
use standup_core::config::GenerationConfig;
use standup_core::summary::PromptMode;
use standup_llm::{BackendConfig, BackendKind, BackendRegistry, create_backend};
use tracing::warn;

/// Backend name for the local REST endpoint.
const LOCAL_BACKEND: &str = "rest-local";

/// Backend name for the cloud baseline. The name must contain "cloud" for
/// the report's delta section to pick it up.
const CLOUD_BACKEND: &str = "rest-cloud";

#[derive(Debug, Parser)]
#[command(
    name = "standup-bench",
    about = "Benchmark runner comparing standup generation backends"
)]
struct Args {
    /// Directory containing `case-*.json` files.
    #[arg(long, default_value = "bench")]
    bench_dir: PathBuf,

    /// Comma-separated backend names to run (`rest-local`, `rest-cloud`).
    /// Default: all configured.
    #[arg(long)]
    backends: Option<String>,

    /// Repetitions per (case, mode).
    #[arg(long, default_value_t = 5)]
    runs: u32,

    /// Comma-separated case IDs to run. Default: all.
    #[arg(long)]
    cases: Option<String>,

    /// Comma-separated prompt modes: `SUMMARY`, `JSON`. Default: both.
    #[arg(long)]
    prompts: Option<String>,

    /// Per-call timeout in milliseconds.
    #[arg(long, default_value_t = 30_000)]
    timeout_ms: u64,

    /// Local REST endpoint URL.
    #[arg(long, default_value = "http://localhost:1234")]
    local_url: String,

    /// Local model name.
    #[arg(long, default_value = "tinyllama-1.1b-chat-v1.0")]
    local_model: String,

    /// Bearer token for the local endpoint (falls back to
    /// `$BENCH_LOCAL_API_KEY`).
    #[arg(long)]
    local_api_key: Option<String>,

    /// Cloud baseline endpoint URL (falls back to `$BENCH_CLOUD_URL`). The
    /// delta section is skipped when unset.
    #[arg(long)]
    cloud_url: Option<String>,

    /// Cloud model name.
    #[arg(long, default_value = "gpt-4o-mini")]
    cloud_model: String,

    /// Bearer token for the cloud endpoint (falls back to
    /// `$BENCH_CLOUD_API_KEY`, then `$OPENAI_API_KEY`).
    #[arg(long)]
    cloud_api_key: Option<String>,

    /// Directory for the generated reports.
    #[arg(long, default_value = "benchmark-results")]
    output_dir: PathBuf,
}

fn parse_list(raw: Option<&str>) -> Option<HashSet<String>> {
    let set: HashSet<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if set.is_empty() { None } else { Some(set) }
}

fn parse_modes(raw: Option<&str>) -> Result<Vec<PromptMode>> {
    let Some(raw) = raw else {
        return Ok(PromptMode::ALL.to_vec());
    };
    let mut modes = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let Some(mode) = PromptMode::parse(part) else {
            bail!("unknown prompt mode: {part} (expected SUMMARY or JSON)");
        };
        if !modes.contains(&mode) {
            modes.push(mode);
        }
    }
    if modes.is_empty() {
        return Ok(PromptMode::ALL.to_vec());
    }
    Ok(modes)
}

fn build_registry(args: &Args) -> BackendRegistry {
    let requested = parse_list(args.backends.as_deref());
    let wanted = |name: &str| requested.as_ref().is_none_or(|set| set.contains(name));
    let registry = BackendRegistry::new();

    if wanted(LOCAL_BACKEND) {
        let config = BackendConfig {
            base_url: args.local_url.clone(),
            model: args.local_model.clone(),
            api_key: args
                .local_api_key
                .clone()
                .or_else(|| std::env::var("BENCH_LOCAL_API_KEY").ok()),
            ..BackendConfig::default()
        };
        match create_backend(LOCAL_BACKEND, BackendKind::Rest, &config) {
            Ok(backend) => registry.register(backend),
            Err(e) => warn!(error = %e, "skipping {LOCAL_BACKEND}"),
        }
    }

    let cloud_url = args
        .cloud_url
        .clone()
        .or_else(|| std::env::var("BENCH_CLOUD_URL").ok());
    match cloud_url {
        Some(base_url) if wanted(CLOUD_BACKEND) => {
            let config = BackendConfig {
                base_url,
                model: args.cloud_model.clone(),
                api_key: args
                    .cloud_api_key
                    .clone()
                    .or_else(|| std::env::var("BENCH_CLOUD_API_KEY").ok())
                    .or_else(|| std::env::var("OPENAI_API_KEY").ok()),
                ..BackendConfig::default()
            };
            match create_backend(CLOUD_BACKEND, BackendKind::Rest, &config) {
                Ok(backend) => registry.register(backend),
                Err(e) => warn!(error = %e, "skipping {CLOUD_BACKEND}"),
            }
        }
        Some(_) => {}
        None => warn!("cloud baseline skipped — pass --cloud-url for the delta section"),
    }

    registry
}

#[tokio::main]
async fn main() -> Result<()> {
    standup_core::logging::init();
    let args = Args::parse();

    let registry = build_registry(&args);
    if registry.is_empty() {
        bail!("no backends configured; pass --local-url and/or --cloud-url");
    }

    let cases = load_cases(&args.bench_dir)?;
    let case_count = cases.len();
    let options = RunnerOptions {
        runs_per_case: args.runs,
        case_filter: parse_list(args.cases.as_deref()),
        modes: parse_modes(args.prompts.as_deref())?,
        timeout: Duration::from_millis(args.timeout_ms),
        generation: GenerationConfig::default(),
    };

    let mut runner = BenchmarkRunner::new(cases, options);
    runner.run(&registry).await;

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            args.output_dir.display()
        )
    })?;

    let report = render_markdown_report(
        &chrono::Utc::now().to_rfc3339(),
        case_count,
        args.runs,
        &runner.build_summaries(),
    );
    let report_path = args.output_dir.join("benchmark-report.md");
    std::fs::write(&report_path, report)
        .with_context(|| format!("failed to write report: {}", report_path.display()))?;
    println!("{}", report_path.display());

    let csv_path = args.output_dir.join("benchmark-results.csv");
    write_csv(runner.results(), &csv_path)?;
    println!("{}", csv_path.display());

    Ok(())
}
