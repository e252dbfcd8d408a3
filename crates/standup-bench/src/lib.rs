//! # standup-bench
//!
//! Benchmark harness comparing standup generation backends.
//!
//! Drives (backend × case × mode × repetition) combinations through the
//! engine's prompt/score path, collecting latency, throughput, and
//! determinism statistics, then renders CSV and Markdown reports with
//! pass/fail threshold evaluation and cloud-vs-local deltas.
//!
//! - [`case`]: benchmark case files (`case-*.json`) and their loader
//! - [`runner`]: the nested, sequential benchmark loop
//! - [`metrics`]: nearest-rank percentiles and the determinism score
//! - [`report`]: CSV export, Markdown tables, thresholds, deltas

#![deny(unsafe_code)]

pub mod case;
pub mod metrics;
pub mod report;
pub mod runner;
