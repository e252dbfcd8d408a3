//! # standup-core
//!
//! Foundation types for the standup summary engine.
//!
//! This crate provides the shared vocabulary that all other standup crates
//! depend on:
//!
//! - **Records**: [`records::ChangeRecord`] as supplied by the change source
//! - **Summaries**: [`summary::StandupSummary`] with ordered sections/items
//! - **Modes**: [`summary::PromptMode`] selecting the generation target
//! - **Scores**: [`scores::QualityScores`] and [`scores::ScoredResult`]
//! - **Progress**: [`progress::ProgressEvent`] for the streaming pipeline
//! - **Config**: [`config::GenerationConfig`] sampling parameters
//! - **Logging**: [`logging::init`] tracing-subscriber setup for binaries
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other standup crates.

#![deny(unsafe_code)]

pub mod config;
pub mod logging;
pub mod progress;
pub mod records;
pub mod scores;
pub mod summary;
