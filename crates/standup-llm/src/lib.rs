//! # standup-llm
//!
//! The text-generation capability consumed by the summary engine, plus the
//! concrete backends that provide it.
//!
//! - [`Backend`]: the two-method capability trait (`generate`,
//!   `generate_stream` with a one-fragment default)
//! - [`RestBackend`]: OpenAI-compatible `/v1/chat/completions` client with
//!   SSE streaming
//! - [`SerializedBackend`]: wrapper that serializes calls against a backend
//!   whose underlying engine holds non-reentrant state
//! - [`BackendRegistry`]: named backend lookup behind a single mutex
//! - [`create_backend`]: factory building backends from explicit
//!   configuration
//!
//! ## Crate Position
//!
//! Depends on `standup-core`. Consumed by `standup-engine` and
//! `standup-bench`.

#![deny(unsafe_code)]

pub mod backend;
pub mod error;
pub mod factory;
pub mod registry;
pub mod rest;
pub mod serialized;

pub use backend::{Backend, TextStream};
pub use error::{BackendError, BackendResult};
pub use factory::{BackendConfig, BackendKind, create_backend};
pub use registry::BackendRegistry;
pub use rest::RestBackend;
pub use serialized::SerializedBackend;
