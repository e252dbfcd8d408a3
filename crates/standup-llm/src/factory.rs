//! Backend construction from explicit configuration.
//!
//! Concrete backends are selected at construction time via configuration, not
//! runtime reflection; callers (the benchmark CLI, integrators) decide which
//! kinds to build and under which names.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::backend::Backend;
use crate::error::BackendResult;
use crate::rest::RestBackend;

/// Which concrete backend implementation to construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// OpenAI-compatible REST endpoint ([`RestBackend`]).
    Rest,
}

/// Programmatic backend configuration.
#[derive(Clone, Debug)]
pub struct BackendConfig {
    /// Endpoint base URL; path suffixes like `/v1` are tolerated.
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Optional Bearer token.
    pub api_key: Option<String>,
    /// Whole-request timeout. Generous, since local inference is slow.
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "llama3.2:3b".into(),
            api_key: None,
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// Build a backend of the given kind under the given display name.
pub fn create_backend(
    name: &str,
    kind: BackendKind,
    config: &BackendConfig,
) -> BackendResult<Arc<dyn Backend>> {
    debug!(name, ?kind, base_url = %config.base_url, model = %config.model, "creating backend");
    match kind {
        BackendKind::Rest => Ok(Arc::new(RestBackend::new(name, config.clone())?)),
    }
}
