//! The generation capability the summary engine depends on.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use futures::stream;
use standup_core::config::GenerationConfig;

use crate::error::BackendResult;

/// Boxed stream of generated text fragments, in backend emission order.
///
/// Finite and not restartable. Consumers must not reorder or buffer beyond
/// simple concatenation.
pub type TextStream = Pin<Box<dyn Stream<Item = BackendResult<String>> + Send>>;

/// A pluggable text-generation backend.
///
/// Implementations own any contention with their underlying engine: when the
/// engine holds non-reentrant state (a single model context), concurrent
/// `generate`/`generate_stream` calls must be serialized by the backend, and
/// internal generation state must be fully reset between calls so a timed-out
/// call cannot corrupt the next one. [`crate::SerializedBackend`] provides
/// that serialization as a wrapper.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Backend name used in logs and benchmark reports.
    fn name(&self) -> &str;

    /// Generate the full completion for `prompt`.
    ///
    /// One round-trip, no internal retry. Any transport, timeout, or
    /// inference fault surfaces as a [`crate::BackendError`].
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> BackendResult<String>;

    /// Generate as a stream of text fragments.
    ///
    /// The default implementation performs a single [`Backend::generate`]
    /// round-trip and wraps the result as a one-fragment stream, so
    /// implementers that cannot stream only provide `generate`.
    async fn generate_stream(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> BackendResult<TextStream> {
        let full = self.generate(prompt, config).await?;
        Ok(Box::pin(stream::once(async move { Ok(full) })))
    }
}
