//! Call serialization for backends with non-reentrant underlying state.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use standup_core::config::GenerationConfig;
use tokio::sync::Mutex;

use crate::backend::{Backend, TextStream};
use crate::error::BackendResult;

/// Wraps a backend whose underlying engine holds non-reentrant state (a
/// single model context) so that concurrent calls queue instead of
/// interleaving.
///
/// `generate` holds the lock for the duration of the round-trip. For
/// `generate_stream`, the lock is held until the returned stream is fully
/// drained or dropped, so a caller abandoning a stream releases the engine for
/// the next call.
pub struct SerializedBackend<B> {
    inner: B,
    lock: Arc<Mutex<()>>,
}

impl<B: Backend> SerializedBackend<B> {
    /// Wrap `inner` with a fresh lock.
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            lock: Arc::new(Mutex::new(())),
        }
    }
}

#[async_trait]
impl<B: Backend> Backend for SerializedBackend<B> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> BackendResult<String> {
        let _guard = self.lock.lock().await;
        self.inner.generate(prompt, config).await
    }

    async fn generate_stream(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> BackendResult<TextStream> {
        let guard = Arc::clone(&self.lock).lock_owned().await;
        let mut inner = self.inner.generate_stream(prompt, config).await?;
        Ok(Box::pin(async_stream::stream! {
            let _guard = guard;
            while let Some(item) = inner.next().await {
                yield item;
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Records the peak number of concurrent `generate` calls.
    struct ContendedBackend {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ContendedBackend {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Backend for ContendedBackend {
        fn name(&self) -> &str {
            "contended"
        }

        async fn generate(
            &self,
            _prompt: &str,
            _config: &GenerationConfig,
        ) -> BackendResult<String> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            let _ = self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            let _ = self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok("out".into())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_generates_are_serialized() {
        let backend = SerializedBackend::new(ContendedBackend::new());
        let config = GenerationConfig::default();

        let (a, b) = futures::join!(backend.generate("a", &config), backend.generate("b", &config));
        assert_eq!(a.unwrap(), "out");
        assert_eq!(b.unwrap(), "out");
        assert_eq!(backend.inner.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn generate_waits_for_stream_to_drain() {
        let backend = SerializedBackend::new(ContendedBackend::new());
        let config = GenerationConfig::default();

        let stream = backend.generate_stream("a", &config).await.unwrap();
        // Lock is held by the undrained stream; dropping it releases.
        drop(stream);
        let result = backend.generate("b", &config).await.unwrap();
        assert_eq!(result, "out");
    }

    #[tokio::test]
    async fn name_delegates_to_inner() {
        let backend = SerializedBackend::new(ContendedBackend::new());
        assert_eq!(backend.name(), "contended");
    }
}
