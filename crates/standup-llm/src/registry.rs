//! Named backend lookup.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::Backend;

/// Backend lookup by name, shared between integrators and the benchmark
/// runner.
///
/// A plain map behind a single mutex; every operation is a short,
/// non-blocking critical section. Registering a name twice replaces the
/// earlier backend.
#[derive(Default)]
pub struct BackendRegistry {
    backends: Mutex<HashMap<String, Arc<dyn Backend>>>,
}

impl BackendRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under its own [`Backend::name`].
    pub fn register(&self, backend: Arc<dyn Backend>) {
        let name = backend.name().to_string();
        let _ = self.backends.lock().insert(name, backend);
    }

    /// Look up a backend by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Backend>> {
        self.backends.lock().get(name).map(Arc::clone)
    }

    /// All registered names, sorted for deterministic iteration.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.backends.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered backends.
    #[must_use]
    pub fn len(&self) -> usize {
        self.backends.lock().len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backends.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use standup_core::config::GenerationConfig;

    use crate::error::BackendResult;

    struct NamedBackend(&'static str);

    #[async_trait]
    impl Backend for NamedBackend {
        fn name(&self) -> &str {
            self.0
        }

        async fn generate(
            &self,
            _prompt: &str,
            _config: &GenerationConfig,
        ) -> BackendResult<String> {
            Ok(String::new())
        }
    }

    #[test]
    fn register_and_get() {
        let registry = BackendRegistry::new();
        registry.register(Arc::new(NamedBackend("a")));
        assert!(registry.get("a").is_some());
        assert!(registry.get("b").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn names_are_sorted() {
        let registry = BackendRegistry::new();
        registry.register(Arc::new(NamedBackend("zeta")));
        registry.register(Arc::new(NamedBackend("alpha")));
        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn re_registration_replaces() {
        let registry = BackendRegistry::new();
        registry.register(Arc::new(NamedBackend("a")));
        registry.register(Arc::new(NamedBackend("a")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_registry() {
        let registry = BackendRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.names().is_empty());
    }
}
