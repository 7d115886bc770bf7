//! Process-wide service registry.
//!
//! Named actions scoped by integration domain, e.g.
//! `train_traveler.update_journeys`. Registration is init-once: the first
//! handler registered for a `(domain, name)` pair wins and later
//! registrations are tolerated no-ops, so an integration that registers
//! its service on every entry setup does not clobber the live handler.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::RwLock;

/// A service invocation.
#[derive(Debug, Clone, Default)]
pub struct ServiceCall {
    /// Caller-supplied payload; services without parameters ignore it.
    pub data: serde_json::Value,
}

/// Errors from service invocation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    /// No handler registered under this domain and name
    #[error("no service {domain}.{name} registered")]
    NotFound { domain: String, name: String },
}

type Handler = Arc<dyn Fn(ServiceCall) -> BoxFuture<'static, ()> + Send + Sync>;

/// Registry of named service handlers.
#[derive(Default)]
pub struct ServiceRegistry {
    inner: RwLock<HashMap<(String, String), Handler>>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `domain.name`.
    ///
    /// Returns true if the handler was installed, false if one already
    /// existed (the existing handler is kept).
    pub async fn register<F>(&self, domain: &str, name: &str, handler: F) -> bool
    where
        F: Fn(ServiceCall) -> BoxFuture<'static, ()> + Send + Sync + 'static,
    {
        let mut guard = self.inner.write().await;
        let key = (domain.to_string(), name.to_string());

        if guard.contains_key(&key) {
            tracing::debug!(domain, name, "service already registered; keeping first handler");
            return false;
        }

        guard.insert(key, Arc::new(handler));
        tracing::info!(domain, name, "service registered");
        true
    }

    /// Whether a handler is registered for `domain.name`.
    pub async fn has(&self, domain: &str, name: &str) -> bool {
        let guard = self.inner.read().await;
        guard.contains_key(&(domain.to_string(), name.to_string()))
    }

    /// Invoke the handler for `domain.name` and wait for it to return.
    ///
    /// The handler itself has no result; services are side-effecting only.
    pub async fn call(&self, domain: &str, name: &str, call: ServiceCall) -> Result<(), ServiceError> {
        let handler = {
            let guard = self.inner.read().await;
            guard
                .get(&(domain.to_string(), name.to_string()))
                .cloned()
                .ok_or_else(|| ServiceError::NotFound {
                    domain: domain.to_string(),
                    name: name.to_string(),
                })?
        };

        handler(call).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::FutureExt;

    fn counting_handler(
        counter: Arc<AtomicUsize>,
    ) -> impl Fn(ServiceCall) -> BoxFuture<'static, ()> + Send + Sync + 'static {
        move |_call| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn register_and_call() {
        let registry = ServiceRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        assert!(
            registry
                .register("train_traveler", "update_journeys", counting_handler(counter.clone()))
                .await
        );
        assert!(registry.has("train_traveler", "update_journeys").await);

        registry
            .call("train_traveler", "update_journeys", ServiceCall::default())
            .await
            .unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_service_is_error() {
        let registry = ServiceRegistry::new();
        let result = registry
            .call("train_traveler", "nope", ServiceCall::default())
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn first_registration_wins() {
        let registry = ServiceRegistry::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        assert!(
            registry
                .register("train_traveler", "update_journeys", counting_handler(first.clone()))
                .await
        );
        assert!(
            !registry
                .register("train_traveler", "update_journeys", counting_handler(second.clone()))
                .await
        );

        registry
            .call("train_traveler", "update_journeys", ServiceCall::default())
            .await
            .unwrap();

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn services_are_scoped_by_domain() {
        let registry = ServiceRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));

        registry
            .register("train_traveler", "update_journeys", counting_handler(counter.clone()))
            .await;

        let result = registry
            .call("other_domain", "update_journeys", ServiceCall::default())
            .await;
        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
