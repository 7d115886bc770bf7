//! Process-wide coordinator registry.
//!
//! A two-level mapping: integration domain -> entry id -> the entry's
//! coordinators. The domain level is created lazily on first insert.
//!
//! Inserting over a live entry id replaces the previous sub-mapping and
//! shuts its coordinators down, so a re-setup without a prior unload
//! cannot leak polling tasks.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::coordinator::JourneyCoordinator;

/// The coordinators registered for one entry.
#[derive(Clone)]
pub struct EntryCoordinators {
    /// Always present: the next-journey coordinator.
    pub next_journey: Arc<JourneyCoordinator>,

    /// Present only when the entry's last-journey flag is set.
    pub last_journey: Option<Arc<JourneyCoordinator>>,
}

impl EntryCoordinators {
    /// Stop the polling tasks of every coordinator in this set.
    pub fn shutdown(&self) {
        self.next_journey.shutdown();
        if let Some(last) = &self.last_journey {
            last.shutdown();
        }
    }
}

/// Registry of coordinators keyed by domain and entry id.
#[derive(Default)]
pub struct CoordinatorRegistry {
    inner: RwLock<HashMap<String, HashMap<String, EntryCoordinators>>>,
}

impl CoordinatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register coordinators for an entry, creating the domain level if
    /// absent. A previous sub-mapping for the same entry id is replaced
    /// and its coordinators are shut down.
    pub async fn insert(&self, domain: &str, entry_id: &str, coordinators: EntryCoordinators) {
        let mut guard = self.inner.write().await;
        let entries = guard.entry(domain.to_string()).or_default();

        if let Some(old) = entries.insert(entry_id.to_string(), coordinators) {
            tracing::warn!(
                domain,
                entry_id,
                "replacing live registry entry; shutting down previous coordinators"
            );
            old.shutdown();
        }
    }

    /// Look up the coordinators for an entry.
    pub async fn get(&self, domain: &str, entry_id: &str) -> Option<EntryCoordinators> {
        let guard = self.inner.read().await;
        guard.get(domain).and_then(|e| e.get(entry_id)).cloned()
    }

    /// Whether an entry is registered.
    pub async fn contains(&self, domain: &str, entry_id: &str) -> bool {
        let guard = self.inner.read().await;
        guard.get(domain).is_some_and(|e| e.contains_key(entry_id))
    }

    /// Remove an entry's coordinators, shutting them down.
    ///
    /// Returns true if the entry was present.
    pub async fn remove(&self, domain: &str, entry_id: &str) -> bool {
        let mut guard = self.inner.write().await;
        let Some(entries) = guard.get_mut(domain) else {
            return false;
        };

        match entries.remove(entry_id) {
            Some(old) => {
                old.shutdown();
                true
            }
            None => false,
        }
    }

    /// Entry ids registered under a domain.
    pub async fn entry_ids(&self, domain: &str) -> Vec<String> {
        let guard = self.inner.read().await;
        guard
            .get(domain)
            .map(|e| e.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Shut down and remove everything (process teardown).
    pub async fn shutdown_all(&self) {
        let mut guard = self.inner.write().await;
        for (_, entries) in guard.drain() {
            for (_, coordinators) in entries {
                coordinators.shutdown();
            }
        }
    }
}
