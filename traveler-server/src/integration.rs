//! Integration entry point: setup, unload, manual refresh.
//!
//! Wires a configuration entry to one or two polling coordinators backed
//! by a shared connection manager, forwards setup/unload to the declared
//! platforms, and registers the `update_journeys` service.

use std::sync::Arc;

use futures::FutureExt;

use crate::cache::{CacheConfig, CachedConnection};
use crate::coordinator::{JourneyCoordinator, JourneyMode};
use crate::entry::ConfigEntry;
use crate::platform::{Platform, PlatformError};
use crate::registry::{CoordinatorRegistry, EntryCoordinators};
use crate::services::{ServiceCall, ServiceRegistry};
use crate::sncf::{ApiConnectionManager, ApiError, ConnectionConfig, JourneyApi};

/// The integration domain.
pub const DOMAIN: &str = "train_traveler";

/// Name of the manual-refresh service.
pub const SERVICE_UPDATE_JOURNEYS: &str = "update_journeys";

/// Errors that fail an entry setup.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The entry failed validation
    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    /// The connection manager could not be constructed
    #[error("failed to construct connection manager: {0}")]
    Connection(ApiError),

    /// A coordinator's initial refresh failed
    #[error("initial refresh failed: {0}")]
    FirstRefresh(ApiError),

    /// A platform rejected the entry
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Errors that fail an entry unload.
#[derive(Debug, thiserror::Error)]
pub enum UnloadError {
    /// One or more platforms failed to unload
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Factory producing the connection an entry's coordinators share.
pub type Connector =
    Arc<dyn Fn(&ConfigEntry) -> Result<Arc<dyn JourneyApi>, ApiError> + Send + Sync>;

/// The default connector: the real HTTP manager behind a response cache.
fn cached_http_connector(entry: &ConfigEntry) -> Result<Arc<dyn JourneyApi>, ApiError> {
    let manager = ApiConnectionManager::new(ConnectionConfig::new(
        &entry.url,
        &entry.api_key,
        &entry.region,
    ))?;

    Ok(Arc::new(CachedConnection::new(
        Arc::new(manager),
        &CacheConfig::default(),
    )))
}

/// The integration runtime: registry, services, declared platforms.
pub struct Integration {
    registry: Arc<CoordinatorRegistry>,
    services: Arc<ServiceRegistry>,
    platforms: Vec<Arc<dyn Platform>>,
    connector: Connector,
}

impl Integration {
    /// Create an integration with the given declared platforms, backed by
    /// the real API client.
    pub fn new(platforms: Vec<Arc<dyn Platform>>) -> Self {
        Self::with_connector(platforms, Arc::new(cached_http_connector))
    }

    /// Create an integration with a custom connection factory.
    ///
    /// Tests substitute a mock connection here; everything downstream of
    /// entry validation runs the same code path as production.
    pub fn with_connector(platforms: Vec<Arc<dyn Platform>>, connector: Connector) -> Self {
        Self {
            registry: Arc::new(CoordinatorRegistry::new()),
            services: Arc::new(ServiceRegistry::new()),
            platforms,
            connector,
        }
    }

    /// The coordinator registry.
    pub fn registry(&self) -> &Arc<CoordinatorRegistry> {
        &self.registry
    }

    /// The service registry.
    pub fn services(&self) -> &Arc<ServiceRegistry> {
        &self.services
    }

    /// Set up a configuration entry.
    ///
    /// Constructs one connection manager shared by up to two coordinators,
    /// performs each coordinator's first refresh synchronously (failure
    /// fails the setup before platforms are reached), registers the
    /// coordinators, forwards setup to the declared platforms, and
    /// registers the manual-refresh service.
    pub async fn setup_entry(&self, entry: &ConfigEntry) -> Result<(), SetupError> {
        tracing::info!(
            entry_id = %entry.entry_id,
            region = %entry.region,
            last_journey = entry.last_journey,
            "setting up entry"
        );

        entry.validate().map_err(SetupError::InvalidEntry)?;

        // One connection shared by both coordinators of this entry
        let connection = (self.connector)(entry).map_err(SetupError::Connection)?;

        let coordinators = self.build_coordinators(entry, connection).await?;

        self.registry
            .insert(DOMAIN, &entry.entry_id, coordinators.clone())
            .await;

        for platform in &self.platforms {
            tracing::debug!(platform = platform.name(), entry_id = %entry.entry_id, "forwarding setup");
            platform.setup_entry(entry, &coordinators).await?;
        }

        self.register_update_service(&entry.entry_id).await;

        tracing::info!(entry_id = %entry.entry_id, "entry set up");
        Ok(())
    }

    /// Construct and first-refresh the coordinators for an entry.
    async fn build_coordinators(
        &self,
        entry: &ConfigEntry,
        connection: Arc<dyn JourneyApi>,
    ) -> Result<EntryCoordinators, SetupError> {
        tracing::info!(entry_id = %entry.entry_id, "adding coordinator for next journey");
        let next_journey = Arc::new(JourneyCoordinator::new(
            Arc::clone(&connection),
            entry,
            JourneyMode::NextJourney,
        ));
        next_journey
            .first_refresh()
            .await
            .map_err(SetupError::FirstRefresh)?;
        next_journey.start();

        let last_journey = if entry.last_journey {
            tracing::info!(entry_id = %entry.entry_id, "adding coordinator for last journey");
            let coordinator = Arc::new(JourneyCoordinator::new(
                connection,
                entry,
                JourneyMode::LastJourney,
            ));
            if let Err(e) = coordinator.first_refresh().await {
                // The next-journey coordinator started polling already;
                // stop it before failing the setup.
                next_journey.shutdown();
                return Err(SetupError::FirstRefresh(e));
            }
            coordinator.start();
            Some(coordinator)
        } else {
            None
        };

        Ok(EntryCoordinators {
            next_journey,
            last_journey,
        })
    }

    /// Register the manual-refresh service, closed over this entry id.
    ///
    /// The handler requests a fire-and-forget refresh on whichever of the
    /// entry's coordinators are present. Registration is init-once; on
    /// every later entry setup this is a no-op.
    async fn register_update_service(&self, entry_id: &str) {
        let registry = Arc::clone(&self.registry);
        let entry_id = entry_id.to_string();

        self.services
            .register(DOMAIN, SERVICE_UPDATE_JOURNEYS, move |_call: ServiceCall| {
                let registry = Arc::clone(&registry);
                let entry_id = entry_id.clone();
                async move {
                    tracing::info!("manual update of train journeys requested via service call");

                    let Some(coordinators) = registry.get(DOMAIN, &entry_id).await else {
                        tracing::warn!(entry_id = %entry_id, "no coordinators registered for entry");
                        return;
                    };

                    coordinators.next_journey.request_refresh();
                    tracing::info!("next journey refresh requested");

                    if let Some(last) = &coordinators.last_journey {
                        last.request_refresh();
                        tracing::info!("last journey refresh requested");
                    }
                }
                .boxed()
            })
            .await;
    }

    /// Unload a configuration entry.
    ///
    /// Forwards unload to every declared platform. Only when all of them
    /// succeed is the registry sub-mapping removed (and its coordinators
    /// shut down); on any failure the registry is left untouched.
    pub async fn unload_entry(&self, entry: &ConfigEntry) -> Result<(), UnloadError> {
        let mut failure: Option<PlatformError> = None;

        for platform in &self.platforms {
            if let Err(e) = platform.unload_entry(entry).await {
                tracing::error!(platform = platform.name(), error = %e, "platform unload failed");
                failure.get_or_insert(e);
            }
        }

        if let Some(e) = failure {
            return Err(UnloadError::Platform(e));
        }

        self.registry.remove(DOMAIN, &entry.entry_id).await;
        tracing::info!(entry_id = %entry.entry_id, "entry unloaded");
        Ok(())
    }
}
