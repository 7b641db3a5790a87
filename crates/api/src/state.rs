//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::{ApiConfig, StorageKind};
use crate::db::{self, ContactStore, InMemoryContactStore, PgContactStore};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("database URL is required for postgres storage")]
    MissingDatabaseUrl,
    #[error("failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the contact store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    contacts: Arc<dyn ContactStore>,
}

impl AppState {
    /// Create application state over an existing store.
    #[must_use]
    pub fn new(config: ApiConfig, contacts: Arc<dyn ContactStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, contacts }),
        }
    }

    /// Build state from configuration, connecting to the selected storage.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if postgres storage is selected and the pool
    /// cannot be created.
    pub async fn connect(config: ApiConfig) -> Result<Self, StateError> {
        let contacts: Arc<dyn ContactStore> = match config.storage {
            StorageKind::Postgres => {
                let url = config
                    .database_url
                    .as_ref()
                    .ok_or(StateError::MissingDatabaseUrl)?;
                let pool = db::create_pool(url).await?;
                tracing::info!("Database pool created");
                Arc::new(PgContactStore::new(pool))
            }
            StorageKind::Memory => {
                tracing::warn!("Using in-memory contact store; data is lost on restart");
                Arc::new(InMemoryContactStore::new())
            }
        };

        Ok(Self::new(config, contacts))
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the contact store.
    #[must_use]
    pub fn contacts(&self) -> &dyn ContactStore {
        self.inner.contacts.as_ref()
    }
}
