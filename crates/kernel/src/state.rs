//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tower_sessions::session_store::SessionStore;
use tracing::{info, warn};

use crate::config::Config;
use crate::metrics::Metrics;
use crate::publishing::PublishingService;
use crate::session;
use crate::settings::PublishingSettings;
use crate::store::{ContentStore, MediaStore, MemoryStore, PgStore};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Submission and deletion flows.
    publishing: PublishingService,

    /// Session store, kept for health checks.
    sessions: Arc<dyn SessionStore>,

    /// Prometheus metrics.
    metrics: Metrics,
}

impl AppState {
    /// Load publishing settings and connect the content store.
    ///
    /// Uses PostgreSQL when a database URL is configured and the in-memory
    /// store otherwise.
    pub async fn new(config: &Config, sessions: Arc<dyn SessionStore>) -> Result<Self> {
        let settings = PublishingSettings::load(&config.settings_path)
            .context("failed to load publishing settings")?;

        let (content, media): (Arc<dyn ContentStore>, Arc<dyn MediaStore>) =
            match &config.database_url {
                Some(url) => {
                    let store = PgStore::connect(url, config.database_max_connections)
                        .await
                        .context("failed to connect to PostgreSQL")?;
                    info!("PostgreSQL content store ready");
                    (Arc::new(store.clone()), Arc::new(store))
                }
                None => {
                    warn!("DATABASE_URL not set, content is kept in memory only");
                    let store = MemoryStore::new();
                    (Arc::new(store.clone()), Arc::new(store))
                }
            };

        let publishing = PublishingService::new(
            settings,
            content,
            media,
            config.site_url.clone(),
            config.uploads_url.clone(),
        );

        Ok(Self::from_parts(publishing, sessions))
    }

    /// Assemble state from an already-built service.
    pub fn from_parts(publishing: PublishingService, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                publishing,
                sessions,
                metrics: Metrics::new(),
            }),
        }
    }

    /// Get the publishing service.
    pub fn publishing(&self) -> &PublishingService {
        &self.inner.publishing
    }

    /// Get the metrics registry.
    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }

    /// Check if the content store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.inner.publishing.store_healthy().await
    }

    /// Check if the session store is reachable.
    pub async fn sessions_healthy(&self) -> bool {
        session::store_reachable(self.inner.sessions.as_ref()).await
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("publishing", &self.inner.publishing)
            .finish()
    }
}
