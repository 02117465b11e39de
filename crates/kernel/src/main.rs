//! Scrivener server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_sessions::MemoryStore;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use scrivener_kernel::session::{self, create_session_layer, parse_same_site};
use scrivener_kernel::{AppState, Config, build_router};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting Scrivener");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(port = config.port, site_url = %config.site_url, "Configuration loaded");

    let same_site = parse_same_site(&config.cookie_same_site);

    let app = match &config.redis_url {
        Some(redis_url) => {
            let store = session::connect_redis_store(redis_url)
                .await
                .context("failed to create session store")?;
            let state = AppState::new(&config, Arc::new(store.clone()))
                .await
                .context("failed to initialize application state")?;
            info!("Redis session store ready");
            build_router(
                state,
                create_session_layer(store, same_site, config.cookie_secure),
            )
        }
        None => {
            let store = MemoryStore::default();
            let state = AppState::new(&config, Arc::new(store.clone()))
                .await
                .context("failed to initialize application state")?;
            info!("REDIS_URL not set, sessions are kept in memory");
            build_router(
                state,
                create_session_layer(store, same_site, config.cookie_secure),
            )
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
