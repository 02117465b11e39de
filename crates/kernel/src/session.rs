//! Session management.
//!
//! Sessions live in Redis when a Redis URL is configured, in process memory
//! otherwise. The host's login flow writes the acting user into the session;
//! Scrivener reads it and stores authenticity tokens next to it.

use anyhow::{Context, Result};
use fred::prelude::*;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::session::Id;
use tower_sessions::session_store::SessionStore;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_redis_store::RedisStore;

/// Default session expiry (24 hours).
pub const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 24;

/// Parse a SameSite policy name; anything unknown is treated as strict.
pub fn parse_same_site(value: &str) -> SameSite {
    match value.to_ascii_lowercase().as_str() {
        "lax" => SameSite::Lax,
        "none" => SameSite::None,
        _ => SameSite::Strict,
    }
}

/// Connect the Redis session store.
pub async fn connect_redis_store(redis_url: &str) -> Result<RedisStore<Pool>> {
    let config = Config::from_url(redis_url).context("failed to parse Redis URL")?;

    let pool = Builder::from_config(config)
        .build_pool(1)
        .context("failed to create Redis pool")?;

    pool.init()
        .await
        .context("failed to connect to Redis for sessions")?;

    Ok(RedisStore::new(pool))
}

/// Create the session layer over `store`.
pub fn create_session_layer<S: SessionStore + Clone>(
    store: S,
    same_site: SameSite,
    secure: bool,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_secure(secure)
        .with_http_only(true)
        .with_same_site(same_site)
        .with_expiry(Expiry::OnInactivity(Duration::hours(
            DEFAULT_SESSION_EXPIRY_HOURS,
        )))
}

/// Whether the session store answers a lookup.
pub async fn store_reachable(store: &dyn SessionStore) -> bool {
    store.load(&Id::default()).await.is_ok()
}
