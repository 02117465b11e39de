//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL. When None, the in-memory store is used.
    pub database_url: Option<String>,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Redis connection URL for sessions. When None, sessions live in memory.
    pub redis_url: Option<String>,

    /// Public site URL. Embedded images must live under it to be adopted.
    pub site_url: String,

    /// Base URL of the upload directory (default: `{site_url}/uploads`).
    pub uploads_url: String,

    /// Path to the publishing settings YAML file.
    pub settings_path: PathBuf,

    /// Cookie SameSite policy: "strict", "lax", or "none" (default: "strict").
    pub cookie_same_site: String,

    /// Whether the session cookie is marked Secure (default: true).
    pub cookie_secure: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let redis_url = env::var("REDIS_URL").ok().filter(|v| !v.is_empty());

        let site_url = env::var("SITE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let uploads_url = env::var("UPLOADS_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| format!("{site_url}/uploads"));

        let settings_path = env::var("PUBLISHING_SETTINGS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./publishing.yml"));

        let cookie_same_site = env::var("COOKIE_SAME_SITE")
            .unwrap_or_else(|_| "strict".to_string())
            .to_lowercase();

        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(true);

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            redis_url,
            site_url,
            uploads_url,
            settings_path,
            cookie_same_site,
            cookie_secure,
        })
    }
}
