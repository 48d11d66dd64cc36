//! Server configuration.
//!
//! Loaded from environment variables at startup, mirroring the teacher's
//! `ServerConfig::from_env`. There is no CLI flag parser — env vars with
//! defaults are the whole ambient configuration layer.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Graceful-shutdown grace window.
    pub exit_timeout: Duration,
    /// Optional seed config file (`.json`/`.yml`/`.yaml`), overriding the store on startup.
    pub seed_config_path: Option<PathBuf>,
    /// Live database file path.
    pub db_path: PathBuf,
    /// Timeout waiting to acquire the live database's file lock.
    pub db_open_timeout: Duration,
    /// Archive database file path.
    pub archive_path: PathBuf,
    /// Interval between archive sweeps.
    pub archive_sweep_interval: Duration,
    /// Default validity window for sessions created without an explicit `validTo`.
    pub session_validity: chrono::Duration,
    /// Default length of generated session tokens.
    pub session_token_length: usize,
    /// Fallback redirect URL used when a denied resource has none configured.
    pub default_redirect_url: String,
    /// When set, `/auth` grants every request regardless of the decision engine's verdict.
    pub grant_all: bool,
    /// `tracing-subscriber` env-filter directive.
    pub log_level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// - `PORT` / `AUTHPROXY_BIND_ADDR` — listen address (default `127.0.0.1:3000`, `PORT` binds `0.0.0.0`)
    /// - `AUTHPROXY_EXIT_TIMEOUT` — graceful shutdown grace window in seconds (default `10`)
    /// - `AUTHPROXY_CONFIG` — seed config file path (optional)
    /// - `AUTHPROXY_DB_LOCATION` — live database path (default `data.db`)
    /// - `AUTHPROXY_DB_TIMEOUT` — live database open timeout in seconds (default `1`)
    /// - `AUTHPROXY_GC_LOCATION` — archive database path (default `archived.db`)
    /// - `AUTHPROXY_GC_FREQ` — archive sweep interval in seconds (default `3600`)
    /// - `AUTHPROXY_SESSION_VALIDITY` — default session validity in seconds (default `86400`)
    /// - `AUTHPROXY_SESSION_TOKEN_LENGTH` — generated token length (default `64`)
    /// - `AUTHPROXY_REDIRECT_URL` — default redirect URL (default `http://www.google.com`)
    /// - `AUTHPROXY_GRANT_ALL` — disable enforcement when `true`/`1` (default `false`)
    /// - `AUTHPROXY_LOG_LEVEL` — log filter (default `info`)
    #[must_use]
    pub fn from_env() -> Self {
        let bind_addr = if let Ok(addr) = std::env::var("AUTHPROXY_BIND_ADDR") {
            addr.parse().unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 3000)))
        } else if let Ok(port_str) = std::env::var("PORT") {
            let port: u16 = port_str.parse().unwrap_or(3000);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], 3000))
        };

        Self {
            bind_addr,
            exit_timeout: secs_from_env("AUTHPROXY_EXIT_TIMEOUT", 10),
            seed_config_path: std::env::var("AUTHPROXY_CONFIG").ok().map(PathBuf::from),
            db_path: std::env::var("AUTHPROXY_DB_LOCATION").unwrap_or_else(|_| "data.db".to_owned()).into(),
            db_open_timeout: secs_from_env("AUTHPROXY_DB_TIMEOUT", 1),
            archive_path: std::env::var("AUTHPROXY_GC_LOCATION")
                .unwrap_or_else(|_| "archived.db".to_owned())
                .into(),
            archive_sweep_interval: secs_from_env("AUTHPROXY_GC_FREQ", 3600),
            session_validity: chrono::Duration::seconds(secs_from_env("AUTHPROXY_SESSION_VALIDITY", 86_400).as_secs() as i64),
            session_token_length: std::env::var("AUTHPROXY_SESSION_TOKEN_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(64),
            default_redirect_url: std::env::var("AUTHPROXY_REDIRECT_URL")
                .unwrap_or_else(|_| "http://www.google.com".to_owned()),
            grant_all: std::env::var("AUTHPROXY_GRANT_ALL")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            log_level: std::env::var("AUTHPROXY_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned()),
        }
    }
}

fn secs_from_env(name: &str, default_secs: u64) -> Duration {
    let secs = std::env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default_secs);
    Duration::from_secs(secs)
}
