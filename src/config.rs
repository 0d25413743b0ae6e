use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Audiometry";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DATABASE_FILE: &str = "audiometry.db";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "audiometry_lib=info,audiometry=info,tower_http=warn"
}

/// Get the application data directory.
/// ~/Audiometry/ when a home directory is known, the working directory otherwise.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Default location of the results database.
pub fn default_database_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}

/// Runtime settings for the HTTP server, read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bind address {value}: {reason}")]
    InvalidBindAddr { value: String, reason: String },
}

impl ServerConfig {
    /// Read `AUDIOMETRY_BIND_ADDR`, `AUDIOMETRY_DB_PATH` and
    /// `AUDIOMETRY_CORS_ORIGINS`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind = lookup("AUDIOMETRY_BIND_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddr {
                value: bind.clone(),
                reason: e.to_string(),
            })?;

        let database_path = lookup("AUDIOMETRY_DB_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let cors_allowed_origins = lookup("AUDIOMETRY_CORS_ORIGINS")
            .map(|raw| split_list(&raw))
            .unwrap_or_else(|| vec![DEFAULT_CORS_ORIGIN.to_string()]);

        Ok(Self {
            bind_addr,
            database_path,
            cors_allowed_origins,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
