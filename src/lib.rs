pub mod api;
pub mod audiometry;
pub mod config;
pub mod db;
pub mod models;
pub mod scoring;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("Cannot create data directory {path}: {source}")]
    DataDir {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot open results database: {0}")]
    Database(#[from] db::DatabaseError),
    #[error(transparent)]
    Server(#[from] api::ServerError),
    #[error("Cannot listen for shutdown signal: {0}")]
    Signal(std::io::Error),
}

/// Start the service and block until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let settings = config::ServerConfig::from_env()?;

    if let Some(parent) = settings.database_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| StartupError::DataDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let store = db::SqliteHearingTestStore::open(&settings.database_path)?;
    tracing::info!(path = %settings.database_path.display(), "Results database ready");

    let server = api::start_api_server(
        settings.bind_addr,
        Arc::new(store),
        &settings.cors_allowed_origins,
    )
    .await?;

    tokio::signal::ctrl_c().await.map_err(StartupError::Signal)?;
    tracing::info!("Shutdown requested");
    server.stop().await?;
    Ok(())
}
