//! SSO server binary.
//!
//! Loads configuration, connects to Postgres, runs migrations and serves the
//! auth API until SIGINT/SIGTERM, letting in-flight requests finish.

mod logging;
mod shutdown;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use sso_api::config::ApiConfig;
use sso_core::auth::queries::PgStorage;
use sso_core::auth::service::Auth;
use tracing::{info, info_span};

/// CLI arguments for the SSO server.
#[derive(Parser, Debug)]
#[command(name = "sso_server", about = "Single-sign-on identity service")]
struct Args {
    /// YAML config file. Without it, configuration comes from the environment.
    #[arg(long, env = "CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Port to listen on; overrides the configured value.
    #[arg(long)]
    port: Option<u16>,

    /// PostgreSQL connection URL; overrides the configured value.
    #[arg(long)]
    database_url: Option<String>,
}

impl Args {
    fn load_config(&self) -> Result<ApiConfig, sso_api::config::ConfigError> {
        let config = match &self.config {
            Some(path) => ApiConfig::from_yaml_file(path)?,
            None => ApiConfig::from_env()?,
        };
        Ok(self.apply_overrides(config))
    }

    /// Command-line flags win over the file or the environment.
    fn apply_overrides(&self, mut config: ApiConfig) -> ApiConfig {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(url) = &self.database_url {
            config.database_url = url.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = args.load_config()?;

    logging::init(config.env)?;

    info!(
        env = ?config.env,
        port = config.port,
        token_ttl_secs = config.token_ttl.as_secs(),
        max_connections = config.max_connections,
        "starting sso_server"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.database_url)
        .await?;

    info!("running database migrations");
    sso_core::migrate::migrate(&pool).await?;

    let storage = Arc::new(PgStorage::new(pool.clone()));
    let auth = Auth::new(
        info_span!("auth"),
        storage.clone(),
        storage.clone(),
        storage,
        config.token_ttl,
    );

    let state = sso_api::AppState {
        auth: Arc::new(auth),
        config: config.clone(),
    };
    let app = sso_api::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "auth API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    pool.close().await;
    info!("sso_server stopped");

    Ok(())
}
