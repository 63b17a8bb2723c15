//! OrgGuard Server: multi-tenant identity and access control.
//!
//! Main entry point that wires all crates together and starts the server.

use tracing_subscriber::{EnvFilter, fmt};

use orgguard_api::{AppState, serve};
use orgguard_core::config::{AppConfig, LogFormat, LoggingConfig};
use orgguard_core::result::AppResult;
use orgguard_database::Stores;

#[tokio::main]
async fn main() {
    let env = std::env::var("ORGGUARD_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = run(config, &env).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig, env: &str) -> AppResult<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), env, "Starting OrgGuard");

    let stores = Stores::open(&config.database).await?;
    let server_config = config.server.clone();
    let state = AppState::new(config, stores)?;

    serve(state, &server_config).await
}
