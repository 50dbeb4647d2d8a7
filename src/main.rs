use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use signup_api::config::AppConfig;
use signup_api::database::{AccountStore, DatabaseManager, InMemoryAccountStore, PgAccountStore};
use signup_api::AppState;

#[derive(Parser)]
#[command(name = "signup-api")]
#[command(about = "User registration service issuing JWT session tokens")]
#[command(version)]
struct Args {
    #[arg(long, help = "Port to listen on (overrides SIGNUP_API_PORT / PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Keep accounts in process memory instead of Postgres")]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("signup_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(port) = args.port {
        config.api.port = port;
    }
    config
        .require_signing_secret()
        .context("refusing to start without a token signing secret")?;
    tracing::info!("Starting Signup API in {:?} mode", config.environment);

    let mut pool = None;
    let store: Arc<dyn AccountStore> = if args.in_memory {
        tracing::warn!("Using in-memory account store; accounts are lost on exit");
        Arc::new(InMemoryAccountStore::new())
    } else {
        let pg_pool = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        DatabaseManager::ensure_schema(&pg_pool)
            .await
            .context("failed to prepare accounts schema")?;
        pool = Some(pg_pool.clone());
        Arc::new(PgAccountStore::new(pg_pool))
    };

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let app = signup_api::app(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Signup API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pool) = pool {
        DatabaseManager::close(pool).await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
