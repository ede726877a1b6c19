//! Quire API server binary.
//!
//! Serves the JSON API over PostgreSQL, or over the in-memory store with
//! `--memory` (or when no database URL is configured).

use clap::Parser;
use quire_api::AppState;
use quire_api::config::{ApiConfig, DEFAULT_BIND_ADDR};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "quire_api_server", about = "Quire API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = DEFAULT_BIND_ADDR)]
    bind: String,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Use the in-memory store even if a database URL is set.
    #[arg(long, default_value_t = false)]
    memory: bool,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Secret that signs access tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,
}

impl Args {
    /// Config variables as resolved by clap (flag, then environment).
    fn lookup(&self, key: &str) -> Option<String> {
        match key {
            "BIND_ADDR" => Some(self.bind.clone()),
            "DATABASE_URL" if self.memory => None,
            "DATABASE_URL" => self.database_url.clone(),
            "JWT_SECRET" => self.jwt_secret.clone(),
            _ => std::env::var(key).ok(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,quire_api=debug,quire_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    let config = ApiConfig::from_lookup(|key| args.lookup(key))?;

    info!(bind_addr = %config.bind_addr, "starting quire_api_server");

    let state = match config.database_url.clone() {
        Some(url) => {
            info!(max_connections = args.max_connections, "configuring connection pool");
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .acquire_timeout(std::time::Duration::from_secs(30))
                .connect(&url)
                .await?;

            info!("running database migrations");
            quire_api::migrate(&pool).await?;
            AppState::postgres(config.clone(), pool)?
        }
        None => {
            warn!("no database configured, using the in-memory store");
            AppState::in_memory(config.clone())?
        }
    };

    let app = quire_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
