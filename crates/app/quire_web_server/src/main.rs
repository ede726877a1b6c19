//! Quire frontend server binary.

use clap::Parser;
use quire_web::WebState;
use quire_web::config::{DEFAULT_BIND_ADDR, WebConfig};
use tracing::{info, warn};

/// CLI arguments for the frontend server.
#[derive(Parser, Debug)]
#[command(name = "quire_web_server", about = "Quire frontend server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = DEFAULT_BIND_ADDR)]
    bind: String,

    /// Base URL of the Quire API.
    #[arg(long, env = "API_BASE_URL")]
    api_base_url: Option<String>,

    /// Secret that signs the session cookie (at least 64 bytes).
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    session_secret: Option<String>,

    /// Deployment environment; `production` marks cookies `Secure`.
    #[arg(long, env = "QUIRE_ENV", default_value = "development")]
    env: String,
}

impl Args {
    /// Config variables as resolved by clap (flag, then environment).
    fn lookup(&self, key: &str) -> Option<String> {
        match key {
            "BIND_ADDR" => Some(self.bind.clone()),
            "API_BASE_URL" => self.api_base_url.clone(),
            "SESSION_SECRET" => self.session_secret.clone(),
            "QUIRE_ENV" => Some(self.env.clone()),
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
                .unwrap_or_else(|_| "info,quire_web=debug".into()),
        )
        .init();

    let args = Args::parse();

    let config = WebConfig::from_lookup(|key| args.lookup(key))?;

    info!(?config, "starting quire_web_server");

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "frontend listening");

    let app = quire_web::router(WebState::new(config));
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
