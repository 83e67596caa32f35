//! Server binary: loads config, builds the Postgres store, serves the todo API.

use std::io::ErrorKind;
use std::sync::Arc;
use tokio::net::TcpListener;
use todo_service::{app, AppState, Config, PgTodoStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Before the subscriber so RUST_LOG from .env takes effect.
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("todo_service=info,tower_http=info")),
        )
        .init();
    if let Err(e) = dotenv {
        tracing::debug!(error = %e, ".env not loaded, using process environment only");
    }

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        database = %config.database.redacted_url(),
        "configuration loaded"
    );
    if !config.database.url_from_env {
        tracing::warn!("DATABASE_URL not set, using local development default");
    }

    let store = Arc::new(PgTodoStore::connect_lazy(&config.database)?);

    let listener = match TcpListener::bind(config.bind_addr()).await {
        Ok(listener) => listener,
        Err(e) if e.kind() == ErrorKind::AddrInUse => {
            tracing::error!(port = config.port, "port already in use");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!(error = %e, addr = %config.bind_addr(), "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!("listening on {}", listener.local_addr()?);
    tracing::info!("health check: http://localhost:{}/health", config.port);

    store.spawn_init();
    let state = AppState::from_shared(store);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
