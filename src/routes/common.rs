//! Common routes: service info and health, both reporting the database connection state.

use crate::state::AppState;
use crate::store::ConnectionState;
use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Upper bound on the database check so a dead database cannot stall health checks.
const DB_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Serialize)]
struct InfoBody {
    message: &'static str,
    status: &'static str,
    database: ConnectionState,
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    timestamp: DateTime<Utc>,
    database: ConnectionState,
}

async fn database_state(state: &AppState) -> ConnectionState {
    tokio::time::timeout(DB_CHECK_TIMEOUT, state.store.connection_state())
        .await
        .unwrap_or(ConnectionState::Disconnected)
}

async fn info(State(state): State<AppState>) -> Json<InfoBody> {
    Json(InfoBody {
        message: "Todo Backend API",
        status: "running",
        database: database_state(&state).await,
    })
}

/// Always 200 while the process is serving, whatever the database state.
async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        timestamp: Utc::now(),
        database: database_state(&state).await,
    })
}

/// GET / and GET /health.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(info))
        .route("/health", get(health))
        .with_state(state)
}
