//! Todo persistence: the [`TodoStore`] contract and its backends.

mod memory;
mod postgres;

pub use memory::MemoryTodoStore;
pub use postgres::{ensure_todos_table, PgTodoStore};

use crate::model::{NewTodo, Todo, TodoPatch};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicU8, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid id: {0}")]
    InvalidIdentifier(String),
    #[error("todo not found: {0}")]
    NotFound(String),
    #[error("database: {0}")]
    Storage(#[from] sqlx::Error),
}

/// CRUD over todo records. Implementations validate their inputs again at this boundary.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError>;

    /// All records, newest `created_at` first. Equal timestamps: most recently inserted first.
    async fn list_all(&self) -> Result<Vec<Todo>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Todo, StoreError>;

    /// Apply only the supplied fields and refresh `updated_at`.
    async fn update_by_id(&self, id: &str, patch: TodoPatch) -> Result<Todo, StoreError>;

    /// Hard delete. Returns the removed record.
    async fn delete_by_id(&self, id: &str) -> Result<Todo, StoreError>;

    async fn connection_state(&self) -> ConnectionState;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connected,
    Disconnected,
    Error,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Error => "error",
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => ConnectionState::Connected,
            1 => ConnectionState::Disconnected,
            _ => ConnectionState::Error,
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            ConnectionState::Connected => 0,
            ConnectionState::Disconnected => 1,
            ConnectionState::Error => 2,
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last observed database connection state. Logs only on transitions.
pub struct ConnectionMonitor {
    state: AtomicU8,
}

impl Default for ConnectionMonitor {
    fn default() -> Self {
        ConnectionMonitor {
            state: AtomicU8::new(ConnectionState::Disconnected.to_u8()),
        }
    }
}

impl ConnectionMonitor {
    pub fn current(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Relaxed))
    }

    /// Record a new observation; returns true when the state changed.
    pub fn observe(&self, next: ConnectionState, detail: Option<&str>) -> bool {
        let prev = ConnectionState::from_u8(self.state.swap(next.to_u8(), Ordering::Relaxed));
        if prev == next {
            return false;
        }
        let detail = detail.unwrap_or("");
        match next {
            ConnectionState::Connected => tracing::info!("database connected"),
            ConnectionState::Disconnected => {
                tracing::warn!(error = detail, "database disconnected")
            }
            ConnectionState::Error => tracing::error!(error = detail, "database connection error"),
        }
        true
    }

    /// Classify a driver error: transport-level failures mean disconnected, the rest are errors.
    /// Errors raised by the server itself (constraint, syntax) leave the state untouched.
    pub fn observe_error(&self, err: &sqlx::Error) {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                self.observe(ConnectionState::Disconnected, Some(&err.to_string()));
            }
            sqlx::Error::Tls(_) | sqlx::Error::Configuration(_) | sqlx::Error::Protocol(_) => {
                self.observe(ConnectionState::Error, Some(&err.to_string()));
            }
            sqlx::Error::Database(_) | sqlx::Error::RowNotFound => {
                self.observe(ConnectionState::Connected, None);
            }
            _ => {}
        }
    }
}
