//! Todo service: CRUD REST backend over a pluggable todo store.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{redact_url, Config, DatabaseConfig};
pub use error::{AppError, ConfigError};
pub use model::{NewTodo, Todo, TodoPatch};
pub use routes::{app, common_routes, todo_routes};
pub use state::AppState;
pub use store::{ConnectionState, MemoryTodoStore, PgTodoStore, StoreError, TodoStore};
