//! PostgreSQL-backed store. The `todos` table is created on first contact with the database.

use super::{ConnectionMonitor, ConnectionState, StoreError, TodoStore};
use crate::config::DatabaseConfig;
use crate::model::{parse_id, NewTodo, Todo, TodoPatch};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use uuid::Uuid;

const RETURNING: &str = "RETURNING id, title, description, completed, created_at, updated_at";

/// Create the `todos` table and its ordering index if missing. Idempotent.
pub async fn ensure_todos_table(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS todos (
            id UUID PRIMARY KEY,
            seq BIGSERIAL NOT NULL,
            title TEXT NOT NULL CHECK (title <> ''),
            description TEXT NOT NULL DEFAULT '',
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CHECK (created_at <= updated_at)
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query("ALTER TABLE todos ADD COLUMN IF NOT EXISTS seq BIGSERIAL NOT NULL")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS todos_created_at_seq_idx ON todos (created_at DESC, seq DESC)",
    )
    .execute(pool)
    .await?;
    Ok(())
}

pub struct PgTodoStore {
    pool: PgPool,
    schema_ready: OnceCell<()>,
    monitor: ConnectionMonitor,
}

impl PgTodoStore {
    /// Build the pool without connecting. Only a malformed URL fails here; an unreachable
    /// server surfaces later as [`StoreError::Storage`] on each call.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = PgConnectOptions::from_str(&config.url)?.options([(
            "statement_timeout",
            config.socket_timeout.as_millis().to_string(),
        )]);
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_lazy_with(options);
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        PgTodoStore {
            pool,
            schema_ready: OnceCell::new(),
            monitor: ConnectionMonitor::default(),
        }
    }

    /// Startup check: bootstrap the table and log which database we reached.
    pub async fn init(&self) -> Result<(), StoreError> {
        self.ensure_schema().await?;
        let (name,): (String,) = sqlx::query_as("SELECT current_database()::text")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| self.track(e))?;
        tracing::info!(database = %name, "todo store ready");
        Ok(())
    }

    /// Run [`init`](Self::init) in the background so the listener is not held up by the
    /// database. Failure is logged, not fatal: store calls keep failing until it is reachable.
    pub fn spawn_init(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = store.init().await {
                tracing::error!(error = %e, "database initialisation failed; serving anyway");
            }
        })
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.schema_ready
            .get_or_try_init(|| ensure_todos_table(&self.pool))
            .await
            .map_err(|e| self.track(e))?;
        Ok(())
    }

    fn track(&self, err: sqlx::Error) -> StoreError {
        self.monitor.observe_error(&err);
        StoreError::Storage(err)
    }

    fn mark_connected<T>(&self, value: T) -> T {
        self.monitor.observe(ConnectionState::Connected, None);
        value
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        todo.ensure_valid()?;
        self.ensure_schema().await?;
        let sql = format!(
            "INSERT INTO todos (id, title, description, completed, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) {}",
            RETURNING
        );
        let row = sqlx::query_as::<_, Todo>(&sql)
            .bind(Uuid::new_v4())
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.completed)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| self.track(e))?;
        Ok(self.mark_connected(row))
    }

    async fn list_all(&self) -> Result<Vec<Todo>, StoreError> {
        self.ensure_schema().await?;
        let rows = sqlx::query_as::<_, Todo>(
            "SELECT id, title, description, completed, created_at, updated_at \
             FROM todos ORDER BY created_at DESC, seq DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| self.track(e))?;
        Ok(self.mark_connected(rows))
    }

    async fn find_by_id(&self, id: &str) -> Result<Todo, StoreError> {
        let uid = parse_id(id)?;
        self.ensure_schema().await?;
        let row = sqlx::query_as::<_, Todo>(
            "SELECT id, title, description, completed, created_at, updated_at \
             FROM todos WHERE id = $1",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| self.track(e))?;
        self.mark_connected(row).ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update_by_id(&self, id: &str, patch: TodoPatch) -> Result<Todo, StoreError> {
        let uid = parse_id(id)?;
        let patch = patch.normalized()?;
        self.ensure_schema().await?;
        let sql = format!(
            "UPDATE todos SET \
             title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             completed = COALESCE($4, completed), \
             updated_at = GREATEST($5, created_at) \
             WHERE id = $1 {}",
            RETURNING
        );
        let row = sqlx::query_as::<_, Todo>(&sql)
            .bind(uid)
            .bind(patch.title)
            .bind(patch.description)
            .bind(patch.completed)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| self.track(e))?;
        self.mark_connected(row).ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn delete_by_id(&self, id: &str) -> Result<Todo, StoreError> {
        let uid = parse_id(id)?;
        self.ensure_schema().await?;
        let sql = format!("DELETE FROM todos WHERE id = $1 {}", RETURNING);
        let row = sqlx::query_as::<_, Todo>(&sql)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| self.track(e))?;
        self.mark_connected(row).ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn connection_state(&self) -> ConnectionState {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => self.mark_connected(ConnectionState::Connected),
            Err(e) => {
                self.monitor.observe_error(&e);
                match self.monitor.current() {
                    ConnectionState::Connected => ConnectionState::Error,
                    state => state,
                }
            }
        }
    }
}
