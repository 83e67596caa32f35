//! Todo CRUD handlers: create, list, read, update, delete.

use crate::error::AppError;
use crate::model::{CreateTodoRequest, TodoPatch};
use crate::response::{success_created, success_deleted, success_ok};
use crate::service::RequestValidator;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body?;
    let new_todo = RequestValidator::create(body)?;
    let todo = state
        .store
        .insert(new_todo)
        .await
        .map_err(AppError::during("create todo"))?;
    tracing::info!(id = %todo.id, "todo created");
    Ok(success_created(todo))
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let todos = state
        .store
        .list_all()
        .await
        .map_err(AppError::during("list todos"))?;
    Ok(success_ok(todos))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let todo = state
        .store
        .find_by_id(&id)
        .await
        .map_err(AppError::during("get todo"))?;
    Ok(success_ok(todo))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TodoPatch>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(patch) = body?;
    let patch = RequestValidator::update(patch)?;
    if patch.is_empty() {
        tracing::debug!(id = %id, "update with no fields; only updatedAt changes");
    }
    let todo = state
        .store
        .update_by_id(&id, patch)
        .await
        .map_err(AppError::during("update todo"))?;
    tracing::info!(id = %todo.id, completed = todo.completed, "todo updated");
    Ok(success_ok(todo))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let todo = state
        .store
        .delete_by_id(&id)
        .await
        .map_err(AppError::during("delete todo"))?;
    tracing::info!(id = %todo.id, "todo deleted");
    Ok(success_deleted(todo))
}
