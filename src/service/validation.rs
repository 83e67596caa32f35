//! Request validation for todo bodies.

use crate::error::AppError;
use crate::model::{CreateTodoRequest, NewTodo, TodoPatch};
use crate::store::StoreError;

pub struct RequestValidator;

impl RequestValidator {
    /// Title must be present and non-blank; the rest fall back to defaults.
    pub fn create(body: CreateTodoRequest) -> Result<NewTodo, AppError> {
        let title = body
            .title
            .ok_or_else(|| AppError::BadRequest("title is required".into()))?;
        NewTodo::new(&title, body.description.as_deref(), body.completed).map_err(to_bad_request)
    }

    /// Validate only the fields present. An explicitly supplied blank title is rejected.
    pub fn update(patch: TodoPatch) -> Result<TodoPatch, AppError> {
        patch.normalized().map_err(to_bad_request)
    }
}

fn to_bad_request(err: StoreError) -> AppError {
    AppError::from_store("validate request", err)
}
