//! Success response helpers. Records are returned bare, without an envelope.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct Deleted<T> {
    pub message: &'static str,
    pub todo: T,
}

pub fn success_created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn success_ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn success_deleted<T: Serialize>(todo: T) -> (StatusCode, Json<Deleted<T>>) {
    (
        StatusCode::OK,
        Json(Deleted {
            message: "todo deleted",
            todo,
        }),
    )
}
