//! Router assembly: common and todo routes behind the shared HTTP layers.

mod common;
mod todo;

pub use common::common_routes;
pub use todo::todo_routes;

use crate::state::AppState;
use axum::http::{header, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Any origin, no credentials.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Full application router over the given state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(todo_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                // Limit sits outside CORS: `Cors` needs a `Default` inner response body.
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                .layer(cors_layer()),
        )
}
