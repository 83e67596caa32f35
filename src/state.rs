//! Shared application state for all routes.

use crate::store::TodoStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Built once at startup; every request shares the same store (and its pool).
    pub store: Arc<dyn TodoStore>,
}

impl AppState {
    pub fn new<S: TodoStore + 'static>(store: S) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }

    /// Share a store that other tasks also hold, e.g. a background initialiser.
    pub fn from_shared(store: Arc<dyn TodoStore>) -> Self {
        AppState { store }
    }
}
