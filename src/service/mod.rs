//! Request-level checks run by the handlers before the store is called.

mod validation;
pub use validation::RequestValidator;
