//! Service configuration from the process environment.

pub mod types;
pub mod loader;
pub mod validator;

pub use types::*;
pub use loader::*;
pub use validator::*;
