pub mod middleware;
pub mod types;

#[cfg(test)]
mod tests;

pub use middleware::{get_authenticated_user, validate_request_token, AuthMiddleware};
pub use types::*;
