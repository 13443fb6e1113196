//! Defines the HTTP routes specifically for authentication.

use crate::auth::handlers::*;
use axum::{Router, routing::post};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new().route("/token", post(login))
}
