//! Defines the HTTP routes for user registration and management.

use super::handlers::{create_user, list_users, me};
use crate::auth::middleware::jwt_auth;
use axum::{
    Router,
    handler::Handler,
    middleware,
    routing::{get, post},
};

pub fn user_router() -> Router {
    Router::new()
        .route(
            "/users",
            post(create_user).get(list_users.layer(middleware::from_fn(jwt_auth))),
        )
        .route("/users/me", get(me).layer(middleware::from_fn(jwt_auth)))
}
