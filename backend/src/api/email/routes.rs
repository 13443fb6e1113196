//! Defines the HTTP routes for email sending and the send-log.

use super::handlers::{get_email_logs, test_send_email};
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub fn email_router() -> Router {
    Router::new()
        .route("/email/test-send", post(test_send_email))
        .route(
            "/email/logs",
            get(get_email_logs).layer(middleware::from_fn(jwt_auth)),
        )
}
