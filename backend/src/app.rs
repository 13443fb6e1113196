//! Assembles the HTTP application.
//!
//! Every route group is merged into one router and the shared state (database
//! pool, configuration, email sender) is attached as extensions.

use crate::api::email::routes::email_router;
use crate::api::email_template::routes::email_template_router;
use crate::api::user::routes::user_router;
use crate::auth::routes::auth_router;
use crate::config::Config;
use crate::services::email_sender::EmailSender;
use axum::{Extension, Router, response::Json, routing::get};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use std::sync::Arc;

pub fn router(pool: SqlitePool, config: Arc<Config>, email_sender: Arc<dyn EmailSender>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .merge(auth_router())
        .merge(user_router())
        .merge(email_template_router())
        .merge(email_router())
        .layer(Extension(pool))
        .layer(Extension(config))
        .layer(Extension(email_sender))
}

async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
