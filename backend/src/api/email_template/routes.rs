//! Defines the HTTP routes for email template management.

use super::handlers::{create_template, get_template, list_templates, update_template};
use axum::{Router, routing::get};

pub fn email_template_router() -> Router {
    Router::new()
        .route("/email-templates", get(list_templates).post(create_template))
        .route("/email-templates/{id}", get(get_template).put(update_template))
}
