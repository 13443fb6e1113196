//! Handler functions for sending templated email and reading the send-log.

use crate::api::common::{ApiError, ApiJson, ApiQuery, PaginationFilter};
use crate::auth::models::CurrentUser;
use crate::database::models::{EmailLogResponse, TestEmailRequest};
use crate::errors::ServiceError;
use crate::repositories::email_log_repository::EmailLogRepository;
use crate::services::email_sender::EmailSender;
use crate::services::email_service::{EmailSendResponse, EmailService};
use crate::services::email_template_service::EmailTemplateService;
use axum::{
    extract::{Extension, Json},
    response::IntoResponse,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use validator::Validate;

/// Sends a stored template to one recipient.
///
/// No authentication is required. Delivery failures still answer 200 with
/// `status: "error"`; only an unknown template (404) or a malformed one (500)
/// are HTTP errors.
#[axum::debug_handler]
pub async fn test_send_email(
    Extension(pool): Extension<SqlitePool>,
    Extension(sender): Extension<Arc<dyn EmailSender>>,
    ApiJson(request): ApiJson<TestEmailRequest>,
) -> Result<Json<EmailSendResponse>, ApiError> {
    request.validate().map_err(ServiceError::from)?;

    let template = EmailTemplateService::new(&pool)
        .get_template_required(request.template_id)
        .await?;

    let variables = request.variables.unwrap_or_default();
    let log_repo = EmailLogRepository::new(&pool);

    let result = EmailService::new(sender)
        .send_template_email(&request.to_email, &template, &variables, Some(&log_repo))
        .await?;

    Ok(Json(result))
}

/// Lists send-log entries newest first; the total is sent in `X-Total-Count`.
#[axum::debug_handler]
pub async fn get_email_logs(
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Extension(pool): Extension<SqlitePool>,
    ApiQuery(pagination): ApiQuery<PaginationFilter>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!("Listing email logs for {}", caller.username);

    let repo = EmailLogRepository::new(&pool);
    let logs = repo
        .list_logs(&pagination)
        .await
        .map_err(ServiceError::from)?;
    let total = repo.count_logs().await.map_err(ServiceError::from)?;

    let logs: Vec<EmailLogResponse> = logs.into_iter().map(EmailLogResponse::from).collect();
    Ok(([("x-total-count", total.to_string())], Json(logs)))
}
