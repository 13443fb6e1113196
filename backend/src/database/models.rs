//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database, plus the request/response shapes built from them. Note
//! that the stored `User` carries the password hash and is never serialized
//! directly; `UserResponse` is what leaves the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::collections::HashMap;
use validator::Validate;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Registration payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNewUser {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Username must be between 1-100 characters"
    ))]
    pub username: String,

    #[validate(
        email(message = "Must be a valid email"),
        length(max = 200, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Row data for a new user, password already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmailTemplate {
    pub id: i64,
    pub name: String,
    pub subject: String,
    pub body_html: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or replacing an email template.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmailTemplatePayload {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Template name must be between 1-100 characters"
    ))]
    pub name: String,

    #[validate(length(max = 250, message = "Subject too long"))]
    pub subject: String,

    pub body_html: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmailLog {
    pub id: i64,
    pub to_email: String,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// One delivery attempt to append to the send-log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmailLog {
    pub to_email: String,
    pub subject: String,
    pub body: String,
    pub status: String,
}

/// Log entry as listed by the API (body omitted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailLogResponse {
    pub id: i64,
    pub to_email: String,
    pub subject: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<EmailLog> for EmailLogResponse {
    fn from(log: EmailLog) -> Self {
        Self {
            id: log.id,
            to_email: log.to_email,
            subject: log.subject,
            status: log.status,
            created_at: log.created_at,
        }
    }
}

/// Test-send request for a stored template.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TestEmailRequest {
    pub template_id: i64,

    #[validate(email(message = "Must be a valid email"))]
    pub to_email: String,

    #[serde(default)]
    pub variables: Option<HashMap<String, Value>>,
}
