//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for the user, email template
//! and email sending endpoints, excluding the `/token` route which lives in
//! `auth`.

pub mod common;
pub mod email;
pub mod email_template;
pub mod user;
