//! Module for email template CRUD endpoints.

pub mod handlers;
pub mod routes;
