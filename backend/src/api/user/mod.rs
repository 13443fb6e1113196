//! Module for user registration and listing endpoints.

pub mod handlers;
pub mod routes;
