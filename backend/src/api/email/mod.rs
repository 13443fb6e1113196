//! Module for email sending and send-log endpoints.

pub mod handlers;
pub mod routes;
