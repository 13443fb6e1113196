//! Database repositories, one per table.

pub mod email_log_repository;
pub mod email_template_repository;
pub mod user_repository;
