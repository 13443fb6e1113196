//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business operations
//! and orchestrate interactions between the repositories, the template
//! renderer and the email delivery channel.

pub mod email_sender;
pub mod email_service;
pub mod email_template_service;
pub mod template_renderer;
pub mod user_service;
