//! Authentication module for password login, bearer tokens and route protection.
//!
//! This module provides the `/token` endpoint, the token verification service
//! and the middleware that guards authenticated routes.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
