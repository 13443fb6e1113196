//! Main entry point for the user management backend.
//!
//! Loads configuration, prepares the database and email sender, and serves
//! the HTTP API.

mod api;
mod app;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

#[cfg(test)]
mod test_utils;

use config::Config;
use database::Database;
use services::email_sender::build_email_sender;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();

    let config = Arc::new(Config::from_env()?);
    let db = Database::new(&config).await?;
    db.migrate().await?;

    let email_sender = build_email_sender(&config.email)?;
    let app = app::router(db.pool().clone(), config.clone(), email_sender);

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("Starting user management server on port {}", config.server_port);
    axum::serve(listener, app).await?;

    db.close().await;
    Ok(())
}
