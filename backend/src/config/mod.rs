//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, token signing secret and the SMTP settings
//! used by the email sender. The configuration is read once at startup and
//! handed to the components that need it.

use anyhow::{Context, Result};
use std::env;
use tracing::warn;

/// Placeholder signing secret used when `SECRET_KEY` is not set.
pub const INSECURE_DEFAULT_SECRET: &str = "secret";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
    pub bcrypt_cost: u32,
    pub server_port: u16,
    pub email: EmailConfig,
}

/// SMTP and delivery-mode settings.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
    /// When set, emails are previewed on the console instead of transmitted.
    pub development_mode: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| env::var(key).ok())?;

        if config.jwt_secret == INSECURE_DEFAULT_SECRET {
            warn!("SECRET_KEY not set, falling back to the insecure default signing secret");
        }

        Ok(config)
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = var_or("DATABASE_URL", "sqlite://user_management.db?mode=rwc");

        let max_connections = var_or("DB_MAX_CONNECTIONS", "5")
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = var_or("DB_ACQUIRE_TIMEOUT_SECONDS", "3")
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_secret = var_or("SECRET_KEY", INSECURE_DEFAULT_SECRET);

        let access_token_expire_minutes = var_or("ACCESS_TOKEN_EXPIRE_MINUTES", "30")
            .parse::<i64>()
            .context("ACCESS_TOKEN_EXPIRE_MINUTES must be a valid number")?;

        let bcrypt_cost = var_or("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string())
            .parse::<u32>()
            .context("BCRYPT_COST must be a valid number")?;

        let server_port = var_or("SERVER_PORT", "8000")
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        let smtp_username = var_or("SMTP_USERNAME", "");
        let email = EmailConfig {
            smtp_host: var_or("SMTP_HOST", "smtp.gmail.com"),
            smtp_port: var_or("SMTP_PORT", "587")
                .parse::<u16>()
                .context("SMTP_PORT must be a valid number")?,
            smtp_password: var_or("SMTP_PASSWORD", ""),
            from_email: var_or("SMTP_FROM_EMAIL", &smtp_username),
            from_name: var_or("SMTP_FROM_NAME", "User Management System"),
            development_mode: var_or("EMAIL_DEVELOPMENT_MODE", "true").eq_ignore_ascii_case("true"),
            smtp_username,
        };

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            access_token_expire_minutes,
            bcrypt_cost,
            server_port,
            email,
        })
    }
}
