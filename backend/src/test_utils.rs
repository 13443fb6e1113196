//! Shared fixtures for unit and HTTP tests.

use crate::config::Config;
use crate::database::Database;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

/// Lowest cost bcrypt accepts; keeps hashing fast in tests.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_config() -> Config {
    Config::from_lookup(|key| {
        let value = match key {
            "DATABASE_URL" => "sqlite::memory:",
            "SECRET_KEY" => "test-secret",
            "BCRYPT_COST" => "4",
            "SMTP_USERNAME" => "mailer@example.com",
            "SMTP_FROM_EMAIL" => "noreply@example.com",
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("test configuration is valid")
}

/// In-memory database with the schema applied.
///
/// A single connection that never expires, since every new in-memory
/// connection would see an empty database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database opens");

    let db = Database { pool };
    db.migrate().await.expect("migrations apply");
    db.pool
}
