//! User business logic service.
//!
//! Handles registration, password hashing and credential checks on top of
//! the user repository.

use crate::api::common::PaginationFilter;
use crate::database::models::{CreateNewUser, CreateUser, User};
use crate::errors::{ServiceError, ServiceResult, is_unique_violation};
use crate::repositories::user_repository::UserRepository;
use bcrypt::{hash, verify};
use sqlx::SqlitePool;
use tracing::info;
use validator::Validate;

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
    /// bcrypt work factor used for new hashes
    password_cost: u32,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    /// * `password_cost` - bcrypt cost for hashing new passwords
    pub fn new(pool: &'a SqlitePool, password_cost: u32) -> Self {
        Self {
            pool,
            password_cost,
        }
    }

    /// Registers a new user.
    ///
    /// # Arguments
    /// * `create_user` - Registration payload with the plaintext password
    ///
    /// # Returns
    /// The newly created User with all fields populated
    ///
    /// # Errors
    /// Returns `ServiceError` for:
    /// - Validation failures
    /// - An email or username that is already registered
    pub async fn register(&self, create_user: CreateNewUser) -> ServiceResult<User> {
        create_user.validate()?;

        let repo = UserRepository::new(self.pool);

        if repo.get_user_by_email(&create_user.email).await?.is_some() {
            return Err(ServiceError::already_exists("Email already registered"));
        }

        if repo.get_user_by_username(&create_user.username).await?.is_some() {
            return Err(ServiceError::already_exists("Username already taken"));
        }

        let password_hash = self.hash_password(&create_user.password)?;

        let data = CreateUser {
            username: create_user.username,
            email: create_user.email,
            password_hash,
        };

        // A concurrent registration can still win the race between the checks
        // above and this insert.
        let user = match repo.create_user(data).await {
            Ok(user) => user,
            Err(e) if is_unique_violation(&e) => {
                return Err(ServiceError::already_exists("Email or username already registered"));
            }
            Err(e) => return Err(e.into()),
        };

        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Checks a username/password pair.
    ///
    /// # Errors
    /// Returns `ServiceError::Unauthorized` when the user is unknown or the
    /// password does not match.
    pub async fn authenticate_user(&self, username: &str, password: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);

        let user = repo
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::unauthorized("Incorrect username or password"))?;

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(ServiceError::unauthorized("Incorrect username or password"));
        }

        Ok(user)
    }

    /// Looks up a user by username.
    pub async fn get_user_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        let repo = UserRepository::new(self.pool);
        Ok(repo.get_user_by_username(username).await?)
    }

    /// Lists users with skip/limit pagination.
    pub async fn list_users(&self, pagination: &PaginationFilter) -> ServiceResult<Vec<User>> {
        let repo = UserRepository::new(self.pool);
        Ok(repo.list_users(pagination).await?)
    }

    pub async fn count_users(&self) -> ServiceResult<u64> {
        let repo = UserRepository::new(self.pool);
        Ok(repo.count_users().await?)
    }

    /// Function to hash a password before storing in database
    fn hash_password(&self, password: &str) -> ServiceResult<String> {
        hash(password, self.password_cost)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    /// Function to verify a password against the stored hash
    ///
    /// # Returns
    /// `true` if password matches hash, `false` otherwise
    fn verify_password(password: &str, hash: &str) -> ServiceResult<bool> {
        verify(password, hash).map_err(|e| {
            ServiceError::internal_error(format!("Password verification failed: {}", e))
        })
    }
}
