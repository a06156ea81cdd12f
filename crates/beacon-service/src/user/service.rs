use std::sync::Arc;

use beacon_auth::{JwtEncoder, PasswordHasher};
use beacon_core::{AppError, AppResult, UserId};
use beacon_database::ChatStore;
use beacon_entity::{NewUser, User};
use chrono::{DateTime, Utc};
use tracing::info;

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Totals reported by the stats endpoint. The live online count comes
/// from the presence registry, not from here.
#[derive(Debug, Clone, Copy)]
pub struct UserStats {
    pub total_users: u64,
    pub total_messages: u64,
}

/// Account lifecycle: registration, login, profile lookup.
#[derive(Debug, Clone)]
pub struct UserService {
    store: Arc<dyn ChatStore>,
    hasher: Arc<PasswordHasher>,
    encoder: Arc<JwtEncoder>,
    password_min_length: usize,
}

impl UserService {
    pub fn new(
        store: Arc<dyn ChatStore>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        password_min_length: usize,
    ) -> Self {
        Self {
            store,
            hasher,
            encoder,
            password_min_length,
        }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<AuthSession> {
        let username = username.trim();
        let email = email.trim();

        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::validation("All fields are required"));
        }
        if username.len() < 3 {
            return Err(AppError::validation(
                "Username must be at least 3 characters",
            ));
        }
        if !email.contains('@') || !email.contains('.') {
            return Err(AppError::validation("Invalid email format"));
        }
        if password.len() < self.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.password_min_length
            )));
        }

        if self.store.find_user_by_email(email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered"));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .store
            .create_user(&NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "user registered");

        let (token, expires_at) = self.encoder.issue(user.id, &user.username)?;
        Ok(AuthSession {
            user,
            token,
            expires_at,
        })
    }

    /// Unknown email and wrong password produce the same error, so a
    /// caller cannot probe which addresses are registered.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation("All fields are required"));
        }

        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        info!(user_id = %user.id, "user logged in");

        let (token, expires_at) = self.encoder.issue(user.id, &user.username)?;
        Ok(AuthSession {
            user,
            token,
            expires_at,
        })
    }

    pub async fn profile(&self, user_id: UserId) -> AppResult<User> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.store.list_users().await
    }

    pub async fn stats(&self) -> AppResult<UserStats> {
        Ok(UserStats {
            total_users: self.store.count_users().await?,
            total_messages: self.store.count_messages().await?,
        })
    }
}
