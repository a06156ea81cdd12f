use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use beacon_core::{AppError, AppResult, ErrorKind};

/// Argon2id password hashing with per-password salts.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                AppError::new(ErrorKind::Internal, format!("failed to hash password: {e}"))
            })?;
        Ok(hash.to_string())
    }

    /// Returns `Ok(false)` for a wrong password; other failures mean the
    /// stored hash itself is unusable.
    pub fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            AppError::new(
                ErrorKind::Internal,
                format!("stored password hash is invalid: {e}"),
            )
        })?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(AppError::new(
                ErrorKind::Internal,
                format!("password verification failed: {e}"),
            )),
        }
    }
}
