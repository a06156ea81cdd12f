use std::sync::Arc;

use beacon_core::{AppError, AppResult, UserId};
use beacon_database::ChatStore;

use crate::jwt::JwtDecoder;

/// The authenticated caller, as every downstream layer sees it.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
}

/// Resolves a raw token into an [`Identity`].
///
/// A token that decodes but points at a deleted account is treated the
/// same as an invalid token. The username is taken from the store, not
/// from the claims, so it is always current.
#[derive(Debug, Clone)]
pub struct IdentityVerifier {
    decoder: Arc<JwtDecoder>,
    store: Arc<dyn ChatStore>,
}

impl IdentityVerifier {
    pub fn new(decoder: Arc<JwtDecoder>, store: Arc<dyn ChatStore>) -> Self {
        Self { decoder, store }
    }

    pub async fn verify(&self, token: &str) -> AppResult<Identity> {
        let claims = self.decoder.decode(token)?;
        let user = self
            .store
            .find_user_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

        Ok(Identity {
            user_id: user.id,
            username: user.username,
        })
    }
}
