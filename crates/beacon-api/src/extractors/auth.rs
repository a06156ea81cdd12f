use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use axum_extra::extract::cookie::CookieJar;
use beacon_core::AppError;
use beacon_service::RequestContext;

use crate::error::ApiError;
use crate::handlers::auth::TOKEN_COOKIE;
use crate::state::AppState;

/// Extractor for authenticated routes. Resolves the token (cookie first,
/// then bearer header) into a [`RequestContext`].
#[derive(Debug)]
pub struct AuthUser(pub RequestContext);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers)
            .ok_or_else(|| AppError::unauthorized("Missing authentication token"))?;

        let identity = state.verifier.verify(&token).await?;

        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string());
        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(Self(RequestContext::new(identity, ip_address, user_agent)))
    }
}

/// Pulls the session token out of the cookie jar, falling back to a
/// bearer header. Shared with the websocket upgrade, which also accepts
/// a query parameter.
pub(crate) fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(TOKEN_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}
