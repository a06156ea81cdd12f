use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use beacon_entity::User;
use chrono::{DateTime, Utc};

use crate::dto::{ApiResponse, AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Cookie that carries the session token for browser clients. Non-browser
/// clients send the same token as a bearer header instead.
pub const TOKEN_COOKIE: &str = "token";

fn session_cookie(token: String, ttl_hours: i64) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(ttl_hours))
        .build()
}

fn auth_response(
    state: &AppState,
    user: User,
    token: String,
    expires_at: DateTime<Utc>,
) -> AuthResponse {
    let online = state.realtime.registry().is_online(user.id);
    AuthResponse {
        token,
        expires_at,
        user: UserResponse::from_user(&user, online),
    }
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<ApiResponse<AuthResponse>>), ApiError> {
    let session = state
        .user_service
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    let jar = jar.add(session_cookie(
        session.token.clone(),
        state.config.auth.jwt_ttl_hours,
    ));
    let body = auth_response(&state, session.user, session.token, session.expires_at);
    Ok((StatusCode::CREATED, jar, Json(ApiResponse::ok(body))))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<AuthResponse>>), ApiError> {
    let session = state
        .user_service
        .login(&payload.email, &payload.password)
        .await?;

    let jar = jar.add(session_cookie(
        session.token.clone(),
        state.config.auth.jwt_ttl_hours,
    ));
    let body = auth_response(&state, session.user, session.token, session.expires_at);
    Ok((jar, Json(ApiResponse::ok(body))))
}

pub async fn logout(
    _user: AuthUser,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<MessageResponse>>) {
    let jar = jar.remove(Cookie::build(TOKEN_COOKIE).path("/"));
    let body = MessageResponse {
        message: "Logged out".to_string(),
    };
    (jar, Json(ApiResponse::ok(body)))
}

pub async fn me(
    State(state): State<AppState>,
    AuthUser(ctx): AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = state.user_service.profile(ctx.user_id).await?;
    let online = state.realtime.registry().is_online(user.id);
    Ok(Json(ApiResponse::ok(UserResponse::from_user(&user, online))))
}
