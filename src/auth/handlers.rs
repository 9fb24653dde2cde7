//! Auth endpoints: register, login, logout, me.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_cookies::Cookies;
use utoipa::ToSchema;
use validator::Validate;

use super::cookie;
use super::identity::{Identity, Role};
use super::password;
use crate::gateway::error::{ApiError, ApiResult};
use crate::gateway::state::AppState;
use crate::store::NewUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "alice")]
    #[validate(custom(function = "validate_not_blank", message = "Username must not be blank"))]
    pub username: String,
    #[schema(example = "password123")]
    #[validate(custom(function = "validate_not_blank", message = "Password must not be blank"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterParams {
    /// Requested role; anything other than (case-insensitive) "admin"
    /// registers a regular user.
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "password123")]
    pub password: String,
}

/// User as serialized to clients. Never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserData {
    #[schema(example = "alice")]
    pub username: String,
    pub roles: Vec<Role>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserData,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Register a new user
///
/// POST /auth/register?role={user|admin}
#[utoipa::path(
    post,
    path = "/auth/register",
    params(
        ("role" = Option<String>, Query, description = "Requested role, defaults to user")
    ),
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Blank username or password"),
        (status = 409, description = "Username already exists")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RegisterParams>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let role = match params.role.as_deref() {
        Some(r) if r.eq_ignore_ascii_case("admin") => Role::Admin,
        _ => Role::User,
    };

    let password_hash = password::hash_password(&req.password)?;

    let user = state
        .user_store
        .insert(NewUser {
            username: req.username,
            password_hash,
            roles: vec![role],
        })
        .await?;

    tracing::info!("Registered user '{}' as {}", user.username, role.label());

    Ok(Json(AuthResponse {
        message: "User registered successfully".to_string(),
        user: UserData {
            username: user.username,
            roles: user.roles,
        },
    }))
}

/// Login and receive a session cookie
///
/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = AuthResponse),
        (status = 401, description = "Invalid username or password")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    // Same 401 for unknown username and wrong password.
    let user = state
        .user_store
        .find(&req.username)
        .await?
        .filter(|u| password::verify_password(&req.password, &u.password_hash))
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    let token = state
        .token_codec
        .issue(&user.username, &user.roles, Utc::now())?;
    cookies.add(cookie::session_cookie(
        token,
        state.token_codec.ttl(),
        &state.auth_config,
    ));

    tracing::info!("User '{}' logged in", user.username);

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: UserData {
            username: user.username,
            roles: user.roles,
        },
    }))
}

/// Logout by clearing the session cookie
///
/// POST /auth/logout
///
/// Tokens are not revocable server-side; an already-issued token stays
/// valid until it expires even after logout.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    ),
    tag = "Auth"
)]
pub async fn logout(State(state): State<Arc<AppState>>, cookies: Cookies) -> Json<MessageResponse> {
    cookies.add(cookie::removal_cookie(&state.auth_config));
    Json(MessageResponse {
        message: "Logged out".to_string(),
    })
}

/// Current identity
///
/// GET /auth/me
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current identity", body = UserData),
        (status = 401, description = "Not authenticated")
    ),
    tag = "Auth"
)]
pub async fn me(identity: Identity) -> Json<UserData> {
    Json(UserData {
        username: identity.username,
        roles: identity.roles,
    })
}
