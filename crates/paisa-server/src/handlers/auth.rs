//! Authentication handlers

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{bearer_token, AppError, AppState, CurrentUser, SuccessResponse, SESSION_TTL_DAYS};
use paisa_core::models::User;

/// Request body for registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// Day of month income recurs; defaults to the 1st
    pub allowance_day: Option<u32>,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for login and registration
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/register - Create an account and start a session
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state.db.create_user(
        &body.username,
        &body.password,
        body.allowance_day.unwrap_or(1),
    )?;
    let token = state.db.create_session(user.id, SESSION_TTL_DAYS)?;

    info!(user = %user.username, "New account registered");
    Ok(Json(AuthResponse { token, user }))
}

/// POST /api/auth/login - Verify credentials and start a session
///
/// Unknown usernames and wrong passwords get the same response body, so
/// the endpoint cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state.db.verify_credentials(&body.username, &body.password)?;
    let token = state.db.create_session(user.id, SESSION_TTL_DAYS)?;

    info!(user = %user.username, "Login");
    Ok(Json(AuthResponse { token, user }))
}

/// POST /api/auth/logout - End the current session
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    headers: HeaderMap,
) -> Result<Json<SuccessResponse>, AppError> {
    if let Some(token) = bearer_token(&headers) {
        state.db.delete_session(token)?;
    }

    info!(user = %user.username, "Logout");
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/me - The currently authenticated user
pub async fn get_me(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<User> {
    Json(user)
}
