//! Account handlers
//!
//! Thin proxies over the identity provider: it owns password hashing and
//! session issuance, this service only maps its payloads and keeps its
//! diagnostics out of responses.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use chatflow_common::{platform::identity::ProviderUser, AppError, Result};

use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,

    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub plan: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

fn user_response(user: ProviderUser) -> UserResponse {
    let metadata = user.user_metadata;
    UserResponse {
        id: user.id,
        name: metadata.full_name.unwrap_or_default(),
        email: user.email.unwrap_or_default(),
        role: metadata.role.unwrap_or_else(|| "user".to_string()),
        plan: metadata.plan.unwrap_or_else(|| "free".to_string()),
    }
}

/// Create a new account
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    request.validate().map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let user = state
        .platform
        .identity
        .sign_up(&request.email, &request.password, &request.name)
        .await?;

    tracing::info!(user_id = %user.id, "Account created");

    Ok((StatusCode::CREATED, Json(user_response(user))))
}

/// Authenticate and return a session token pair
pub async fn signin(
    State(state): State<AppState>,
    Json(request): Json<SigninRequest>,
) -> Result<Json<TokenResponse>> {
    let grant = state
        .platform
        .identity
        .sign_in(&request.email, &request.password)
        .await?;

    Ok(Json(TokenResponse {
        access_token: grant.access_token,
        refresh_token: grant.refresh_token,
        user: user_response(grant.user),
    }))
}
