//! Authentication extractor
//!
//! Resolves the caller's identity from the `Authorization: Bearer <token>`
//! header by exchanging the token with the identity provider, once per
//! request. Handlers receive both the identity and the raw token, which they
//! attach to store calls as a request-scoped credential.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use chatflow_common::{AppError, Identity};

use crate::state::AppState;

/// The currently authenticated caller.
///
/// Extraction fails with 401 when the token is missing or the provider
/// rejects it; handlers using this extractor never see an anonymous caller.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub identity: Identity,
    /// The bearer token as received, forwarded to the store so its row-level
    /// policies see the same caller.
    pub token: String,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer_header =
            Option::<TypedHeader<Authorization<Bearer>>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::BadRequest {
                    message: "Invalid Authorization header format.".to_string(),
                })?;

        let Some(TypedHeader(Authorization(bearer))) = bearer_header else {
            return Err(AppError::Unauthenticated {
                message: "Authentication token is missing".to_string(),
            });
        };

        let token = bearer.token().to_string();
        let identity = state.platform.identity.verify_token(&token).await?;

        Ok(AuthenticatedUser { identity, token })
    }
}
