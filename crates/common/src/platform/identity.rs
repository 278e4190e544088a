//! Identity provider client
//!
//! Talks to a GoTrue-compatible identity API. This service never inspects
//! token contents itself: a token is an opaque string exchanged with the
//! provider for an identity, once per request. Provider-side rejections are
//! collapsed into a single generic `Unauthenticated` error so no provider
//! diagnostic reaches the caller.

use serde::Deserialize;
use tracing::warn;

use crate::config::PlatformConfig;
use crate::errors::{AppError, Result};
use crate::models::Identity;

/// Client for the platform's identity API.
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    auth_url: String,
    anon_key: String,
}

/// A user as the identity provider returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    pub id: uuid::Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
}

/// A successful password-grant response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub user: ProviderUser,
}

impl ProviderUser {
    /// Collapse the provider payload into the fields this service uses.
    pub fn into_identity(self) -> Identity {
        Identity {
            id: self.id,
            email: self.email.unwrap_or_default(),
            display_name: self.user_metadata.full_name.unwrap_or_default(),
            role: self
                .user_metadata
                .role
                .or(self.role)
                .unwrap_or_else(|| "user".to_string()),
        }
    }
}

impl IdentityClient {
    pub fn new(http: reqwest::Client, config: &PlatformConfig) -> Self {
        Self {
            http,
            auth_url: config.auth_url(),
            anon_key: config.anon_key.clone(),
        }
    }

    /// Exchange a bearer token for the identity it belongs to.
    ///
    /// Any rejection by the provider (expired, malformed, revoked) yields the
    /// same generic error; the provider's status is logged server-side only.
    pub async fn verify_token(&self, token: &str) -> Result<Identity> {
        let response = self
            .http
            .get(format!("{}/user", self.auth_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Identity provider rejected token");
            return Err(AppError::Unauthenticated {
                message: "Invalid or expired token".to_string(),
            });
        }

        let user: ProviderUser = response.json().await.map_err(|e| AppError::StoreFailure {
            message: format!("malformed identity provider response: {e}"),
        })?;

        Ok(user.into_identity())
    }

    /// Create a new account with the identity provider.
    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<ProviderUser> {
        let response = self
            .http
            .post(format!("{}/signup", self.auth_url))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": { "full_name": name },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Identity provider rejected signup");
            return Err(AppError::BadRequest {
                message: "Could not create user account.".to_string(),
            });
        }

        response.json().await.map_err(|e| AppError::StoreFailure {
            message: format!("malformed identity provider response: {e}"),
        })
    }

    /// Authenticate with email and password, yielding a session token pair.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<TokenGrant> {
        let response = self
            .http
            .post(format!("{}/token", self.auth_url))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Identity provider rejected credentials");
            return Err(AppError::Unauthenticated {
                message: "Invalid credentials".to_string(),
            });
        }

        response.json().await.map_err(|e| AppError::StoreFailure {
            message: format!("malformed identity provider response: {e}"),
        })
    }
}
