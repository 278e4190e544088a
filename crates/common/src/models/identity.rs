//! Resolved identity

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated principal resolved from a bearer token.
///
/// Resolved fresh from the identity provider on every request; never cached.
/// `id` is the only field the authorization layer consults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: String,
}
