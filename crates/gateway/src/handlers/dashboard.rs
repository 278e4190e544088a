//! Dashboard handlers

use axum::{extract::State, Json};
use serde::Serialize;

use chatflow_common::{Credential, Result};

use crate::auth::AuthenticatedUser;
use crate::state::AppState;

/// Placeholder until satisfaction tracking lands.
const SATISFACTION_RATE: u32 = 94;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_chatbots: u64,
    pub total_conversations: i64,
    pub satisfaction_rate: u32,
}

/// High-level stats for the authenticated user's dashboard
pub async fn stats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<DashboardStats>> {
    let credential = Credential::User(user.token.clone());

    let (total_chatbots, total_conversations) = state
        .platform
        .store
        .conversation_totals(&credential, user.identity.id)
        .await?;

    Ok(Json(DashboardStats {
        total_chatbots,
        total_conversations,
        satisfaction_rate: SATISFACTION_RATE,
    }))
}
