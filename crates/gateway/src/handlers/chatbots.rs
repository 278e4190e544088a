//! Chatbot management handlers
//!
//! Every operation here runs as the resolved identity: creation stamps the
//! owner server-side, single-resource operations filter by owner inside the
//! store query, and a zero-row result is reported as not-found even when a
//! preceding check passed (covers races with concurrent deletes).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use chatflow_common::{AppError, Chatbot, ChatbotStatus, Credential, Result};

use crate::auth::AuthenticatedUser;
use crate::state::AppState;

pub(crate) const CHATBOT_NOT_FOUND: &str =
    "Chatbot not found or you do not have permission to access it.";

/// Request to create a new chatbot
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChatbotRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    pub description: Option<String>,
}

/// Partial update to a chatbot. Absent fields are left untouched.
///
/// There is deliberately no owner field here: ownership is immutable and the
/// owner filter on the update query is the only authorization check.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct UpdateChatbotRequest {
    #[validate(length(min = 1, max = 120))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ChatbotStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_avatar: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_typing: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_delay: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_domain: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_messages: Option<Vec<String>>,
}

/// Confirm that `chatbot_id` exists and belongs to `owner`.
///
/// The owner filter is part of the existence check itself, so a chatbot
/// belonging to another user fails exactly like a nonexistent one.
pub(crate) async fn assert_chatbot_owner(
    state: &AppState,
    credential: &Credential,
    chatbot_id: Uuid,
    owner: Uuid,
) -> Result<()> {
    if state
        .platform
        .store
        .chatbot_owned(credential, chatbot_id, owner)
        .await?
    {
        Ok(())
    } else {
        Err(AppError::NotFound {
            message: CHATBOT_NOT_FOUND.to_string(),
        })
    }
}

/// Create a new chatbot for the authenticated user
pub async fn create_chatbot(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateChatbotRequest>,
) -> Result<(StatusCode, Json<Chatbot>)> {
    request.validate().map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let credential = Credential::User(user.token.clone());

    // The owner comes from the resolved identity, never from the request
    // body; status and timestamps come from the store's column defaults.
    let body = json!({
        "name": request.name,
        "description": request.description,
        "user_id": user.identity.id,
    });

    let chatbot = state.platform.store.insert_chatbot(&credential, &body).await?;

    tracing::info!(
        chatbot_id = %chatbot.id,
        user_id = %user.identity.id,
        "Chatbot created"
    );

    Ok((StatusCode::CREATED, Json(chatbot)))
}

/// List the authenticated user's chatbots
pub async fn list_chatbots(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Chatbot>>> {
    let credential = Credential::User(user.token.clone());

    let chatbots = state
        .platform
        .store
        .list_chatbots(&credential, user.identity.id)
        .await?;

    Ok(Json(chatbots))
}

/// Get a single chatbot by id
pub async fn get_chatbot(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(chatbot_id): Path<Uuid>,
) -> Result<Json<Chatbot>> {
    let credential = Credential::User(user.token.clone());

    let chatbot = state
        .platform
        .store
        .find_chatbot(&credential, chatbot_id, user.identity.id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            message: CHATBOT_NOT_FOUND.to_string(),
        })?;

    Ok(Json(chatbot))
}

/// Update a chatbot's configuration
pub async fn update_chatbot(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(chatbot_id): Path<Uuid>,
    Json(request): Json<UpdateChatbotRequest>,
) -> Result<Json<Chatbot>> {
    request.validate().map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let patch = serde_json::to_value(&request).map_err(|e| AppError::StoreFailure {
        message: format!("failed to serialize update: {e}"),
    })?;

    if patch.as_object().map_or(true, |fields| fields.is_empty()) {
        return Err(AppError::BadRequest {
            message: "No fields provided to update.".to_string(),
        });
    }

    let credential = Credential::User(user.token.clone());

    let chatbot = state
        .platform
        .store
        .update_chatbot(&credential, chatbot_id, user.identity.id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound {
            message: CHATBOT_NOT_FOUND.to_string(),
        })?;

    tracing::info!(chatbot_id = %chatbot.id, "Chatbot updated");

    Ok(Json(chatbot))
}

/// Delete a chatbot and its documents
pub async fn delete_chatbot(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(chatbot_id): Path<Uuid>,
) -> Result<StatusCode> {
    let credential = Credential::User(user.token.clone());

    // Collect the file blobs before the rows cascade away. The owner filter
    // makes this return nothing for a chatbot that is not ours.
    let documents = state
        .platform
        .store
        .list_documents(&credential, chatbot_id, user.identity.id)
        .await?;

    state
        .platform
        .store
        .delete_chatbot(&credential, chatbot_id, user.identity.id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            message: CHATBOT_NOT_FOUND.to_string(),
        })?;

    // Best-effort blob cleanup; a failure here never blocks the delete.
    for document in documents {
        if let Some(path) = document.storage_path.as_deref() {
            if let Err(e) = state.platform.blobs.remove(&credential, path).await {
                chatflow_common::metrics::record_blob_cleanup_failure();
                tracing::warn!(document_id = %document.id, error = %e, "Could not delete file from storage");
            }
        }
    }

    tracing::info!(
        chatbot_id = %chatbot_id,
        user_id = %user.identity.id,
        "Chatbot deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
