//! Document management handlers
//!
//! Documents are owned transitively through their chatbot: every operation
//! first passes the chatbot ownership check, and the document queries still
//! carry the owner filter themselves. Blob uploads and removals are
//! compensated best-effort; the document row in the store is the source of
//! truth.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Form, Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use chatflow_common::{AppError, Credential, Document, Result};

use crate::auth::AuthenticatedUser;
use crate::handlers::chatbots::assert_chatbot_owner;
use crate::state::AppState;

pub(crate) const DOCUMENT_NOT_FOUND: &str =
    "Document not found or you do not have permission to access it.";

/// Form body for registering a URL source
#[derive(Debug, Deserialize)]
pub struct AddUrlRequest {
    pub url: String,
}

/// List a chatbot's documents
pub async fn list_documents(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(chatbot_id): Path<Uuid>,
) -> Result<Json<Vec<Document>>> {
    let credential = Credential::User(user.token.clone());
    assert_chatbot_owner(&state, &credential, chatbot_id, user.identity.id).await?;

    let documents = state
        .platform
        .store
        .list_documents(&credential, chatbot_id, user.identity.id)
        .await?;

    Ok(Json(documents))
}

/// Upload a file and create a document record for it
pub async fn upload_document_file(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(chatbot_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Document>)> {
    let credential = Credential::User(user.token.clone());
    assert_chatbot_owner(&state, &credential, chatbot_id, user.identity.id).await?;

    let mut upload: Option<(String, String, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| AppError::BadRequest {
        message: format!("Invalid multipart body: {e}"),
    })? {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(|e| AppError::BadRequest {
                message: format!("Could not read uploaded file: {e}"),
            })?;
            upload = Some((file_name, content_type, bytes.to_vec()));
        }
    }

    let Some((file_name, content_type, bytes)) = upload else {
        return Err(AppError::BadRequest {
            message: "A file upload is required.".to_string(),
        });
    };

    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    let storage_path = format!(
        "{}/{}/{}.{}",
        user.identity.id,
        chatbot_id,
        Uuid::new_v4(),
        extension
    );

    state
        .platform
        .blobs
        .upload(&credential, &storage_path, bytes, &content_type)
        .await?;

    let body = json!({
        "source_type": "file",
        "source_name": file_name,
        "storage_path": storage_path,
        "chatbot_id": chatbot_id,
        "user_id": user.identity.id,
    });

    let document = match state.platform.store.insert_document(&credential, &body).await {
        Ok(document) => document,
        Err(e) => {
            // The blob made it up but the record did not; try not to leave
            // it orphaned. One attempt, no retry.
            if let Err(cleanup) = state.platform.blobs.remove(&credential, &storage_path).await {
                chatflow_common::metrics::record_blob_cleanup_failure();
                tracing::warn!(
                    storage_path,
                    error = %cleanup,
                    "Could not remove orphaned blob after failed insert"
                );
            }
            return Err(e);
        }
    };

    tracing::info!(
        document_id = %document.id,
        chatbot_id = %chatbot_id,
        "Document uploaded"
    );

    Ok((StatusCode::CREATED, Json(document)))
}

/// Register a URL as a document source
pub async fn add_document_url(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(chatbot_id): Path<Uuid>,
    Form(request): Form<AddUrlRequest>,
) -> Result<(StatusCode, Json<Document>)> {
    let credential = Credential::User(user.token.clone());
    assert_chatbot_owner(&state, &credential, chatbot_id, user.identity.id).await?;

    let body = json!({
        "source_type": "url",
        "source_name": request.url,
        "chatbot_id": chatbot_id,
        "user_id": user.identity.id,
    });

    let document = state.platform.store.insert_document(&credential, &body).await?;

    tracing::info!(
        document_id = %document.id,
        chatbot_id = %chatbot_id,
        "URL document added"
    );

    Ok((StatusCode::CREATED, Json(document)))
}

/// Delete a document record and, for file sources, its blob
pub async fn delete_document(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(document_id): Path<Uuid>,
) -> Result<StatusCode> {
    let credential = Credential::User(user.token.clone());

    let document = state
        .platform
        .store
        .delete_document(&credential, document_id, user.identity.id)
        .await?
        .ok_or_else(|| AppError::NotFound {
            message: DOCUMENT_NOT_FOUND.to_string(),
        })?;

    if let Some(path) = document.storage_path.as_deref() {
        if let Err(e) = state.platform.blobs.remove(&credential, path).await {
            chatflow_common::metrics::record_blob_cleanup_failure();
            tracing::warn!(document_id = %document_id, error = %e, "Could not delete file from storage");
        }
    }

    tracing::info!(document_id = %document_id, "Document deleted");

    Ok(StatusCode::NO_CONTENT)
}
