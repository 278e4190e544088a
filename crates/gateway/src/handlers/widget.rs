//! Public widget configuration handler
//!
//! The one unauthenticated data endpoint. It never reads a bearer token and
//! queries the store with the anonymous credential only, so the public path
//! cannot ride on a caller's privileges. Authorization is by embedding
//! domain, decided by `chatflow_common::widget`.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    Json,
};
use uuid::Uuid;

use chatflow_common::{
    metrics::record_widget_decision,
    widget::{self, WidgetConfig},
    AppError, Credential, Result,
};

use crate::state::AppState;

/// Serve a chatbot's widget configuration to an embedding page
pub async fn widget_config(
    State(state): State<AppState>,
    Path(bot_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<WidgetConfig>> {
    let origin = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok());
    let referer = headers.get(header::REFERER).and_then(|v| v.to_str().ok());

    let request_domain = widget::request_domain(origin, referer).inspect_err(|_| {
        record_widget_decision("bad_request");
    })?;

    // Anonymous credential: inactive chatbots are invisible here, exactly
    // like nonexistent ones.
    let record = state
        .platform
        .store
        .find_active_chatbot(&Credential::Anon, bot_id)
        .await?
        .ok_or_else(|| {
            record_widget_decision("not_found");
            AppError::NotFound {
                message: "Active chatbot not found.".to_string(),
            }
        })?;

    if !widget::domain_allowed(request_domain.as_deref(), record.allowed_domain.as_deref()) {
        record_widget_decision("forbidden");
        tracing::warn!(
            bot_id = %bot_id,
            request_domain = request_domain.as_deref().unwrap_or("<unusable>"),
            "Widget request from unauthorized domain"
        );
        return Err(AppError::Forbidden {
            message: "This chatbot is not authorized for this domain.".to_string(),
        });
    }

    record_widget_decision("served");

    Ok(Json(record.into_config()))
}
