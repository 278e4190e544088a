//! Relational store client
//!
//! Typed data access against a PostgREST-compatible API. Row-level
//! authorization is part of every query: single-resource operations filter on
//! both the primary key and the owner id in the same request, so a row owned
//! by another user is indistinguishable from a missing one, and list
//! operations always carry the owner filter server-side. Callers never get a
//! fetch-then-compare seam to misuse.

use reqwest::{header, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PlatformConfig;
use crate::errors::{AppError, Result};
use crate::models::{Chatbot, Document};
use crate::widget::WidgetRecord;

const CHATBOTS: &str = "chatbots";
const DOCUMENTS: &str = "documents";

/// Columns the public widget lookup is allowed to read.
const WIDGET_COLUMNS: &str = "name,greeting,placeholder,primary_color,position,size,\
                              show_avatar,enable_typing,allowed_domain,initial_messages";

#[derive(Deserialize)]
struct ConversationRow {
    #[serde(default)]
    conversations: i64,
}

/// Client for the platform's relational store API.
#[derive(Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    rest_url: String,
    anon_key: String,
}

impl StoreClient {
    pub fn new(http: reqwest::Client, config: &PlatformConfig) -> Self {
        Self {
            http,
            rest_url: config.rest_url(),
            anon_key: config.anon_key.clone(),
        }
    }

    fn request(
        &self,
        method: Method,
        table: &str,
        credential: &super::Credential,
    ) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.rest_url, table))
            .header("apikey", &self.anon_key)
            .bearer_auth(credential.bearer(&self.anon_key))
    }

    /// Decode a store response into rows, surfacing non-success statuses as
    /// `StoreFailure` with the detail kept server-side.
    async fn rows<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<Vec<T>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::StoreFailure {
                message: format!("{context}: store returned {status}: {body}"),
            });
        }

        response.json().await.map_err(|e| AppError::StoreFailure {
            message: format!("{context}: malformed store response: {e}"),
        })
    }

    /// Check that the store is reachable.
    pub async fn ping(&self) -> Result<()> {
        let response = self
            .http
            .get(format!("{}/", self.rest_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::StoreFailure {
                message: format!("store ping returned {}", response.status()),
            })
        }
    }

    // ========================================================================
    // Chatbot Operations
    // ========================================================================

    /// List every chatbot owned by `owner`, newest first.
    pub async fn list_chatbots(
        &self,
        credential: &super::Credential,
        owner: Uuid,
    ) -> Result<Vec<Chatbot>> {
        let response = self
            .request(Method::GET, CHATBOTS, credential)
            .query(&[
                ("select", "*".to_string()),
                ("user_id", eq(owner)),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await?;

        self.rows(response, "list chatbots").await
    }

    /// Fetch a single chatbot, filtered by owner in the same query.
    ///
    /// `None` covers both "does not exist" and "exists but is not yours".
    pub async fn find_chatbot(
        &self,
        credential: &super::Credential,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Chatbot>> {
        let response = self
            .request(Method::GET, CHATBOTS, credential)
            .query(&[
                ("select", "*".to_string()),
                ("id", eq(id)),
                ("user_id", eq(owner)),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;

        let mut rows: Vec<Chatbot> = self.rows(response, "find chatbot").await?;
        Ok(rows.pop())
    }

    /// Existence-with-ownership check, same predicate as [`find_chatbot`]
    /// but fetching only the key.
    ///
    /// [`find_chatbot`]: StoreClient::find_chatbot
    pub async fn chatbot_owned(
        &self,
        credential: &super::Credential,
        id: Uuid,
        owner: Uuid,
    ) -> Result<bool> {
        let response = self
            .request(Method::GET, CHATBOTS, credential)
            .query(&[
                ("select", "id".to_string()),
                ("id", eq(id)),
                ("user_id", eq(owner)),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;

        let rows: Vec<serde_json::Value> = self.rows(response, "chatbot ownership check").await?;
        Ok(!rows.is_empty())
    }

    /// Insert a chatbot row and return it as stored.
    ///
    /// The body must already carry the server-stamped `user_id`; status and
    /// timestamps come from the store's column defaults.
    pub async fn insert_chatbot<B: Serialize>(
        &self,
        credential: &super::Credential,
        body: &B,
    ) -> Result<Chatbot> {
        let response = self
            .request(Method::POST, CHATBOTS, credential)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        let mut rows: Vec<Chatbot> = self.rows(response, "insert chatbot").await?;
        rows.pop().ok_or_else(|| AppError::StoreFailure {
            message: "insert chatbot: store returned no rows".to_string(),
        })
    }

    /// Apply a partial update to an owned chatbot.
    ///
    /// Returns `None` when the owner-filtered predicate matched nothing,
    /// which also covers a concurrent delete between check and update.
    pub async fn update_chatbot<P: Serialize>(
        &self,
        credential: &super::Credential,
        id: Uuid,
        owner: Uuid,
        patch: &P,
    ) -> Result<Option<Chatbot>> {
        let response = self
            .request(Method::PATCH, CHATBOTS, credential)
            .query(&[("id", eq(id)), ("user_id", eq(owner))])
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;

        let mut rows: Vec<Chatbot> = self.rows(response, "update chatbot").await?;
        Ok(rows.pop())
    }

    /// Delete an owned chatbot, returning the deleted row if any.
    ///
    /// Document rows cascade inside the store.
    pub async fn delete_chatbot(
        &self,
        credential: &super::Credential,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Chatbot>> {
        let response = self
            .request(Method::DELETE, CHATBOTS, credential)
            .query(&[("id", eq(id)), ("user_id", eq(owner))])
            .header("Prefer", "return=representation")
            .send()
            .await?;

        let mut rows: Vec<Chatbot> = self.rows(response, "delete chatbot").await?;
        Ok(rows.pop())
    }

    /// Widget lookup: an active chatbot by id, narrowed to the columns the
    /// widget may see. No owner filter — this is the public path and runs
    /// with the anonymous credential.
    pub async fn find_active_chatbot(
        &self,
        credential: &super::Credential,
        id: Uuid,
    ) -> Result<Option<WidgetRecord>> {
        let response = self
            .request(Method::GET, CHATBOTS, credential)
            .query(&[
                ("select", WIDGET_COLUMNS.to_string()),
                ("id", eq(id)),
                ("status", "eq.active".to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;

        let mut rows: Vec<WidgetRecord> = self.rows(response, "widget lookup").await?;
        Ok(rows.pop())
    }

    /// Owner-filtered chatbot count plus the sum of their conversation
    /// counters, using the store's exact-count support.
    pub async fn conversation_totals(
        &self,
        credential: &super::Credential,
        owner: Uuid,
    ) -> Result<(u64, i64)> {
        let response = self
            .request(Method::GET, CHATBOTS, credential)
            .query(&[("select", "conversations".to_string()), ("user_id", eq(owner))])
            .header("Prefer", "count=exact")
            .send()
            .await?;

        let exact_total = response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(content_range_total);

        let rows: Vec<ConversationRow> = self.rows(response, "conversation totals").await?;
        let conversations = rows.iter().map(|r| r.conversations).sum();
        let total = exact_total.unwrap_or(rows.len() as u64);

        Ok((total, conversations))
    }

    // ========================================================================
    // Document Operations
    // ========================================================================

    /// List a chatbot's documents, newest first. The owner filter rides along
    /// even though the caller has already passed the chatbot ownership check.
    pub async fn list_documents(
        &self,
        credential: &super::Credential,
        chatbot_id: Uuid,
        owner: Uuid,
    ) -> Result<Vec<Document>> {
        let response = self
            .request(Method::GET, DOCUMENTS, credential)
            .query(&[
                ("select", "*".to_string()),
                ("chatbot_id", eq(chatbot_id)),
                ("user_id", eq(owner)),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await?;

        self.rows(response, "list documents").await
    }

    /// Insert a document row and return it as stored.
    pub async fn insert_document<B: Serialize>(
        &self,
        credential: &super::Credential,
        body: &B,
    ) -> Result<Document> {
        let response = self
            .request(Method::POST, DOCUMENTS, credential)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        let mut rows: Vec<Document> = self.rows(response, "insert document").await?;
        rows.pop().ok_or_else(|| AppError::StoreFailure {
            message: "insert document: store returned no rows".to_string(),
        })
    }

    /// Delete an owned document, returning the deleted row (the caller needs
    /// its `storage_path` for blob cleanup). `None` means missing or not
    /// yours, indistinguishably.
    pub async fn delete_document(
        &self,
        credential: &super::Credential,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Document>> {
        let response = self
            .request(Method::DELETE, DOCUMENTS, credential)
            .query(&[("id", eq(id)), ("user_id", eq(owner))])
            .header("Prefer", "return=representation")
            .send()
            .await?;

        let mut rows: Vec<Document> = self.rows(response, "delete document").await?;
        Ok(rows.pop())
    }
}

/// Render an equality filter the way the store's query dialect expects it.
fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

/// Total row count from a `Content-Range` header such as `0-4/5` or `*/0`.
fn content_range_total(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.parse().ok()
}
