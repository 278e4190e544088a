//! # Common Test Utilities
//!
//! Centralizes the harness shared by the gateway integration tests:
//!
//! - `TestApp`: spawns the real router on a random port, configured against
//!   an `httpmock::MockServer` standing in for the whole external platform
//!   (identity, relational store, and blob storage share one base URL, just
//!   like the real thing).
//! - Row builders for store responses.

// Allow unused code because this is a test utility module, and not all
// helpers are used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use httpmock::{Method, MockServer};
use reqwest::Client;
use serde_json::json;
use std::net::SocketAddr;
use tokio::{net::TcpListener, task::JoinHandle};
use uuid::Uuid;

use chatflow_common::AppConfig;
use chatflow_gateway::{router, state};

/// The anon key the spawned gateway is configured with; store calls made on
/// public paths must authenticate with exactly this value.
pub const ANON_KEY: &str = "test-anon-key";

/// A harness for end-to-end testing of the gateway.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub platform: MockServer,
    _server_handle: JoinHandle<()>,
}

impl TestApp {
    /// Spawns the gateway against a fresh mock platform.
    pub async fn spawn() -> Result<Self> {
        let platform = MockServer::start();

        let mut config = AppConfig::default();
        config.platform.url = platform.base_url();
        config.platform.anon_key = ANON_KEY.to_string();
        config.rate_limit.enabled = false;
        config.observability.metrics_port = 0;

        let app_state = state::build_app_state(config)?;
        let app = router::create_router(app_state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let server_handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("[TestApp] Server error: {e}");
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            platform,
            _server_handle: server_handle,
        })
    }

    /// Register a token the identity provider accepts, resolving to `user_id`.
    pub fn mock_identity(&self, token: &str, user_id: Uuid) {
        self.platform.mock(|when, then| {
            when.method(Method::GET)
                .path("/auth/v1/user")
                .header("authorization", format!("Bearer {token}"));
            then.status(200).json_body(json!({
                "id": user_id,
                "email": "owner@example.com",
                "user_metadata": { "full_name": "Test User" }
            }));
        });
    }

    /// Register a token the identity provider rejects.
    pub fn mock_identity_rejection(&self, token: &str) {
        self.platform.mock(|when, then| {
            when.method(Method::GET)
                .path("/auth/v1/user")
                .header("authorization", format!("Bearer {token}"));
            then.status(401)
                .json_body(json!({ "error": "invalid JWT", "error_description": "token is expired" }));
        });
    }
}

/// A chatbot row as the store would return it.
pub fn chatbot_row(id: Uuid, user_id: Uuid, name: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": user_id,
        "name": name,
        "description": "A helpful bot",
        "status": status,
        "greeting": "Hello!",
        "placeholder": "Ask me anything",
        "primary_color": "#4f46e5",
        "position": "bottom-right",
        "size": "medium",
        "show_avatar": true,
        "enable_typing": true,
        "response_delay": 500,
        "allowed_domain": null,
        "initial_messages": ["Hi there!"],
        "conversations": 0,
        "accuracy": 0,
        "created_at": "2026-08-01T10:15:00+00:00",
        "last_updated": "2026-08-01T10:15:00+00:00"
    })
}

/// A widget projection row (the narrowed select the public endpoint makes).
pub fn widget_row(name: &str, allowed_domain: Option<&str>) -> serde_json::Value {
    json!({
        "name": name,
        "greeting": "Hello!",
        "placeholder": "Ask me anything",
        "primary_color": "#4f46e5",
        "position": "bottom-right",
        "size": "medium",
        "show_avatar": true,
        "enable_typing": true,
        "allowed_domain": allowed_domain,
        "initial_messages": ["Hi there!"]
    })
}

/// A document row as the store would return it.
pub fn document_row(
    id: Uuid,
    chatbot_id: Uuid,
    user_id: Uuid,
    source_type: &str,
    storage_path: Option<&str>,
) -> serde_json::Value {
    json!({
        "id": id,
        "chatbot_id": chatbot_id,
        "user_id": user_id,
        "source_type": source_type,
        "source_name": if source_type == "file" { "notes.txt" } else { "https://docs.example.com" },
        "storage_path": storage_path,
        "status": "pending",
        "created_at": "2026-08-01T10:15:00+00:00"
    })
}
