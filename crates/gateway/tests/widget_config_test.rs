//! # Widget Domain Authorization Integration Tests
//!
//! Exercises the public configuration endpoint end-to-end:
//! - unrestricted chatbots serve any origin,
//! - restricted chatbots demand an exact (www-stripped) hostname match,
//! - inactive chatbots are indistinguishable from missing ones,
//! - the store is queried with the anonymous credential, never a caller token,
//! - the response carries the public projection only.

mod common;

use anyhow::Result;
use common::{widget_row, TestApp, ANON_KEY};
use httpmock::Method;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

fn mock_active_bot<'a>(
    app: &'a TestApp,
    bot_id: Uuid,
    allowed_domain: Option<&str>,
) -> httpmock::Mock<'a> {
    app.platform.mock(|when, then| {
        when.method(Method::GET)
            .path("/rest/v1/chatbots")
            .query_param("id", format!("eq.{bot_id}"))
            .query_param("status", "eq.active")
            // The public path must authenticate as the anon credential.
            .header("authorization", format!("Bearer {ANON_KEY}"))
            .header("apikey", ANON_KEY);
        then.status(200)
            .json_body(json!([widget_row("Support Bot", allowed_domain)]));
    })
}

#[tokio::test]
async fn test_unrestricted_bot_serves_any_origin() -> Result<()> {
    let app = TestApp::spawn().await?;
    let bot_id = Uuid::new_v4();
    let store = mock_active_bot(&app, bot_id, None);

    let response = app
        .client
        .get(format!("{}/widget/{bot_id}/config", app.address))
        .header("Origin", "https://totally-unrelated.example.net")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    assert_eq!(body["name"], "Support Bot");
    assert_eq!(body["primaryColor"], "#4f46e5");
    assert_eq!(body["initialMessages"], json!(["Hi there!"]));
    // Projection only: nothing about ownership or the restriction itself.
    assert!(body.get("allowedDomain").is_none());
    assert!(body.get("allowed_domain").is_none());
    assert!(body.get("user_id").is_none());
    store.assert();

    Ok(())
}

#[tokio::test]
async fn test_www_prefix_is_stripped_before_matching() -> Result<()> {
    let app = TestApp::spawn().await?;
    let bot_id = Uuid::new_v4();
    mock_active_bot(&app, bot_id, Some("example.com"));

    let response = app
        .client
        .get(format!("{}/widget/{bot_id}/config", app.address))
        .header("Origin", "https://www.example.com")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_foreign_origin_is_forbidden() -> Result<()> {
    let app = TestApp::spawn().await?;
    let bot_id = Uuid::new_v4();
    mock_active_bot(&app, bot_id, Some("example.com"));

    let response = app
        .client
        .get(format!("{}/widget/{bot_id}/config", app.address))
        .header("Origin", "https://evil.com")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await?;
    assert_eq!(
        body["error"]["message"],
        "This chatbot is not authorized for this domain."
    );

    Ok(())
}

#[tokio::test]
async fn test_subdomain_does_not_match() -> Result<()> {
    let app = TestApp::spawn().await?;
    let bot_id = Uuid::new_v4();
    mock_active_bot(&app, bot_id, Some("example.com"));

    let response = app
        .client
        .get(format!("{}/widget/{bot_id}/config", app.address))
        .header("Origin", "https://app.example.com")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn test_draft_bot_is_not_found_even_with_matching_domain() -> Result<()> {
    let app = TestApp::spawn().await?;
    let bot_id = Uuid::new_v4();

    // The active-only filter means a draft bot comes back as zero rows.
    app.platform.mock(|when, then| {
        when.method(Method::GET)
            .path("/rest/v1/chatbots")
            .query_param("id", format!("eq.{bot_id}"))
            .query_param("status", "eq.active");
        then.status(200).json_body(json!([]));
    });

    let response = app
        .client
        .get(format!("{}/widget/{bot_id}/config", app.address))
        .header("Origin", "https://example.com")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await?;
    assert_eq!(body["error"]["message"], "Active chatbot not found.");

    Ok(())
}

#[tokio::test]
async fn test_null_origin_falls_back_to_referer() -> Result<()> {
    let app = TestApp::spawn().await?;
    let bot_id = Uuid::new_v4();
    mock_active_bot(&app, bot_id, Some("example.com"));

    let response = app
        .client
        .get(format!("{}/widget/{bot_id}/config", app.address))
        .header("Origin", "null")
        .header("Referer", "https://www.example.com/pricing")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_missing_origin_and_referer_is_bad_request() -> Result<()> {
    let app = TestApp::spawn().await?;
    let bot_id = Uuid::new_v4();

    let response = app
        .client
        .get(format!("{}/widget/{bot_id}/config", app.address))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(
        body["error"]["message"],
        "Origin or Referer header is required."
    );

    Ok(())
}

#[tokio::test]
async fn test_no_bearer_token_is_required() -> Result<()> {
    let app = TestApp::spawn().await?;
    let bot_id = Uuid::new_v4();
    mock_active_bot(&app, bot_id, None);

    // No Authorization header anywhere in this test; identity endpoint has
    // no mock, so any call to it would fail loudly.
    let response = app
        .client
        .get(format!("{}/widget/{bot_id}/config", app.address))
        .header("Origin", "https://example.com")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
