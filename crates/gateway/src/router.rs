//! Router assembly

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::{from_fn, Next},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::handlers;
use crate::middleware::{rate_limit, track};
use crate::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // Authenticated API routes
    let api_routes = Router::new()
        // Accounts
        .route("/auth/signup", post(handlers::accounts::signup))
        .route("/auth/signin", post(handlers::accounts::signin))

        // Dashboard
        .route("/dashboard/stats", get(handlers::dashboard::stats))

        // Chatbots
        .route("/chatbots", post(handlers::chatbots::create_chatbot))
        .route("/chatbots", get(handlers::chatbots::list_chatbots))
        .route("/chatbots/{id}", get(handlers::chatbots::get_chatbot))
        .route("/chatbots/{id}", put(handlers::chatbots::update_chatbot))
        .route("/chatbots/{id}", delete(handlers::chatbots::delete_chatbot))

        // Documents
        .route(
            "/chatbots/{id}/documents",
            get(handlers::documents::list_documents),
        )
        .route(
            "/chatbots/{id}/documents/file",
            post(handlers::documents::upload_document_file),
        )
        .route(
            "/chatbots/{id}/documents/url",
            post(handlers::documents::add_document_url),
        )
        .route(
            "/documents/{id}",
            delete(handlers::documents::delete_document),
        );

    // Compose the app
    let rate_limit_enabled = state.config.rate_limit.enabled;
    let limiter = rate_limit::create_rate_limiter(
        state.config.rate_limit.requests_per_second,
        state.config.rate_limit.burst,
    );

    let mut app = Router::new()
        // Health endpoints (no auth)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))

        // Public widget endpoint (no auth, domain-checked)
        .route("/widget/{bot_id}/config", get(handlers::widget::widget_config))

        .nest("/api", api_routes)
        .route_layer(from_fn(track::track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state);

    if rate_limit_enabled {
        app = app.layer(from_fn(move |request: Request, next: Next| {
            let limiter = limiter.clone();
            async move { rate_limit::rate_limit_middleware(request, next, limiter).await }
        }));
    }

    app
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let configured: Vec<HeaderValue> = state
        .config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if configured.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(configured)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
