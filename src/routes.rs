//! Route definitions and router setup
//!
//! Configures all API routes, the upload and static file services, and
//! middleware.

mod admin;
mod animals;
mod applications;
mod auth;
mod extract;
mod feedback;
mod users;


use crate::auth::ADMIN_SECRET_HEADER;
use crate::config::Settings;
use crate::error::{not_found_error, AppError};
use crate::state::SharedState;
use crate::upload::UPLOADS_ROUTE;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    let uploads = ServeDir::new(state.uploads.dir());
    let public_dir = &settings.assets.public_dir;
    // Client-side pages are deep-linkable: unknown paths get the main page
    let public = ServeDir::new(public_dir).fallback(ServeFile::new(public_dir.join("index.html")));

    let api = Router::new()
        // Catalog
        .route("/animals", get(animals::list_animals))
        .route("/animals/{id}", get(animals::get_animal))

        // Admin
        .route("/admin/animals", post(admin::create_animal))
        .route("/admin/animals/{id}", put(admin::update_animal))
        .route("/admin/animals/{id}/adopt", post(admin::toggle_adopted))

        // Visitors
        .route("/apply", post(applications::apply))
        .route("/feedback", post(feedback::submit_feedback))
        .route("/newsletter", post(feedback::newsletter_signup))

        // Accounts
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/users/{id}", put(users::update_profile))
        .route("/users/{id}/applications", get(users::user_applications))
        .fallback(api_not_found);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .nest("/api", api)
        .nest_service(UPLOADS_ROUTE, uploads)
        .fallback_service(public)

        // Apply middleware and state
        .layer(DefaultBodyLimit::max(settings.assets.max_upload_bytes))
        .layer(middleware)
        .with_state(state)
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(ADMIN_SECRET_HEADER),
        ])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

/// Unmatched `/api/*` paths answer in JSON rather than with the main page
async fn api_not_found() -> AppError {
    not_found_error("Route not found")
}

/// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
