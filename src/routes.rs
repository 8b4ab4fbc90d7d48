// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{assessment, dashboard, domains, health, roadmap},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * `/health` is public; every other route requires a bearer token.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (progress store, catalog, config).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let protected_routes = Router::new()
        .route("/domains", get(domains::list_domains))
        .route("/roadmap/{domain}", get(roadmap::get_roadmap))
        .route("/assessment/submit", post(assessment::submit))
        .route("/assessment/history", get(assessment::history))
        .route("/dashboard", get(dashboard::get_dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(protected_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
