//! Route definitions for the API server

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Creates the main application router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    // Create CORS layer (allow all origins)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Full dashboard view (json or csv)
        .route("/dashboard", get(handlers::get_dashboard))
        // Single KPI over an explicit window
        .route("/kpi/:field", get(handlers::get_kpi))
        // Alert rules for the selected period
        .route("/alerts", get(handlers::get_alerts))
        // Raw record table
        .route("/records", get(handlers::get_records))
        // Add middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // Add shared state
        .with_state(state)
}
