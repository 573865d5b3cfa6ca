//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Routes mounted under `/api`
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Dataset
        .route("/stats", get(handlers::get_stats))
        .route("/transactions", get(handlers::get_transactions))
        // Analytics
        .route("/analytics/volume-over-time", get(handlers::volume_over_time))
        .route("/analytics/top-senders", get(handlers::top_senders))
        .route("/analytics/top-receivers", get(handlers::top_receivers))
        .route("/analytics/block-distribution", get(handlers::block_distribution))
        .route("/analytics/transaction-timeline", get(handlers::transaction_timeline))
        .route("/analytics/network-stats", get(handlers::network_stats))
        // Query endpoints
        .route("/query", get(handlers::query_data))
        .route("/rag/query", post(handlers::rag_query))
        .route("/rag/stats", get(handlers::rag_stats))
        .with_state(state)
}
