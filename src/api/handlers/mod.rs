//! API request handlers

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::api::types::HealthResponse;
use crate::query::QueryDispatcher;
use crate::rag::RagService;
use crate::store::TransactionStore;

pub mod analytics;
pub mod query;
pub mod rag;
pub mod stats;

pub use analytics::*;
pub use query::*;
pub use rag::*;
pub use stats::*;

/// Shared application state; everything except the RAG tracker is read-only
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TransactionStore>,
    pub dispatcher: Arc<QueryDispatcher>,
    pub rag: Arc<RagService>,
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_loaded: !state.store.is_empty(),
        data_rows: state.store.len(),
    })
}
