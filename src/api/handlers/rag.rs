/// RAG-related API handlers
use axum::extract::State;
use axum::Json;
use tracing::info;

use super::AppState;
use crate::api::types::ApiError;
use crate::api::types::ApiResult;
use crate::api::types::RagQueryRequest;
use crate::query::ResponseEnvelope;
use crate::rag::pipeline::ServiceStats;

/// POST /api/rag/query
pub async fn rag_query(
    State(state): State<AppState>,
    Json(req): Json<RagQueryRequest>,
) -> ApiResult<ResponseEnvelope> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(ApiError::bad_request("No question provided"));
    }
    info!("POST /api/rag/query: {}", question);

    Ok(Json(state.rag.query(question).await))
}

/// GET /api/rag/stats
pub async fn rag_stats(State(state): State<AppState>) -> Json<ServiceStats> {
    Json(state.rag.performance_stats())
}
