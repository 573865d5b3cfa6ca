/// Rule-based query handler
use axum::extract::Query;
use axum::extract::State;
use axum::Json;
use tracing::info;

use super::AppState;
use crate::api::types::ApiError;
use crate::api::types::ApiResult;
use crate::api::types::QueryParams;
use crate::query::ResponseEnvelope;

/// GET /api/query?q=...
pub async fn query_data(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> ApiResult<ResponseEnvelope> {
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(ApiError::bad_request("No query provided"));
    }
    info!("GET /api/query: {}", query);

    Ok(Json(state.dispatcher.process(query)))
}
