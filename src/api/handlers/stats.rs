/// Dataset statistics and paging handlers
use axum::extract::Query;
use axum::extract::State;
use axum::Json;
use tracing::info;

use super::AppState;
use crate::analytics;
use crate::analytics::DatasetStats;
use crate::analytics::TransactionPage;
use crate::api::types::ApiResult;
use crate::api::types::PageParams;

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<DatasetStats> {
    info!("GET /api/stats");
    Ok(Json(analytics::dataset_stats(&state.store)?))
}

/// GET /api/transactions
pub async fn get_transactions(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<TransactionPage> {
    info!(page = params.page, per_page = params.per_page, "GET /api/transactions");
    Ok(Json(analytics::paginate(
        &state.store,
        params.page,
        params.per_page,
    )?))
}
