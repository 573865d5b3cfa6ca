/// Chart data handlers under /api/analytics
use axum::extract::State;
use axum::Json;
use tracing::debug;

use super::AppState;
use crate::analytics;
use crate::analytics::BlockDistribution;
use crate::analytics::NetworkStats;
use crate::analytics::TransactionTimeline;
use crate::analytics::VolumeOverTime;
use crate::analytics::DEFAULT_TOP_N;
use crate::api::types::ApiResult;
use crate::api::types::TopReceiversResponse;
use crate::api::types::TopSendersResponse;

pub async fn volume_over_time(State(state): State<AppState>) -> ApiResult<VolumeOverTime> {
    debug!("GET /api/analytics/volume-over-time");
    Ok(Json(analytics::volume_over_time(&state.store)?))
}

pub async fn top_senders(State(state): State<AppState>) -> ApiResult<TopSendersResponse> {
    debug!("GET /api/analytics/top-senders");
    Ok(Json(analytics::top_senders(&state.store, DEFAULT_TOP_N)?.into()))
}

pub async fn top_receivers(State(state): State<AppState>) -> ApiResult<TopReceiversResponse> {
    debug!("GET /api/analytics/top-receivers");
    Ok(Json(analytics::top_receivers(&state.store, DEFAULT_TOP_N)?.into()))
}

pub async fn block_distribution(State(state): State<AppState>) -> ApiResult<BlockDistribution> {
    debug!("GET /api/analytics/block-distribution");
    Ok(Json(analytics::block_distribution(&state.store)?))
}

pub async fn transaction_timeline(State(state): State<AppState>) -> ApiResult<TransactionTimeline> {
    debug!("GET /api/analytics/transaction-timeline");
    Ok(Json(analytics::transaction_timeline(&state.store)?))
}

pub async fn network_stats(State(state): State<AppState>) -> ApiResult<NetworkStats> {
    debug!("GET /api/analytics/network-stats");
    Ok(Json(analytics::network_stats(&state.store)?))
}
