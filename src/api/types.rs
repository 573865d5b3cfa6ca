//! API request and response types

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde::Serialize;

use crate::analytics::AddressRanking;
use crate::errors::ChainRagError;

/// Error body: `{"error": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler error rendered as an [`ErrorResponse`]
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<ChainRagError> for ApiError {
    fn from(err: ChainRagError) -> Self {
        let status = match err {
            ChainRagError::NoDataAvailable => StatusCode::SERVICE_UNAVAILABLE,
            ChainRagError::BlockNotFound(_) => StatusCode::NOT_FOUND,
            ChainRagError::InvalidAttribute(_) | ChainRagError::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

pub type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub data_loaded: bool,
    pub data_rows: usize,
}

/// `GET /api/query?q=...`
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// `GET /api/transactions?page=..&per_page=..`
#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

const fn default_page() -> usize {
    1
}

const fn default_per_page() -> usize {
    10
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

/// `POST /api/rag/query`
#[derive(Debug, Deserialize)]
pub struct RagQueryRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct TopSendersResponse {
    pub senders: Vec<String>,
    pub amounts: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct TopReceiversResponse {
    pub receivers: Vec<String>,
    pub amounts: Vec<f64>,
}

fn amounts_as_f64(ranking: &AddressRanking) -> Vec<f64> {
    ranking
        .amounts
        .iter()
        .map(|a| a.to_f64().unwrap_or(0.0))
        .collect()
}

impl From<AddressRanking> for TopSendersResponse {
    fn from(ranking: AddressRanking) -> Self {
        let amounts = amounts_as_f64(&ranking);
        Self {
            senders: ranking.addresses,
            amounts,
        }
    }
}

impl From<AddressRanking> for TopReceiversResponse {
    fn from(ranking: AddressRanking) -> Self {
        let amounts = amounts_as_f64(&ranking);
        Self {
            receivers: ranking.addresses,
            amounts,
        }
    }
}
