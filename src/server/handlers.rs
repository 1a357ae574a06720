//! Route handlers
//!
//! Each handler runs one engine query and maps the outcome to a status.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{RatesError, Result};
use crate::server::requests::{ConvertParams, RangeParams, RatesParams};
use crate::server::AppState;

/// Error body returned for rejected requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl From<RatesError> for ApiError {
    fn from(err: RatesError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            log::error!("Query failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status: status.as_u16(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// 200 with the body, 204 when absent, error body otherwise
fn respond<T: Serialize>(result: Result<Option<T>>) -> Response {
    match result {
        Ok(Some(body)) => Json(body).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn rates(State(state): State<AppState>, Query(params): Query<RatesParams>) -> Response {
    log::debug!("GET rates date={}", params.date);
    respond(Ok(state.engine.rates_for_date(params.date)))
}

pub async fn convert(State(state): State<AppState>, Query(params): Query<ConvertParams>) -> Response {
    log::debug!(
        "GET convert date={} {} {} -> {}",
        params.date,
        params.amount,
        params.source,
        params.target
    );
    respond(
        state
            .engine
            .convert_currency(params.date, &params.source, &params.target, params.amount),
    )
}

pub async fn highest_rate(State(state): State<AppState>, Query(params): Query<RangeParams>) -> Response {
    log::debug!(
        "GET highest_rate {} {}..={}",
        params.currency,
        params.start_date,
        params.end_date
    );
    respond(
        state
            .engine
            .highest_rate(params.start_date, params.end_date, &params.currency),
    )
}

pub async fn average_rate(State(state): State<AppState>, Query(params): Query<RangeParams>) -> Response {
    log::debug!(
        "GET average_rate {} {}..={}",
        params.currency,
        params.start_date,
        params.end_date
    );
    respond(
        state
            .engine
            .average_rate(params.start_date, params.end_date, &params.currency),
    )
}
