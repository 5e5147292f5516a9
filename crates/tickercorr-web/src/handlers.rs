use axum::extract::{Query, State};
use axum::Json;
use serde_json::{json, Value};
use tickercorr_core::{AverageQuery, CorrelationQuery, PairCorrelation, TickerAverage};

use crate::error::ApiError;
use crate::AppState;

/// `GET /stocks/ticker?ticker=&minutes=&aggregation=average`
pub async fn ticker_average(
    State(state): State<AppState>,
    Query(query): Query<AverageQuery>,
) -> Result<Json<TickerAverage>, ApiError> {
    let result = state.service.ticker_average(&query).await?;
    Ok(Json(result))
}

/// `GET /stocks/stockcorrelation?ticker=&ticker2=&minutes=`
pub async fn stock_correlation(
    State(state): State<AppState>,
    Query(query): Query<CorrelationQuery>,
) -> Result<Json<PairCorrelation>, ApiError> {
    let result = state.service.pairwise_correlation(&query).await?;
    Ok(Json(result))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
