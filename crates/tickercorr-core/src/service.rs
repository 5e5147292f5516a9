//! Ticker-average and pairwise-correlation operations.
//!
//! Raw query parameters are validated here before any upstream call. The
//! routing layer only has to deserialize the query string into
//! [`AverageQuery`] / [`CorrelationQuery`] and map [`ServiceError`] to a
//! response status.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::aggregation::{self, Correlation, CorrelationStrength};
use crate::series_source::{FetchError, FetchErrorKind, SeriesSource};
use crate::{AggregationError, PricePoint, Ticker, ValidationError, WindowMinutes};

const SUPPORTED_AGGREGATION: &str = "average";

/// Raw `ticker average` parameters, as they arrive in a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AverageQuery {
    pub ticker: Option<String>,
    pub minutes: Option<String>,
    pub aggregation: Option<String>,
}

/// Raw `pairwise correlation` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CorrelationQuery {
    pub ticker: Option<String>,
    pub ticker2: Option<String>,
    pub minutes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerAverage {
    pub average_price: f64,
    pub data: Vec<PricePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub avg_price: f64,
    pub price_history: Vec<PricePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairCorrelation {
    /// `null` when either series has zero variance.
    pub correlation: Correlation,
    pub correlation_strength: Option<CorrelationStrength>,
    /// Keyed by each ticker as the caller spelled it (trimmed).
    pub stocks: BTreeMap<String, StockSummary>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),
    #[error("{0}")]
    NotFound(FetchError),
    #[error("{0}")]
    Upstream(FetchError),
    #[error("aggregation failed: {0}")]
    Aggregation(#[from] AggregationError),
}

impl From<FetchError> for ServiceError {
    fn from(error: FetchError) -> Self {
        match error.kind() {
            FetchErrorKind::NotFound => Self::NotFound(error),
            FetchErrorKind::TransientFailure => Self::Upstream(error),
        }
    }
}

impl ServiceError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "input.invalid",
            Self::NotFound(_) => "data.not_found",
            Self::Upstream(_) => "upstream.failure",
            Self::Aggregation(_) => "aggregation.failure",
        }
    }
}

/// Validated `ticker average` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AverageRequest {
    pub ticker: Ticker,
    pub window: WindowMinutes,
}

impl AverageRequest {
    pub fn from_query(query: &AverageQuery) -> Result<Self, ValidationError> {
        let ticker = required_ticker("ticker", query.ticker.as_deref())?;
        let window = required_window(query.minutes.as_deref())?;

        if let Some(aggregation) = query.aggregation.as_deref() {
            if aggregation.trim() != SUPPORTED_AGGREGATION {
                return Err(ValidationError::InvalidAggregation {
                    value: aggregation.to_owned(),
                });
            }
        }

        Ok(Self { ticker, window })
    }
}

/// Validated `pairwise correlation` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationRequest {
    pub first: Ticker,
    pub second: Ticker,
    pub window: WindowMinutes,
    /// Response keys for `first` and `second`.
    pub labels: [String; 2],
}

impl CorrelationRequest {
    pub fn from_query(query: &CorrelationQuery) -> Result<Self, ValidationError> {
        let first = required_ticker("ticker", query.ticker.as_deref())?;
        let second = required_ticker("ticker2", query.ticker2.as_deref())?;
        let window = required_window(query.minutes.as_deref())?;
        let labels = [label(query.ticker.as_deref()), label(query.ticker2.as_deref())];
        Ok(Self {
            first,
            second,
            window,
            labels,
        })
    }
}

fn required_ticker(field: &'static str, raw: Option<&str>) -> Result<Ticker, ValidationError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Ticker::parse(value),
        None => Err(ValidationError::MissingParameter { field }),
    }
}

fn label(raw: Option<&str>) -> String {
    raw.map(str::trim).unwrap_or_default().to_owned()
}

fn required_window(raw: Option<&str>) -> Result<WindowMinutes, ValidationError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => WindowMinutes::parse(value),
        None => Err(ValidationError::MissingParameter { field: "minutes" }),
    }
}

/// Runs both operations against a shared [`SeriesSource`].
#[derive(Clone)]
pub struct QueryService {
    source: Arc<dyn SeriesSource>,
}

impl QueryService {
    pub fn new(source: Arc<dyn SeriesSource>) -> Self {
        Self { source }
    }

    pub async fn ticker_average(&self, query: &AverageQuery) -> Result<TickerAverage, ServiceError> {
        let request = AverageRequest::from_query(query)?;
        self.average(&request).await
    }

    pub async fn average(&self, request: &AverageRequest) -> Result<TickerAverage, ServiceError> {
        let series = self
            .source
            .fetch_series(&request.ticker, request.window)
            .await?;
        let average_price = series.average();
        info!(ticker = %request.ticker, window = %request.window, samples = series.len(), average_price, "ticker average computed");

        Ok(TickerAverage {
            average_price,
            data: series.into_points(),
        })
    }

    pub async fn pairwise_correlation(
        &self,
        query: &CorrelationQuery,
    ) -> Result<PairCorrelation, ServiceError> {
        let request = CorrelationRequest::from_query(query)?;
        self.correlate(&request).await
    }

    /// Both series are fetched concurrently; the first failure fails the
    /// whole request. Series of different lengths are rejected with
    /// [`AggregationError::LengthMismatch`].
    pub async fn correlate(
        &self,
        request: &CorrelationRequest,
    ) -> Result<PairCorrelation, ServiceError> {
        let (first, second) = tokio::try_join!(
            self.source.fetch_series(&request.first, request.window),
            self.source.fetch_series(&request.second, request.window),
        )?;

        let correlation = aggregation::correlation(&first.prices(), &second.prices())
            .inspect_err(|error| {
                warn!(
                    first = %request.first,
                    second = %request.second,
                    %error,
                    "series cannot be paired"
                );
            })?;
        info!(
            first = %request.first,
            second = %request.second,
            window = %request.window,
            %correlation,
            "pairwise correlation computed"
        );

        let mut stocks = BTreeMap::new();
        for (key, series) in request.labels.iter().cloned().zip([first, second]) {
            let summary = StockSummary {
                avg_price: series.average(),
                price_history: series.into_points(),
            };
            stocks.insert(key, summary);
        }

        Ok(PairCorrelation {
            correlation,
            correlation_strength: correlation.strength(),
            stocks,
        })
    }
}
