use serde::{Deserialize, Serialize};

use crate::aggregation;
use crate::{AggregationError, Ticker, WindowMinutes};

/// A single price sample. Position in the owning series carries the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: f64,
}

impl PricePoint {
    pub const fn new(price: f64) -> Self {
        Self { price }
    }
}

/// Chronologically ordered, non-empty price samples for one ticker and window.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    ticker: Ticker,
    window: WindowMinutes,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(
        ticker: Ticker,
        window: WindowMinutes,
        points: Vec<PricePoint>,
    ) -> Result<Self, AggregationError> {
        if points.is_empty() {
            return Err(AggregationError::EmptySeries);
        }

        Ok(Self {
            ticker,
            window,
            points,
        })
    }

    pub fn from_prices(
        ticker: Ticker,
        window: WindowMinutes,
        prices: impl IntoIterator<Item = f64>,
    ) -> Result<Self, AggregationError> {
        Self::new(ticker, window, prices.into_iter().map(PricePoint::new).collect())
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub const fn window(&self) -> WindowMinutes {
        self.window
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.price).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Arithmetic mean of the series. Total because the series is never empty.
    pub fn average(&self) -> f64 {
        aggregation::mean(&self.prices()).unwrap_or_default()
    }

    pub fn into_points(self) -> Vec<PricePoint> {
        self.points
    }
}
