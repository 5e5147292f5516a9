//! # Domain Models
//!
//! Validated request parameters and price data shared by the fetcher, the
//! aggregation engine and the query service.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Validated, upper-cased stock symbol |
//! | [`WindowMinutes`] | Positive lookback window in minutes |
//! | [`PricePoint`] | One price sample |
//! | [`PriceSeries`] | Non-empty ordered samples for one ticker/window |

mod series;
mod ticker;
mod window;

pub use series::{PricePoint, PriceSeries};
pub use ticker::Ticker;
pub use window::WindowMinutes;
