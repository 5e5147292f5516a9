//! # Tickercorr Core
//!
//! Credentialed price fetching and statistics for the tickercorr service.
//!
//! ## Overview
//!
//! This crate provides everything below the HTTP routing layer:
//!
//! - **Validated domain types** for tickers, time windows and price series
//! - **Credentialed fetcher** that exchanges client credentials for a bearer
//!   token, caches it process-wide and refreshes it once on a 401
//! - **Payload normalization** over the provider's inconsistent envelopes
//! - **Aggregation engine** for means and Pearson correlation
//! - **Query service** implementing the ticker-average and
//!   pairwise-correlation operations
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`aggregation`] | Mean, standard deviation, covariance, correlation |
//! | [`config`] | Provider endpoints and timeout |
//! | [`credentials`] | Client credential set loaded from the environment |
//! | [`domain`] | Domain models (Ticker, WindowMinutes, PriceSeries) |
//! | [`error`] | Validation and aggregation error types |
//! | [`fetcher`] | Credentialed series fetcher |
//! | [`http_client`] | HTTP client abstraction |
//! | [`payload`] | Series body normalization |
//! | [`series_source`] | Series source trait and fetch errors |
//! | [`service`] | Query operations |
//! | [`token_cache`] | Shared bearer token slot |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickercorr_core::{
//!     AverageQuery, CredentialSet, PriceFetcher, ProviderConfig, QueryService, ReqwestHttpClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = PriceFetcher::new(
//!         Arc::new(ReqwestHttpClient::new()),
//!         CredentialSet::from_env(),
//!         ProviderConfig::from_env()?,
//!     );
//!     let service = QueryService::new(Arc::new(fetcher));
//!
//!     let query = AverageQuery {
//!         ticker: Some("NVDA".into()),
//!         minutes: Some("50".into()),
//!         aggregation: Some("average".into()),
//!     };
//!     let result = service.ticker_average(&query).await?;
//!     println!("NVDA average: {:.2}", result.average_price);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Web / CLI      │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Query Service  │────▶│ Aggregation      │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Series Source   │────▶│ Token Cache      │
//! │ (PriceFetcher)  │     └──────────────────┘
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ HTTP Client     │
//! │ (reqwest)       │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Fetch failures carry a kind the caller can branch on:
//!
//! ```rust
//! use tickercorr_core::{FetchError, FetchErrorKind};
//!
//! fn handle_error(error: FetchError) {
//!     match error.kind() {
//!         FetchErrorKind::NotFound => {
//!             // Report to user
//!         }
//!         FetchErrorKind::TransientFailure => {
//!             // Try again later
//!         }
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - Credentials are read from environment variables only (never logged)
//! - Bearer tokens and secrets are redacted from `Debug` output

pub mod aggregation;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod payload;
pub mod series_source;
pub mod service;
pub mod token_cache;

// Aggregation engine
pub use aggregation::{Correlation, CorrelationStrength};

// Configuration
pub use config::ProviderConfig;
pub use credentials::CredentialSet;

// Domain models
pub use domain::{PricePoint, PriceSeries, Ticker, WindowMinutes};

// Error types
pub use error::{AggregationError, ValidationError};

// Fetcher
pub use fetcher::PriceFetcher;

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpErrorKind, HttpMethod, HttpRequest, HttpResponse,
    ReqwestHttpClient,
};

// Payload normalization
pub use payload::{NormalizedPayload, PayloadError};

// Series source trait and errors
pub use series_source::{FetchError, FetchErrorKind, SeriesSource};

// Query service
pub use service::{
    AverageQuery, AverageRequest, CorrelationQuery, CorrelationRequest, PairCorrelation,
    QueryService, ServiceError, StockSummary, TickerAverage,
};

// Token cache
pub use token_cache::{BearerToken, CachedToken, TokenCache};
