//! Series source trait and fetch error types.
//!
//! [`SeriesSource`] is the seam between the query service and the upstream
//! provider. [`crate::PriceFetcher`] is the production implementation; tests
//! substitute in-memory sources.
//!
//! # Error taxonomy
//!
//! | Kind | Meaning | Caller guidance |
//! |------|---------|-----------------|
//! | [`FetchErrorKind::NotFound`] | No data, empty or unrecognized body | try a different ticker/window |
//! | [`FetchErrorKind::TransientFailure`] | Auth, transport or upstream failure | try again later |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{PriceSeries, Ticker, WindowMinutes};

/// Classification of a failed series fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    NotFound,
    TransientFailure,
}

/// Structured fetch failure returned to the query service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
}

impl FetchError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::TransientFailure,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, FetchErrorKind::NotFound)
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::NotFound => "fetch.not_found",
            FetchErrorKind::TransientFailure => "fetch.transient",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FetchError {}

/// Anything that can produce a price series for a ticker and window.
pub trait SeriesSource: Send + Sync {
    fn fetch_series<'a>(
        &'a self,
        ticker: &'a Ticker,
        window: WindowMinutes,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, FetchError>> + Send + 'a>>;
}
