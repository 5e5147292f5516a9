//! Provider endpoint configuration.

use crate::http_client::DEFAULT_TIMEOUT_MS;
use crate::{Ticker, ValidationError, WindowMinutes};

pub const DEFAULT_AUTH_URL: &str = "http://20.244.56.144/evaluation-service/auth";
pub const DEFAULT_SERIES_URL: &str = "http://20.244.56.144/evaluation-service/stocks";

pub const AUTH_URL_ENV: &str = "TICKERCORR_AUTH_URL";
pub const SERIES_URL_ENV: &str = "TICKERCORR_SERIES_URL";
pub const TIMEOUT_MS_ENV: &str = "TICKERCORR_TIMEOUT_MS";

/// Upstream endpoints and the per-call timeout budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub auth_url: String,
    pub series_url: String,
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            auth_url: String::from(DEFAULT_AUTH_URL),
            series_url: String::from(DEFAULT_SERIES_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ProviderConfig {
    pub fn new(
        auth_url: impl Into<String>,
        series_url: impl Into<String>,
        timeout_ms: u64,
    ) -> Result<Self, ValidationError> {
        let config = Self {
            auth_url: auth_url.into(),
            series_url: series_url.into(),
            timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `TICKERCORR_*` environment variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        let defaults = Self::default();
        let timeout_ms = std::env::var(TIMEOUT_MS_ENV)
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(defaults.timeout_ms);

        Self::new(
            std::env::var(AUTH_URL_ENV).unwrap_or(defaults.auth_url),
            std::env::var(SERIES_URL_ENV).unwrap_or(defaults.series_url),
            timeout_ms,
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_url("auth_url", &self.auth_url)?;
        validate_url("series_url", &self.series_url)
    }

    /// `<series-url>/{ticker}?minutes={n}`
    pub fn series_endpoint(&self, ticker: &Ticker, window: WindowMinutes) -> String {
        format!(
            "{}/{}?minutes={}",
            self.series_url.trim_end_matches('/'),
            urlencoding::encode(ticker.as_str()),
            window
        )
    }
}

fn validate_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    if !has_scheme || trimmed.contains(char::is_whitespace) {
        return Err(ValidationError::InvalidUrl {
            field,
            value: value.to_owned(),
        });
    }
    Ok(())
}
