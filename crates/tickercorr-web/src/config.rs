//! Listener and CORS configuration.

use std::net::SocketAddr;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::error::ServerError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

pub const HOST_ENV: &str = "TICKERCORR_HOST";
pub const PORT_ENV: &str = "PORT";
pub const CORS_ORIGINS_ENV: &str = "TICKERCORR_CORS_ORIGINS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
            cors_origins: vec![String::from(DEFAULT_CORS_ORIGIN)],
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `TICKERCORR_HOST`, `PORT` and
    /// `TICKERCORR_CORS_ORIGINS` (comma separated).
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerError> {
        let mut config = Self::default();

        if let Some(host) = lookup(HOST_ENV).filter(|value| !value.trim().is_empty()) {
            config.host = host.trim().to_owned();
        }

        if let Some(raw) = lookup(PORT_ENV).filter(|value| !value.trim().is_empty()) {
            config.port = parse_port(&raw)?;
        }

        if let Some(raw) = lookup(CORS_ORIGINS_ENV) {
            let origins = raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_owned)
                .collect::<Vec<_>>();
            if !origins.is_empty() {
                config.cors_origins = origins;
            }
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| ServerError::InvalidAddress { value: raw })
    }

    /// Allow GET/POST from the configured origins only.
    pub fn cors_layer(&self) -> Result<CorsLayer, ServerError> {
        let origins = self
            .cors_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ServerError::InvalidOrigin {
                    value: origin.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any))
    }
}

pub fn parse_port(raw: &str) -> Result<u16, ServerError> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ServerError::InvalidPort {
            value: raw.to_owned(),
        }),
    }
}
