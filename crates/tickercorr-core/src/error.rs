use thiserror::Error;

/// Validation errors for request parameters and configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("query parameter '{field}' is required")]
    MissingParameter { field: &'static str },

    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error("minutes must be a positive integer: '{value}'")]
    InvalidMinutes { value: String },

    #[error("invalid aggregation type '{value}', expected 'average'")]
    InvalidAggregation { value: String },

    #[error("missing required credential fields: {}", fields.join(", "))]
    MissingCredentials { fields: Vec<&'static str> },

    #[error("invalid provider url for '{field}': '{value}'")]
    InvalidUrl { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the request parameter this error refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingParameter { field } => Some(*field),
            Self::EmptyTicker
            | Self::TickerTooLong { .. }
            | Self::TickerInvalidChar { .. } => Some("ticker"),
            Self::InvalidMinutes { .. } => Some("minutes"),
            Self::InvalidAggregation { .. } => Some("aggregation"),
            Self::MissingCredentials { .. } | Self::InvalidUrl { .. } => None,
        }
    }
}

/// Input errors rejected by the aggregation engine.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AggregationError {
    #[error("series must contain at least one price")]
    EmptySeries,
    #[error("series lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}
