use thiserror::Error;
use tickercorr_core::ServiceError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tickercorr_core::ValidationError),

    #[error(transparent)]
    Query(#[from] ServiceError),

    #[error(transparent)]
    Server(#[from] tickercorr_web::ServerError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Query(ServiceError::InvalidInput(_)) => 2,
            Self::Query(ServiceError::NotFound(_)) => 3,
            Self::Query(ServiceError::Upstream(_) | ServiceError::Aggregation(_)) => 5,
            Self::Serialization(_) => 4,
            Self::Server(_) => 6,
            Self::Io(_) => 10,
        }
    }
}
