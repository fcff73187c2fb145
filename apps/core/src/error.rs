use thiserror::Error;

/// Crate-wide error type for the ambient surfaces (configuration, export).
///
/// Classification and anchor extraction never fail; they degrade to
/// `Stage::Unknown` and a fallback `AnchorPack` instead.
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// Represents data validation errors (e.g., a tunable out of range).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., an unparsable environment variable).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents failures while serializing an analysis for collaborators.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
