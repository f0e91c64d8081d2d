//! Store Error Types

use memberhub_core::MemberhubError;
use thiserror::Error;
use tokio_postgres::error::SqlState;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Query error: {0}")]
    Query(tokio_postgres::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable code surfaced to API clients
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::UniqueViolation(_) => "CONFLICT",
            Self::ForeignKeyViolation(_) => "INVALID_REFERENCE",
            _ => "STORE_ERROR",
        }
    }
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        let constraint = err
            .as_db_error()
            .and_then(|db| db.constraint())
            .unwrap_or("unknown")
            .to_string();

        match err.code() {
            Some(code) if *code == SqlState::UNIQUE_VIOLATION => Self::UniqueViolation(constraint),
            Some(code) if *code == SqlState::FOREIGN_KEY_VIOLATION => {
                Self::ForeignKeyViolation(constraint)
            }
            _ => Self::Query(err),
        }
    }
}

impl From<StoreError> for MemberhubError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => MemberhubError::NotFound(err.to_string()),
            StoreError::Configuration(msg) => MemberhubError::Config(msg),
            StoreError::Pool(msg) => MemberhubError::Unavailable(msg),
            other => MemberhubError::Database(other.to_string()),
        }
    }
}
