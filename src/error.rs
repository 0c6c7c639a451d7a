use thiserror::Error;

use crate::config::ConfigurationError;

/// Errors surfaced by the analysis layer.
///
/// Store failures are propagated unchanged; nothing here retries or falls back
/// to partial results.
#[derive(Debug, Error)]
pub enum TrendError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl TrendError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True when the failure came from the data-access layer.
    pub fn is_database_error(&self) -> bool {
        matches!(self, TrendError::Database(_) | TrendError::Migration(_))
    }
}

pub type Result<T> = std::result::Result<T, TrendError>;
