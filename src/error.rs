use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors surfaced by the transaction statistics service
#[derive(Debug, Error)]
pub enum StatsError {
    /// Transaction timestamp lies after the current instant
    #[error("transaction timestamp {timestamp} is in the future (now: {now})")]
    FutureTimestamp {
        /// Timestamp carried by the rejected transaction
        timestamp: DateTime<Utc>,
        /// Instant the admission check was made at
        now: DateTime<Utc>,
    },

    /// Transaction amount is NaN or infinite
    #[error("transaction amount must be a finite number, got {0}")]
    InvalidAmount(f64),

    /// Window configuration cannot be turned into a bucket ring
    #[error("invalid window configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// I/O failure while loading configuration or binding a listener
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StatsError {
    /// Whether the error was caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StatsError::FutureTimestamp { .. } | StatsError::InvalidAmount(_)
        )
    }
}

impl From<toml::de::Error> for StatsError {
    fn from(err: toml::de::Error) -> Self {
        StatsError::ConfigParse(err.to_string())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, StatsError>;
