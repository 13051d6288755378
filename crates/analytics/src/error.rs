use thiserror::Error;

use shoplytics_core::DomainError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("invalid analytics config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Store(#[from] DomainError),
}
