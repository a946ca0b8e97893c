use rust_decimal::Decimal;
use sea_orm::error::DbErr;
use sea_orm::TransactionError;
use thiserror::Error;

/// Error taxonomy for all service operations.
///
/// Every multi-row mutation is transactional: an error of any kind means
/// no partial state was committed and the caller may retry after fixing
/// the input.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or out-of-range input, caught before any write.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A stock decrease would drive a position negative. Carries the
    /// quantity actually available so callers can display it.
    #[error("Insufficient stock, available: {available}")]
    InsufficientStock { available: Decimal },

    /// Requested lifecycle transition is not legal from the current status.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Referenced entity does not exist or is soft-deleted.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A concurrent writer updated the same stock position first; the
    /// whole operation was rolled back and can be retried.
    #[error("Concurrent modification of stock position {0}")]
    ConcurrentModification(i64),

    /// Event dispatch failed after the transaction committed.
    #[error("Event error: {0}")]
    EventError(String),

    /// Opaque persistence-layer failure; always rolls the transaction back.
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl ServiceError {
    /// Generic constructor that normalizes any supported database error input.
    pub fn db_error(error: impl Into<DbErr>) -> Self {
        ServiceError::DatabaseError(error.into())
    }

    /// Stable machine-checkable kind, independent of the display message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "validation",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::InvalidState(_) => "invalid_state",
            Self::NotFound(_) => "not_found",
            Self::ConcurrentModification(_) => "concurrent_modification",
            Self::EventError(_) => "event",
            Self::DatabaseError(_) => "database",
            Self::Other(_) => "other",
        }
    }
}

impl From<TransactionError<ServiceError>> for ServiceError {
    fn from(err: TransactionError<ServiceError>) -> Self {
        match err {
            TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
            TransactionError::Transaction(service_err) => service_err,
        }
    }
}
