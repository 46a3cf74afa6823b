//! Booking service errors.

use cargo_store::RepositoryError;
use common::TrackingId;
use domain::CargoError;
use thiserror::Error;

/// Errors surfaced by booking commands. None are retried; a command that
/// lost a race on the same cargo fails with
/// `Storage(RepositoryError::ConcurrencyConflict { .. })` and may be reissued.
#[derive(Debug, Error)]
pub enum BookingError {
    /// A required field was empty, the deadline was zero or a value broke a
    /// domain rule.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No cargo with this tracking ID.
    #[error("Cargo not found: {0}")]
    NotFound(TrackingId),

    /// The repository failed.
    #[error("Storage error: {0}")]
    Storage(RepositoryError),
}

impl BookingError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<RepositoryError> for BookingError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::CargoNotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

impl From<CargoError> for BookingError {
    fn from(e: CargoError) -> Self {
        Self::InvalidArgument(e.to_string())
    }
}

/// Result type for booking commands.
pub type Result<T> = std::result::Result<T, BookingError>;
