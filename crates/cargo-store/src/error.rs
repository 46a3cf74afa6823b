use common::{TrackingId, Version};
use domain::CargoError;
use thiserror::Error;

/// Errors that can occur when interacting with a repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No cargo is stored under the tracking ID.
    #[error("Cargo not found: {0}")]
    CargoNotFound(TrackingId),

    /// The cargo was changed by someone else since it was loaded.
    #[error(
        "Concurrency conflict for cargo {tracking_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        tracking_id: TrackingId,
        expected: Version,
        actual: Version,
    },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored record no longer satisfies the domain invariants.
    #[error("Corrupt record for cargo {tracking_id}: {source}")]
    Corrupt {
        tracking_id: TrackingId,
        #[source]
        source: CargoError,
    },
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
