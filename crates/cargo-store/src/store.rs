use async_trait::async_trait;
use common::TrackingId;
use domain::{Cargo, HandlingEvent, HandlingHistory};

use crate::Result;

/// Storage for cargo aggregates.
///
/// Implementations own their concurrency: each call is atomic, and a cargo
/// read after an `upsert` reflects that write.
#[async_trait]
pub trait CargoRepository: Send + Sync {
    /// Inserts the cargo if its tracking ID is unknown, replaces it otherwise.
    ///
    /// The write only succeeds if the stored version still equals
    /// `cargo.version()` (`Version::initial()` for an unknown cargo);
    /// otherwise it fails with `ConcurrencyConflict`. The origin recorded on
    /// first insert is never overwritten. Returns the stored form at its new
    /// version.
    async fn upsert(&self, cargo: Cargo) -> Result<Cargo>;

    /// Fetches a cargo, failing with `CargoNotFound` if it is absent.
    async fn find(&self, tracking_id: &TrackingId) -> Result<Cargo>;

    /// Fetches every cargo, in no particular order.
    async fn find_all(&self) -> Result<Vec<Cargo>>;
}

/// Append-only storage for handling events.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Appends an event, returning the stored form.
    async fn store(&self, event: HandlingEvent) -> Result<HandlingEvent>;

    /// Returns the cargo's events ordered by completion time, oldest first.
    /// Events completed at the same instant keep their arrival order.
    async fn query_history(&self, tracking_id: &TrackingId) -> Result<HandlingHistory>;
}
