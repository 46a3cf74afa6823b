use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{TrackingId, Version};
use domain::{Cargo, HandlingEvent, HandlingHistory, RouteSpecification};
use tokio::sync::RwLock;

use crate::{
    RepositoryError, Result,
    store::{CargoRepository, EventRepository},
};

/// In-memory cargo repository.
///
/// Provides the same interface as the PostgreSQL implementation. Each call
/// takes the lock once, so an `upsert` is never observed half-applied.
#[derive(Clone, Default)]
pub struct InMemoryCargoRepository {
    cargos: Arc<RwLock<HashMap<TrackingId, Cargo>>>,
}

impl InMemoryCargoRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored cargos.
    pub async fn cargo_count(&self) -> usize {
        self.cargos.read().await.len()
    }

    /// Removes every cargo.
    pub async fn clear(&self) {
        self.cargos.write().await.clear();
    }
}

#[async_trait]
impl CargoRepository for InMemoryCargoRepository {
    async fn upsert(&self, cargo: Cargo) -> Result<Cargo> {
        let mut cargos = self.cargos.write().await;
        let existing = cargos.get(cargo.tracking_id());

        let actual = existing.map_or(Version::initial(), Cargo::version);
        if actual != cargo.version() {
            return Err(RepositoryError::ConcurrencyConflict {
                tracking_id: cargo.tracking_id().clone(),
                expected: cargo.version(),
                actual,
            });
        }

        let origin = match existing {
            Some(existing) if existing.origin() != cargo.origin() => {
                tracing::warn!(
                    tracking_id = %cargo.tracking_id(),
                    "ignoring origin change on upsert"
                );
                existing.origin().clone()
            }
            _ => cargo.origin().clone(),
        };

        let spec = cargo.route_specification();
        let stored = Cargo::restore(
            cargo.tracking_id().clone(),
            origin.clone(),
            RouteSpecification::new(origin, spec.destination.clone(), spec.arrival_deadline),
            cargo.itinerary().clone(),
            cargo.delivery().last_event.clone(),
            actual.next(),
        );

        cargos.insert(stored.tracking_id().clone(), stored.clone());
        Ok(stored)
    }

    async fn find(&self, tracking_id: &TrackingId) -> Result<Cargo> {
        self.cargos
            .read()
            .await
            .get(tracking_id)
            .cloned()
            .ok_or_else(|| RepositoryError::CargoNotFound(tracking_id.clone()))
    }

    async fn find_all(&self) -> Result<Vec<Cargo>> {
        Ok(self.cargos.read().await.values().cloned().collect())
    }
}

/// In-memory handling event log.
#[derive(Clone, Default)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<Vec<HandlingEvent>>>,
}

impl InMemoryEventRepository {
    /// Creates a new empty event log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of events stored.
    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn store(&self, event: HandlingEvent) -> Result<HandlingEvent> {
        self.events.write().await.push(event.clone());
        Ok(event)
    }

    async fn query_history(&self, tracking_id: &TrackingId) -> Result<HandlingHistory> {
        let store = self.events.read().await;
        let mut events: Vec<_> = store
            .iter()
            .filter(|e| &e.tracking_id == tracking_id)
            .cloned()
            .collect();
        // Stable: ties keep arrival order.
        events.sort_by_key(|e| e.completed_at);
        Ok(HandlingHistory::new(events))
    }
}
