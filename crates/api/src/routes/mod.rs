//! HTTP route handlers.

pub mod cargos;
pub mod handling;
pub mod health;
pub mod metrics;

use booking::BookingService;
use cargo_store::{CargoRepository, EventRepository};

/// Shared application state accessible from all handlers.
pub struct AppState<C, E> {
    pub booking: BookingService<C, E>,
}

impl<C: CargoRepository, E: EventRepository> AppState<C, E> {
    /// Creates the state around a booking service over the given repositories.
    pub fn new(cargos: C, events: E) -> Self {
        Self {
            booking: BookingService::new(cargos, events),
        }
    }
}
