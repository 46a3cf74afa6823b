//! Repositories consumed by the booking service.
//!
//! [`CargoRepository`] and [`EventRepository`] are the storage contracts;
//! this crate ships an in-memory implementation of each (used by tests and
//! by the binary when no database is configured) and a PostgreSQL one.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use error::{RepositoryError, Result};
pub use memory::{InMemoryCargoRepository, InMemoryEventRepository};
pub use postgres::{PostgresCargoRepository, PostgresEventRepository, run_migrations};
pub use store::{CargoRepository, EventRepository};
