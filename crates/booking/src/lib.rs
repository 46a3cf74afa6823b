//! Booking service for the cargo shipping system.
//!
//! Commands are thin orchestrators: validate the input eagerly, fetch the
//! cargo, call one aggregate operation and persist it with a single upsert.

mod error;
mod service;
mod view;

pub use error::{BookingError, Result};
pub use service::BookingService;
pub use view::CargoView;
