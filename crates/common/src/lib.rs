//! Identifiers shared by every crate of the cargo booking system.

mod types;

pub use types::{TrackingId, UnLocode, Version, VoyageNumber};
