//! Domain layer for the cargo booking system.
//!
//! This crate provides the pure cargo model:
//! - Route specifications and the routing/transport status enumerations
//! - Legs and itineraries, with adjacency enforced on construction
//! - Handling activities, events and the append-only handling history
//! - The delivery projection, a pure function of (spec, itinerary, last event)
//! - The cargo aggregate that keeps its delivery in step with every mutation
//!
//! Nothing here performs I/O; persistence and command orchestration live in
//! the `cargo-store` and `booking` crates.

pub mod cargo;

pub use cargo::{
    Cargo, CargoError, Delivery, HandlingActivity, HandlingEvent, HandlingEventType,
    HandlingHistory, Itinerary, Leg, RouteSpecification, RoutingStatus, TransportStatus,
};
pub use common::{TrackingId, UnLocode, Version, VoyageNumber};
