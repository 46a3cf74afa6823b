//! Cargo aggregate and the value types it is built from.

mod aggregate;
mod delivery;
mod handling;
mod itinerary;
mod route;

pub use aggregate::Cargo;
pub use delivery::Delivery;
pub use handling::{HandlingActivity, HandlingEvent, HandlingEventType, HandlingHistory};
pub use itinerary::{Itinerary, Leg};
pub use route::{RouteSpecification, RoutingStatus, TransportStatus};

use common::{UnLocode, VoyageNumber};
use thiserror::Error;

/// Errors raised when constructing or querying cargo value types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CargoError {
    /// The handling history holds no events.
    #[error("Handling history is empty")]
    EmptyHistory,

    /// A required location was empty.
    #[error("Location is required")]
    LocationRequired,

    /// A leg has no voyage number.
    #[error("Leg {index} has no voyage number")]
    LegWithoutVoyage { index: usize },

    /// A leg loads and unloads at the same place.
    #[error("Leg on voyage {voyage} loads and unloads at {location}")]
    LegGoesNowhere {
        voyage: VoyageNumber,
        location: UnLocode,
    },

    /// A leg unloads before it loads.
    #[error("Leg on voyage {voyage} unloads before it loads")]
    LegUnloadsBeforeLoad { voyage: VoyageNumber },

    /// Two consecutive legs do not meet at the same location.
    #[error("Leg {index} unloads at {unload} but the next leg loads at {next_load}")]
    DisconnectedLegs {
        index: usize,
        unload: UnLocode,
        next_load: UnLocode,
    },

    /// A leg departs before the previous leg arrives.
    #[error("Leg {index} departs before the previous leg arrives")]
    OverlappingLegs { index: usize },

    /// A load or unload activity was given without a voyage.
    #[error("{event_type} requires a voyage number")]
    VoyageRequired { event_type: HandlingEventType },

    /// A receive, claim or customs activity was given a voyage.
    #[error("{event_type} must not carry a voyage number")]
    UnexpectedVoyage { event_type: HandlingEventType },

    /// `NotHandled` was used as a real activity.
    #[error("Not Handled is not a recordable activity")]
    NotRecordable,

    /// An event type ordinal outside the known range.
    #[error("Unknown handling event type: {0}")]
    UnknownEventType(i32),
}
