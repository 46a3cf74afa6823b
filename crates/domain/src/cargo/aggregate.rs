//! Cargo aggregate implementation.

use common::{TrackingId, UnLocode, Version};

use super::{Delivery, HandlingEvent, HandlingHistory, Itinerary, RouteSpecification};

/// Cargo aggregate root.
///
/// Owns its route specification, itinerary and delivery by value. After
/// every mutation `delivery` equals
/// `Delivery::derive(route_specification, itinerary, delivery.last_event)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cargo {
    tracking_id: TrackingId,

    /// Origin at booking time; never changes.
    origin: UnLocode,

    route_specification: RouteSpecification,
    itinerary: Itinerary,
    delivery: Delivery,

    /// Stored revision this cargo was loaded at.
    version: Version,
}

impl Cargo {
    /// Creates a new, unrouted cargo.
    pub fn new(tracking_id: TrackingId, route_specification: RouteSpecification) -> Self {
        let itinerary = Itinerary::empty();
        let delivery = Delivery::derive(&route_specification, &itinerary, None);

        Self {
            tracking_id,
            origin: route_specification.origin.clone(),
            route_specification,
            itinerary,
            delivery,
            version: Version::initial(),
        }
    }

    /// Rebuilds a stored cargo at `version`, deriving its delivery from the
    /// persisted last handling event.
    pub fn restore(
        tracking_id: TrackingId,
        origin: UnLocode,
        route_specification: RouteSpecification,
        itinerary: Itinerary,
        last_event: Option<HandlingEvent>,
        version: Version,
    ) -> Self {
        let delivery = Delivery::derive(&route_specification, &itinerary, last_event.as_ref());

        Self {
            tracking_id,
            origin,
            route_specification,
            itinerary,
            delivery,
            version,
        }
    }
}

// Query methods
impl Cargo {
    /// Returns the tracking ID.
    pub fn tracking_id(&self) -> &TrackingId {
        &self.tracking_id
    }

    /// Returns the origin recorded at booking.
    pub fn origin(&self) -> &UnLocode {
        &self.origin
    }

    /// Returns the current route specification.
    pub fn route_specification(&self) -> &RouteSpecification {
        &self.route_specification
    }

    /// Returns the assigned itinerary (possibly empty).
    pub fn itinerary(&self) -> &Itinerary {
        &self.itinerary
    }

    /// Returns the latest delivery snapshot.
    pub fn delivery(&self) -> &Delivery {
        &self.delivery
    }

    /// Returns the stored version; `Version::initial()` if never stored.
    pub fn version(&self) -> Version {
        self.version
    }
}

// Command methods
impl Cargo {
    /// Attaches a new itinerary and re-derives the delivery.
    pub fn assign_to_route(&mut self, itinerary: Itinerary) {
        self.delivery = self
            .delivery
            .update_on_routing(&self.route_specification, &itinerary);
        self.itinerary = itinerary;
    }

    /// Replaces the route specification and re-derives the delivery.
    ///
    /// The caller must carry `origin` forward into the new specification.
    pub fn specify_new_route(&mut self, route_specification: RouteSpecification) {
        debug_assert_eq!(
            route_specification.origin, self.origin,
            "origin must be preserved across route changes"
        );
        self.delivery = self
            .delivery
            .update_on_routing(&route_specification, &self.itinerary);
        self.route_specification = route_specification;
    }

    /// Re-derives the delivery from the cargo's handling history.
    pub fn derive_delivery_progress(&mut self, history: &HandlingHistory) {
        self.delivery =
            Delivery::derive_from_history(&self.route_specification, &self.itinerary, history);
    }
}
