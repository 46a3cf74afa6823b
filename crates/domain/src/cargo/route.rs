//! Route specification and the derived status enumerations.

use chrono::{DateTime, Utc};
use common::UnLocode;
use serde::{Deserialize, Serialize};

use super::Itinerary;

/// The customer's requirement for a cargo: where it starts, where it must
/// end up, and by when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpecification {
    /// Port the cargo departs from.
    pub origin: UnLocode,

    /// Port the cargo must be delivered to.
    pub destination: UnLocode,

    /// Latest acceptable arrival.
    pub arrival_deadline: DateTime<Utc>,
}

impl RouteSpecification {
    /// Creates a new route specification.
    pub fn new(
        origin: impl Into<UnLocode>,
        destination: impl Into<UnLocode>,
        arrival_deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            arrival_deadline,
        }
    }

    /// Returns true if the itinerary starts at the origin and ends at the
    /// destination. The arrival deadline is not checked.
    pub fn is_satisfied_by(&self, itinerary: &Itinerary) -> bool {
        !itinerary.is_empty()
            && itinerary.initial_departure_location() == Some(&self.origin)
            && itinerary.final_arrival_location() == Some(&self.destination)
    }
}

/// Whether a cargo has an itinerary and whether it fits the specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RoutingStatus {
    /// No itinerary assigned.
    #[default]
    NotRouted,

    /// The itinerary does not satisfy the route specification.
    Misrouted,

    /// The itinerary satisfies the route specification.
    Routed,
}

impl RoutingStatus {
    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingStatus::NotRouted => "Not routed",
            RoutingStatus::Misrouted => "Misrouted",
            RoutingStatus::Routed => "Routed",
        }
    }
}

impl std::fmt::Display for RoutingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the cargo physically is, as far as the last handling event tells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TransportStatus {
    /// Not yet received at the origin.
    #[default]
    NotReceived,

    /// Sitting in a port.
    InPort,

    /// Loaded on a carrier.
    OnboardCarrier,

    /// Claimed by the consignee (terminal).
    Claimed,

    /// Catch-all for a handling type outside the known set. Every
    /// [`HandlingEventType`](super::HandlingEventType) maps elsewhere.
    Unknown,
}

impl TransportStatus {
    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportStatus::NotReceived => "Not received",
            TransportStatus::InPort => "In port",
            TransportStatus::OnboardCarrier => "Onboard carrier",
            TransportStatus::Claimed => "Claimed",
            TransportStatus::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for TransportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cargo::Leg;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap()
    }

    fn spec() -> RouteSpecification {
        RouteSpecification::new("IDJKT", "IDSLO", at(10))
    }

    fn leg(voyage: &str, from: &str, to: &str, load: u32, unload: u32) -> Leg {
        Leg::new(voyage, from, to, at(load), at(unload)).unwrap()
    }

    #[test]
    fn satisfied_by_itinerary_with_matching_endpoints() {
        let itinerary = Itinerary::new(vec![
            leg("V1", "IDJKT", "IDBDG", 1, 2),
            leg("V1", "IDBDG", "IDSLO", 3, 4),
        ])
        .unwrap();

        assert!(spec().is_satisfied_by(&itinerary));
    }

    #[test]
    fn not_satisfied_by_empty_itinerary() {
        assert!(!spec().is_satisfied_by(&Itinerary::empty()));
    }

    #[test]
    fn not_satisfied_when_destination_differs() {
        let itinerary = Itinerary::new(vec![leg("V1", "IDJKT", "IDBDG", 1, 2)]).unwrap();
        assert!(!spec().is_satisfied_by(&itinerary));
    }

    #[test]
    fn not_satisfied_when_origin_differs() {
        let itinerary = Itinerary::new(vec![leg("V1", "IDBDG", "IDSLO", 1, 2)]).unwrap();
        assert!(!spec().is_satisfied_by(&itinerary));
    }

    #[test]
    fn deadline_is_not_enforced() {
        let itinerary = Itinerary::new(vec![leg("V1", "IDJKT", "IDSLO", 20, 25)]).unwrap();
        assert!(spec().is_satisfied_by(&itinerary));
    }

    #[test]
    fn status_display() {
        assert_eq!(RoutingStatus::NotRouted.to_string(), "Not routed");
        assert_eq!(RoutingStatus::Misrouted.to_string(), "Misrouted");
        assert_eq!(TransportStatus::OnboardCarrier.to_string(), "Onboard carrier");
        assert_eq!(TransportStatus::Unknown.to_string(), "Unknown");
        assert_eq!(TransportStatus::default(), TransportStatus::NotReceived);
    }
}
