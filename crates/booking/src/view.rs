//! External projection of a cargo.

use chrono::{DateTime, Utc};
use common::{TrackingId, UnLocode};
use domain::{Cargo, Leg, RoutingStatus};
use serde::{Deserialize, Serialize};

/// Cargo as returned by `load_cargo` and `list_cargos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoView {
    pub tracking_id: TrackingId,
    pub origin: UnLocode,
    pub destination: UnLocode,
    pub arrival_deadline: DateTime<Utc>,
    pub legs: Vec<Leg>,

    /// The cargo has an itinerary.
    pub routed: bool,

    /// The itinerary does not satisfy the route specification.
    pub misrouted: bool,
}

impl From<&Cargo> for CargoView {
    fn from(cargo: &Cargo) -> Self {
        let spec = cargo.route_specification();

        Self {
            tracking_id: cargo.tracking_id().clone(),
            origin: cargo.origin().clone(),
            destination: spec.destination.clone(),
            arrival_deadline: spec.arrival_deadline,
            legs: cargo.itinerary().legs().to_vec(),
            routed: !cargo.itinerary().is_empty(),
            misrouted: cargo.delivery().routing_status == RoutingStatus::Misrouted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use domain::{Itinerary, RouteSpecification};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn unrouted_cargo_view() {
        let cargo = Cargo::new(
            TrackingId::new("T1"),
            RouteSpecification::new("IDJKT", "IDSLO", at(10)),
        );
        let view = CargoView::from(&cargo);

        assert_eq!(view.origin.as_str(), "IDJKT");
        assert_eq!(view.destination.as_str(), "IDSLO");
        assert_eq!(view.arrival_deadline, at(10));
        assert!(view.legs.is_empty());
        assert!(!view.routed);
        assert!(!view.misrouted);
    }

    #[test]
    fn misrouted_cargo_view() {
        let mut cargo = Cargo::new(
            TrackingId::new("T1"),
            RouteSpecification::new("IDJKT", "IDSLO", at(10)),
        );
        cargo.assign_to_route(
            Itinerary::new(vec![Leg::new("V1", "IDJKT", "IDBDG", at(1), at(2)).unwrap()])
                .unwrap(),
        );
        let view = CargoView::from(&cargo);

        assert!(view.routed);
        assert!(view.misrouted);
        assert_eq!(view.legs.len(), 1);
    }
}
