//! Delivery projection: the derived status snapshot of a cargo.

use chrono::{DateTime, Utc};
use common::{UnLocode, VoyageNumber};
use serde::{Deserialize, Serialize};

use super::{
    HandlingActivity, HandlingEvent, HandlingEventType, HandlingHistory, Itinerary,
    RouteSpecification, RoutingStatus, TransportStatus,
};

/// What is known about the actual transport of a cargo, as opposed to the
/// customer requirement (route specification) and the plan (itinerary).
///
/// A delivery is never edited; it is derived afresh with [`Delivery::derive`]
/// whenever one of its inputs changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub routing_status: RoutingStatus,
    pub transport_status: TransportStatus,

    /// Location of the last handling event; `None` before the first one.
    pub last_known_location: Option<UnLocode>,

    /// Voyage the cargo is on, only while onboard a carrier.
    pub current_voyage: Option<VoyageNumber>,

    /// `None` when the cargo is not on track or nothing more is expected.
    pub next_expected_activity: Option<HandlingActivity>,

    /// Estimated arrival; only set while on track.
    pub eta: Option<DateTime<Utc>>,

    pub is_misdirected: bool,
    pub is_unloaded_at_destination: bool,

    /// `None` stands for the `NotHandled` sentinel.
    pub last_event: Option<HandlingEvent>,
}

impl Delivery {
    /// Derives the delivery snapshot from the route specification, the
    /// itinerary and the most recent handling event.
    ///
    /// Total, deterministic and free of side effects.
    pub fn derive(
        route_specification: &RouteSpecification,
        itinerary: &Itinerary,
        last_event: Option<&HandlingEvent>,
    ) -> Self {
        let last_type = last_event.map_or(HandlingEventType::NotHandled, HandlingEvent::event_type);

        let routing_status = routing_status(route_specification, itinerary);
        let transport_status = transport_status(last_type);
        let is_misdirected = match last_event {
            Some(event) if last_type != HandlingEventType::NotHandled => {
                !itinerary.is_expected(event)
            }
            _ => false,
        };
        let on_track = routing_status == RoutingStatus::Routed && !is_misdirected;

        let current_voyage = last_event
            .filter(|_| transport_status == TransportStatus::OnboardCarrier)
            .and_then(|event| event.activity.voyage_number.clone());

        let is_unloaded_at_destination = last_event.is_some_and(|event| {
            last_type == HandlingEventType::Unload
                && event.activity.location == route_specification.destination
        });

        let (next_expected_activity, eta) = if on_track {
            (
                next_expected_activity(route_specification, itinerary, last_event),
                itinerary.final_arrival_time(),
            )
        } else {
            (None, None)
        };

        Self {
            routing_status,
            transport_status,
            last_known_location: last_event
                .map(|event| event.activity.location.clone())
                .filter(|location| !location.is_empty()),
            current_voyage,
            next_expected_activity,
            eta,
            is_misdirected,
            is_unloaded_at_destination,
            last_event: last_event.cloned(),
        }
    }

    /// Derives the delivery from a full handling history; an empty history
    /// stands for "not handled".
    pub fn derive_from_history(
        route_specification: &RouteSpecification,
        itinerary: &Itinerary,
        history: &HandlingHistory,
    ) -> Self {
        Self::derive(
            route_specification,
            itinerary,
            history.most_recently_completed_event().ok(),
        )
    }

    /// Re-derives after a routing change, keeping the last handling event.
    pub fn update_on_routing(
        &self,
        route_specification: &RouteSpecification,
        itinerary: &Itinerary,
    ) -> Self {
        Self::derive(route_specification, itinerary, self.last_event.as_ref())
    }

    /// Routed and not misdirected.
    pub fn is_on_track(&self) -> bool {
        self.routing_status == RoutingStatus::Routed && !self.is_misdirected
    }
}

fn routing_status(spec: &RouteSpecification, itinerary: &Itinerary) -> RoutingStatus {
    if itinerary.is_empty() {
        RoutingStatus::NotRouted
    } else if spec.is_satisfied_by(itinerary) {
        RoutingStatus::Routed
    } else {
        RoutingStatus::Misrouted
    }
}

fn transport_status(last_type: HandlingEventType) -> TransportStatus {
    match last_type {
        HandlingEventType::NotHandled => TransportStatus::NotReceived,
        HandlingEventType::Load => TransportStatus::OnboardCarrier,
        HandlingEventType::Receive | HandlingEventType::Unload | HandlingEventType::Customs => {
            TransportStatus::InPort
        }
        HandlingEventType::Claim => TransportStatus::Claimed,
    }
}

// Only called while on track, so the itinerary is non-empty.
fn next_expected_activity(
    spec: &RouteSpecification,
    itinerary: &Itinerary,
    last_event: Option<&HandlingEvent>,
) -> Option<HandlingActivity> {
    let Some(event) = last_event else {
        return Some(HandlingActivity::receive(spec.origin.clone()));
    };
    let location = &event.activity.location;
    let legs = itinerary.legs();

    match event.event_type() {
        HandlingEventType::NotHandled => Some(HandlingActivity::receive(spec.origin.clone())),
        HandlingEventType::Receive => legs.first().map(|leg| {
            HandlingActivity::load(leg.load_location.clone(), leg.voyage_number.clone())
        }),
        HandlingEventType::Load => itinerary.leg_loading_at(location).map(|leg| {
            HandlingActivity::unload(leg.unload_location.clone(), leg.voyage_number.clone())
        }),
        HandlingEventType::Unload => {
            let index = itinerary.position_unloading_at(location)?;
            match legs.get(index + 1) {
                Some(next) => Some(HandlingActivity::load(
                    next.load_location.clone(),
                    next.voyage_number.clone(),
                )),
                None => Some(HandlingActivity::claim(legs[index].unload_location.clone())),
            }
        }
        HandlingEventType::Claim | HandlingEventType::Customs => None,
    }
}
