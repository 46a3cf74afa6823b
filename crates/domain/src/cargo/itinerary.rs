//! Legs and itineraries: the planned transport of a cargo.

use chrono::{DateTime, Utc};
use common::{UnLocode, VoyageNumber};
use serde::{Deserialize, Serialize};

use super::{CargoError, HandlingEvent, HandlingEventType};

/// One segment of an itinerary: a single voyage between two ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    /// Voyage the cargo travels on.
    pub voyage_number: VoyageNumber,

    /// Port where the cargo is loaded.
    pub load_location: UnLocode,

    /// Port where the cargo is unloaded.
    pub unload_location: UnLocode,

    /// Scheduled load time.
    pub load_time: DateTime<Utc>,

    /// Scheduled unload time.
    pub unload_time: DateTime<Utc>,
}

impl Leg {
    /// Creates a well-formed leg.
    ///
    /// Fails if any identifier is empty, if the leg loads and unloads at the
    /// same port, or if it unloads before it loads.
    pub fn new(
        voyage_number: impl Into<VoyageNumber>,
        load_location: impl Into<UnLocode>,
        unload_location: impl Into<UnLocode>,
        load_time: DateTime<Utc>,
        unload_time: DateTime<Utc>,
    ) -> Result<Self, CargoError> {
        let leg = Self {
            voyage_number: voyage_number.into(),
            load_location: load_location.into(),
            unload_location: unload_location.into(),
            load_time,
            unload_time,
        };
        leg.validate(0)?;
        Ok(leg)
    }

    fn validate(&self, index: usize) -> Result<(), CargoError> {
        if self.voyage_number.is_empty() {
            return Err(CargoError::LegWithoutVoyage { index });
        }

        if self.load_location.is_empty() || self.unload_location.is_empty() {
            return Err(CargoError::LocationRequired);
        }

        if self.load_location == self.unload_location {
            return Err(CargoError::LegGoesNowhere {
                voyage: self.voyage_number.clone(),
                location: self.load_location.clone(),
            });
        }

        if self.unload_time < self.load_time {
            return Err(CargoError::LegUnloadsBeforeLoad {
                voyage: self.voyage_number.clone(),
            });
        }

        Ok(())
    }
}

/// The ordered legs planned for a cargo.
///
/// A non-empty itinerary is connected: each leg unloads where the next one
/// loads, and no later than the next one departs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawItinerary")]
pub struct Itinerary {
    legs: Vec<Leg>,
}

#[derive(Deserialize)]
struct RawItinerary {
    #[serde(default)]
    legs: Vec<Leg>,
}

impl TryFrom<RawItinerary> for Itinerary {
    type Error = CargoError;

    fn try_from(raw: RawItinerary) -> Result<Self, Self::Error> {
        Itinerary::new(raw.legs)
    }
}

impl Itinerary {
    /// Creates an itinerary, rejecting malformed or disconnected legs.
    pub fn new(legs: Vec<Leg>) -> Result<Self, CargoError> {
        for (index, leg) in legs.iter().enumerate() {
            leg.validate(index)?;
        }

        for (index, pair) in legs.windows(2).enumerate() {
            let (current, next) = (&pair[0], &pair[1]);
            if current.unload_location != next.load_location {
                return Err(CargoError::DisconnectedLegs {
                    index,
                    unload: current.unload_location.clone(),
                    next_load: next.load_location.clone(),
                });
            }
            if current.unload_time > next.load_time {
                return Err(CargoError::OverlappingLegs { index: index + 1 });
            }
        }

        Ok(Self { legs })
    }

    /// Returns an itinerary with no legs.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the legs in travel order.
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Returns true if there are no legs.
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Returns the number of legs.
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// Port of the first load, if any.
    pub fn initial_departure_location(&self) -> Option<&UnLocode> {
        self.legs.first().map(|leg| &leg.load_location)
    }

    /// Port of the last unload, if any.
    pub fn final_arrival_location(&self) -> Option<&UnLocode> {
        self.legs.last().map(|leg| &leg.unload_location)
    }

    /// Scheduled time of the last unload, if any.
    pub fn final_arrival_time(&self) -> Option<DateTime<Utc>> {
        self.legs.last().map(|leg| leg.unload_time)
    }

    /// First leg that loads at `location`.
    pub fn leg_loading_at(&self, location: &UnLocode) -> Option<&Leg> {
        self.legs.iter().find(|leg| &leg.load_location == location)
    }

    /// Index of the first leg that unloads at `location`.
    pub fn position_unloading_at(&self, location: &UnLocode) -> Option<usize> {
        self.legs
            .iter()
            .position(|leg| &leg.unload_location == location)
    }

    /// Returns true if the handling event is consistent with this plan.
    ///
    /// An empty itinerary expects everything. Customs events are never
    /// constrained.
    pub fn is_expected(&self, event: &HandlingEvent) -> bool {
        if self.is_empty() {
            return true;
        }

        let activity = &event.activity;
        let on_voyage =
            |leg: &Leg| activity.voyage_number.as_ref() == Some(&leg.voyage_number);

        match activity.event_type {
            HandlingEventType::Receive => {
                self.initial_departure_location() == Some(&activity.location)
            }
            HandlingEventType::Load => self
                .legs
                .iter()
                .any(|leg| leg.load_location == activity.location && on_voyage(leg)),
            HandlingEventType::Unload => self
                .legs
                .iter()
                .any(|leg| leg.unload_location == activity.location && on_voyage(leg)),
            HandlingEventType::Claim => self.final_arrival_location() == Some(&activity.location),
            HandlingEventType::Customs | HandlingEventType::NotHandled => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cargo::HandlingActivity;
    use chrono::TimeZone;
    use common::TrackingId;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap()
    }

    fn two_leg_itinerary() -> Itinerary {
        Itinerary::new(vec![
            Leg::new("V1", "IDJKT", "IDBDG", at(1), at(2)).unwrap(),
            Leg::new("V2", "IDBDG", "IDSLO", at(3), at(4)).unwrap(),
        ])
        .unwrap()
    }

    fn event(activity: HandlingActivity) -> HandlingEvent {
        HandlingEvent::new(TrackingId::new("ABC"), activity, at(1))
    }

    #[test]
    fn accessors_on_non_empty_itinerary() {
        let itinerary = two_leg_itinerary();
        assert_eq!(itinerary.len(), 2);
        assert_eq!(
            itinerary.initial_departure_location(),
            Some(&UnLocode::new("IDJKT"))
        );
        assert_eq!(
            itinerary.final_arrival_location(),
            Some(&UnLocode::new("IDSLO"))
        );
        assert_eq!(itinerary.final_arrival_time(), Some(at(4)));
    }

    #[test]
    fn accessors_on_empty_itinerary() {
        let itinerary = Itinerary::empty();
        assert!(itinerary.is_empty());
        assert_eq!(itinerary.initial_departure_location(), None);
        assert_eq!(itinerary.final_arrival_location(), None);
        assert_eq!(itinerary.final_arrival_time(), None);
    }

    #[test]
    fn rejects_leg_to_same_port() {
        let result = Leg::new("V1", "IDJKT", "IDJKT", at(1), at(2));
        assert!(matches!(result, Err(CargoError::LegGoesNowhere { .. })));
    }

    #[test]
    fn rejects_leg_unloading_before_load() {
        let result = Leg::new("V1", "IDJKT", "IDBDG", at(3), at(2));
        assert!(matches!(
            result,
            Err(CargoError::LegUnloadsBeforeLoad { .. })
        ));
    }

    #[test]
    fn rejects_disconnected_legs() {
        let result = Itinerary::new(vec![
            Leg::new("V1", "IDJKT", "IDBDG", at(1), at(2)).unwrap(),
            Leg::new("V2", "IDSRG", "IDSLO", at(3), at(4)).unwrap(),
        ]);
        assert!(matches!(
            result,
            Err(CargoError::DisconnectedLegs { index: 0, .. })
        ));
    }

    #[test]
    fn rejects_overlapping_legs() {
        let result = Itinerary::new(vec![
            Leg::new("V1", "IDJKT", "IDBDG", at(1), at(5)).unwrap(),
            Leg::new("V2", "IDBDG", "IDSLO", at(3), at(6)).unwrap(),
        ]);
        assert_eq!(result, Err(CargoError::OverlappingLegs { index: 1 }));
    }

    #[test]
    fn empty_itinerary_expects_everything() {
        let itinerary = Itinerary::empty();
        assert!(itinerary.is_expected(&event(HandlingActivity::receive("XXXXX"))));
        assert!(itinerary.is_expected(&event(HandlingActivity::claim("XXXXX"))));
    }

    #[test]
    fn receive_expected_only_at_departure() {
        let itinerary = two_leg_itinerary();
        assert!(itinerary.is_expected(&event(HandlingActivity::receive("IDJKT"))));
        assert!(!itinerary.is_expected(&event(HandlingActivity::receive("IDBDG"))));
    }

    #[test]
    fn load_requires_matching_location_and_voyage() {
        let itinerary = two_leg_itinerary();
        assert!(itinerary.is_expected(&event(HandlingActivity::load("IDBDG", "V2"))));
        assert!(!itinerary.is_expected(&event(HandlingActivity::load("IDBDG", "V1"))));
        assert!(!itinerary.is_expected(&event(HandlingActivity::load("IDSLO", "V2"))));
    }

    #[test]
    fn unload_requires_matching_location_and_voyage() {
        let itinerary = two_leg_itinerary();
        assert!(itinerary.is_expected(&event(HandlingActivity::unload("IDBDG", "V1"))));
        assert!(!itinerary.is_expected(&event(HandlingActivity::unload("IDBDG", "V2"))));
    }

    #[test]
    fn claim_expected_only_at_final_arrival() {
        let itinerary = two_leg_itinerary();
        assert!(itinerary.is_expected(&event(HandlingActivity::claim("IDSLO"))));
        assert!(!itinerary.is_expected(&event(HandlingActivity::claim("IDBDG"))));
    }

    #[test]
    fn customs_is_never_constrained() {
        let itinerary = two_leg_itinerary();
        assert!(itinerary.is_expected(&event(HandlingActivity::customs("ZZZZZ"))));
    }

    #[test]
    fn deserialization_enforces_adjacency() {
        let json = serde_json::json!({
            "legs": [
                {"voyage_number": "V1", "load_location": "IDJKT", "unload_location": "IDBDG",
                 "load_time": "2025-01-01T00:00:00Z", "unload_time": "2025-01-02T00:00:00Z"},
                {"voyage_number": "V1", "load_location": "IDSRG", "unload_location": "IDSLO",
                 "load_time": "2025-01-03T00:00:00Z", "unload_time": "2025-01-04T00:00:00Z"}
            ]
        });
        assert!(serde_json::from_value::<Itinerary>(json).is_err());

        let round_trip: Itinerary =
            serde_json::from_value(serde_json::to_value(two_leg_itinerary()).unwrap()).unwrap();
        assert_eq!(round_trip, two_leg_itinerary());
    }
}
