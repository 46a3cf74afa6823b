//! Handling activities, events and history.

use chrono::{DateTime, Utc};
use common::{TrackingId, UnLocode, VoyageNumber};
use serde::{Deserialize, Serialize};

use super::CargoError;

/// Kind of physical handling a cargo can undergo.
///
/// Ordinals are stable and used on the wire and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HandlingEventType {
    /// Sentinel for "nothing has happened yet".
    #[default]
    NotHandled = 0,
    Load = 1,
    Unload = 2,
    Receive = 3,
    Claim = 4,
    Customs = 5,
}

impl HandlingEventType {
    /// Returns the stable ordinal.
    pub fn ordinal(&self) -> i32 {
        *self as i32
    }

    /// Returns true for types that happen on board a voyage.
    pub fn requires_voyage(&self) -> bool {
        matches!(self, HandlingEventType::Load | HandlingEventType::Unload)
    }

    /// Returns the type name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlingEventType::NotHandled => "Not Handled",
            HandlingEventType::Load => "Load",
            HandlingEventType::Unload => "Unload",
            HandlingEventType::Receive => "Receive",
            HandlingEventType::Claim => "Claim",
            HandlingEventType::Customs => "Customs",
        }
    }
}

impl TryFrom<i32> for HandlingEventType {
    type Error = CargoError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(HandlingEventType::NotHandled),
            1 => Ok(HandlingEventType::Load),
            2 => Ok(HandlingEventType::Unload),
            3 => Ok(HandlingEventType::Receive),
            4 => Ok(HandlingEventType::Claim),
            5 => Ok(HandlingEventType::Customs),
            other => Err(CargoError::UnknownEventType(other)),
        }
    }
}

impl std::fmt::Display for HandlingEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How and where a cargo is (or is expected to be) handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlingActivity {
    /// What happens.
    pub event_type: HandlingEventType,

    /// Where it happens.
    pub location: UnLocode,

    /// Voyage involved; only present for loads and unloads.
    pub voyage_number: Option<VoyageNumber>,
}

impl HandlingActivity {
    /// Creates an activity from untrusted input.
    ///
    /// The location must be non-empty, loads and unloads need a voyage, the
    /// other types must not have one, and `NotHandled` is rejected. An empty
    /// voyage number counts as absent.
    pub fn new(
        event_type: HandlingEventType,
        location: impl Into<UnLocode>,
        voyage_number: Option<VoyageNumber>,
    ) -> Result<Self, CargoError> {
        let location = location.into();
        let voyage_number = voyage_number.filter(|v| !v.is_empty());

        if event_type == HandlingEventType::NotHandled {
            return Err(CargoError::NotRecordable);
        }
        if location.is_empty() {
            return Err(CargoError::LocationRequired);
        }
        match (event_type.requires_voyage(), voyage_number.is_some()) {
            (true, false) => Err(CargoError::VoyageRequired { event_type }),
            (false, true) => Err(CargoError::UnexpectedVoyage { event_type }),
            _ => Ok(Self {
                event_type,
                location,
                voyage_number,
            }),
        }
    }

    /// Cargo received at a port.
    pub fn receive(location: impl Into<UnLocode>) -> Self {
        Self::in_port(HandlingEventType::Receive, location)
    }

    /// Cargo loaded onto a voyage.
    pub fn load(location: impl Into<UnLocode>, voyage: impl Into<VoyageNumber>) -> Self {
        Self::on_voyage(HandlingEventType::Load, location, voyage)
    }

    /// Cargo unloaded from a voyage.
    pub fn unload(location: impl Into<UnLocode>, voyage: impl Into<VoyageNumber>) -> Self {
        Self::on_voyage(HandlingEventType::Unload, location, voyage)
    }

    /// Cargo claimed by the consignee.
    pub fn claim(location: impl Into<UnLocode>) -> Self {
        Self::in_port(HandlingEventType::Claim, location)
    }

    /// Cargo passed through customs.
    pub fn customs(location: impl Into<UnLocode>) -> Self {
        Self::in_port(HandlingEventType::Customs, location)
    }

    fn in_port(event_type: HandlingEventType, location: impl Into<UnLocode>) -> Self {
        Self {
            event_type,
            location: location.into(),
            voyage_number: None,
        }
    }

    fn on_voyage(
        event_type: HandlingEventType,
        location: impl Into<UnLocode>,
        voyage: impl Into<VoyageNumber>,
    ) -> Self {
        Self {
            event_type,
            location: location.into(),
            voyage_number: Some(voyage.into()),
        }
    }
}

/// A recorded handling of a cargo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlingEvent {
    /// Cargo the event belongs to.
    pub tracking_id: TrackingId,

    /// What happened and where.
    pub activity: HandlingActivity,

    /// When the handling was completed.
    pub completed_at: DateTime<Utc>,
}

impl HandlingEvent {
    /// Creates a new handling event.
    pub fn new(
        tracking_id: TrackingId,
        activity: HandlingActivity,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            tracking_id,
            activity,
            completed_at,
        }
    }

    /// Returns the event's type.
    pub fn event_type(&self) -> HandlingEventType {
        self.activity.event_type
    }
}

/// Handling events of one cargo, ordered by completion time.
///
/// Ordering is the producer's responsibility; only the last element is read.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HandlingHistory {
    events: Vec<HandlingEvent>,
}

impl HandlingHistory {
    /// Wraps events already ordered by completion time.
    pub fn new(events: Vec<HandlingEvent>) -> Self {
        Self { events }
    }

    /// Returns the events, oldest first.
    pub fn events(&self) -> &[HandlingEvent] {
        &self.events
    }

    /// Returns the number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns the latest event, or `EmptyHistory`.
    pub fn most_recently_completed_event(&self) -> Result<&HandlingEvent, CargoError> {
        self.events.last().ok_or(CargoError::EmptyHistory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn ordinals_are_stable() {
        assert_eq!(HandlingEventType::NotHandled.ordinal(), 0);
        assert_eq!(HandlingEventType::Load.ordinal(), 1);
        assert_eq!(HandlingEventType::Unload.ordinal(), 2);
        assert_eq!(HandlingEventType::Receive.ordinal(), 3);
        assert_eq!(HandlingEventType::Claim.ordinal(), 4);
        assert_eq!(HandlingEventType::Customs.ordinal(), 5);

        for ordinal in 0..=5 {
            let event_type = HandlingEventType::try_from(ordinal).unwrap();
            assert_eq!(event_type.ordinal(), ordinal);
        }
    }

    #[test]
    fn unknown_ordinal_is_rejected() {
        assert_eq!(
            HandlingEventType::try_from(6),
            Err(CargoError::UnknownEventType(6))
        );
        assert_eq!(
            HandlingEventType::try_from(-1),
            Err(CargoError::UnknownEventType(-1))
        );
    }

    #[test]
    fn activity_validation() {
        assert!(HandlingActivity::new(HandlingEventType::Receive, "IDJKT", None).is_ok());
        assert_eq!(
            HandlingActivity::new(HandlingEventType::Load, "IDJKT", None),
            Err(CargoError::VoyageRequired {
                event_type: HandlingEventType::Load
            })
        );
        assert_eq!(
            HandlingActivity::new(
                HandlingEventType::Claim,
                "IDSLO",
                Some(VoyageNumber::new("V1"))
            ),
            Err(CargoError::UnexpectedVoyage {
                event_type: HandlingEventType::Claim
            })
        );
        assert_eq!(
            HandlingActivity::new(HandlingEventType::Customs, "", None),
            Err(CargoError::LocationRequired)
        );
        assert_eq!(
            HandlingActivity::new(HandlingEventType::NotHandled, "IDJKT", None),
            Err(CargoError::NotRecordable)
        );
    }

    #[test]
    fn empty_voyage_counts_as_absent() {
        let activity = HandlingActivity::new(
            HandlingEventType::Receive,
            "IDJKT",
            Some(VoyageNumber::new("")),
        )
        .unwrap();
        assert_eq!(activity, HandlingActivity::receive("IDJKT"));
    }

    #[test]
    fn empty_history_fails() {
        let history = HandlingHistory::default();
        assert_eq!(
            history.most_recently_completed_event(),
            Err(CargoError::EmptyHistory)
        );
    }

    #[test]
    fn most_recent_is_last_element() {
        let id = TrackingId::new("ABC");
        let history = HandlingHistory::new(vec![
            HandlingEvent::new(id.clone(), HandlingActivity::receive("IDJKT"), at(1)),
            HandlingEvent::new(id, HandlingActivity::load("IDJKT", "V1"), at(2)),
        ]);

        let last = history.most_recently_completed_event().unwrap();
        assert_eq!(last.event_type(), HandlingEventType::Load);
        assert_eq!(history.len(), 2);
    }
}
