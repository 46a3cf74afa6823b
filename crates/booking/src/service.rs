//! Booking service providing the cargo commands.

use cargo_store::{CargoRepository, EventRepository};
use chrono::{DateTime, Utc};
use common::{TrackingId, UnLocode};
use domain::{
    Cargo, Delivery, HandlingActivity, HandlingEvent, HandlingHistory, Itinerary,
    RouteSpecification,
};

use crate::{BookingError, CargoView, Result};

/// Service for booking and routing cargos and recording their handling.
///
/// Each command makes at most one cargo write, guarded by the cargo's
/// version: a command that raced another command on the same cargo fails
/// with a storage conflict instead of overwriting it. Loads re-derive the
/// delivery from the handling event log, which is the source of truth.
#[derive(Clone)]
pub struct BookingService<C, E> {
    cargos: C,
    events: E,
}

impl<C: CargoRepository, E: EventRepository> BookingService<C, E> {
    /// Creates a new booking service over the given repositories.
    pub fn new(cargos: C, events: E) -> Self {
        Self { cargos, events }
    }

    /// Returns the cargo repository.
    pub fn cargo_repository(&self) -> &C {
        &self.cargos
    }

    /// Returns the handling event repository.
    pub fn event_repository(&self) -> &E {
        &self.events
    }

    async fn fetch(&self, tracking_id: &TrackingId) -> Result<Cargo> {
        let (cargo, _) = self.fetch_with_history(tracking_id).await?;
        Ok(cargo)
    }

    async fn fetch_with_history(
        &self,
        tracking_id: &TrackingId,
    ) -> Result<(Cargo, HandlingHistory)> {
        require_tracking_id(tracking_id)?;
        let mut cargo = self.cargos.find(tracking_id).await?;
        let history = self.events.query_history(tracking_id).await?;
        cargo.derive_delivery_progress(&history);
        Ok((cargo, history))
    }
}

// Query methods
impl<C: CargoRepository, E: EventRepository> BookingService<C, E> {
    /// Loads a cargo and projects it to the external view.
    #[tracing::instrument(skip(self))]
    pub async fn load_cargo(&self, tracking_id: &TrackingId) -> Result<CargoView> {
        let cargo = self.fetch(tracking_id).await?;
        Ok(CargoView::from(&cargo))
    }

    /// Lists every cargo, in no particular order.
    #[tracing::instrument(skip(self))]
    pub async fn list_cargos(&self) -> Result<Vec<CargoView>> {
        let cargos = self.cargos.find_all().await?;
        Ok(cargos.iter().map(CargoView::from).collect())
    }

    /// Returns the current delivery snapshot of a cargo.
    #[tracing::instrument(skip(self))]
    pub async fn track_cargo(&self, tracking_id: &TrackingId) -> Result<Delivery> {
        let cargo = self.fetch(tracking_id).await?;
        Ok(cargo.delivery().clone())
    }
}

// Command methods
impl<C: CargoRepository, E: EventRepository> BookingService<C, E> {
    /// Books a new cargo and returns its freshly generated tracking ID.
    #[tracing::instrument(skip(self))]
    pub async fn book_new_cargo(
        &self,
        origin: UnLocode,
        destination: UnLocode,
        arrival_deadline: DateTime<Utc>,
    ) -> Result<TrackingId> {
        if origin.is_empty() {
            return Err(rejected("origin is required"));
        }
        if destination.is_empty() {
            return Err(rejected("destination is required"));
        }
        if arrival_deadline == DateTime::<Utc>::default() {
            return Err(rejected("arrival deadline is required"));
        }

        let tracking_id = TrackingId::generate();
        let spec = RouteSpecification::new(origin, destination, arrival_deadline);
        let cargo = self
            .cargos
            .upsert(Cargo::new(tracking_id.clone(), spec))
            .await?;

        tracing::info!(tracking_id = %cargo.tracking_id(), "cargo booked");
        metrics::counter!("cargos_booked_total").increment(1);

        Ok(tracking_id)
    }

    /// Assigns a (non-empty) itinerary to a cargo.
    #[tracing::instrument(skip(self, itinerary), fields(legs = itinerary.len()))]
    pub async fn assign_cargo_to_route(
        &self,
        tracking_id: &TrackingId,
        itinerary: Itinerary,
    ) -> Result<()> {
        require_tracking_id(tracking_id)?;
        if itinerary.is_empty() {
            return Err(rejected("itinerary must have at least one leg"));
        }

        let mut cargo = self.fetch(tracking_id).await?;
        cargo.assign_to_route(itinerary);
        let cargo = self.cargos.upsert(cargo).await?;

        tracing::info!(
            routing_status = %cargo.delivery().routing_status,
            "cargo assigned to route"
        );
        metrics::counter!("cargos_routed_total").increment(1);

        Ok(())
    }

    /// Changes the destination, keeping the origin and arrival deadline.
    #[tracing::instrument(skip(self))]
    pub async fn change_destination(
        &self,
        tracking_id: &TrackingId,
        destination: UnLocode,
    ) -> Result<()> {
        require_tracking_id(tracking_id)?;
        if destination.is_empty() {
            return Err(rejected("destination is required"));
        }

        let mut cargo = self.fetch(tracking_id).await?;
        let spec = RouteSpecification::new(
            cargo.origin().clone(),
            destination,
            cargo.route_specification().arrival_deadline,
        );
        cargo.specify_new_route(spec);
        let cargo = self.cargos.upsert(cargo).await?;

        tracing::info!(
            routing_status = %cargo.delivery().routing_status,
            "cargo destination changed"
        );
        metrics::counter!("cargo_destination_changes_total").increment(1);

        Ok(())
    }

    /// Records a handling event and re-derives the cargo's delivery.
    ///
    /// Registering an event that is already in the log (same cargo, activity
    /// and completion time) does not store it twice.
    #[tracing::instrument(skip(self))]
    pub async fn register_handling_event(
        &self,
        tracking_id: &TrackingId,
        activity: HandlingActivity,
        completed_at: DateTime<Utc>,
    ) -> Result<Delivery> {
        require_tracking_id(tracking_id)?;
        let activity =
            HandlingActivity::new(activity.event_type, activity.location, activity.voyage_number)
                .inspect_err(|e| tracing::warn!(error = %e, "rejected handling activity"))?;

        let (mut cargo, mut history) = self.fetch_with_history(tracking_id).await?;
        let event = HandlingEvent::new(tracking_id.clone(), activity, completed_at);
        if history.events().contains(&event) {
            tracing::debug!("handling event already recorded");
        } else {
            self.events.store(event).await?;
            history = self.events.query_history(tracking_id).await?;
            metrics::counter!("handling_events_registered_total").increment(1);
        }

        cargo.derive_delivery_progress(&history);
        let cargo = self.cargos.upsert(cargo).await?;
        let delivery = cargo.delivery().clone();

        if delivery.is_misdirected {
            tracing::warn!(%tracking_id, "cargo is misdirected");
            metrics::counter!("cargos_misdirected_total").increment(1);
        } else {
            tracing::info!(
                transport_status = %delivery.transport_status,
                "handling event registered"
            );
        }

        Ok(delivery)
    }
}

fn require_tracking_id(tracking_id: &TrackingId) -> Result<()> {
    if tracking_id.is_empty() {
        return Err(rejected("tracking id is required"));
    }
    Ok(())
}

fn rejected(msg: &str) -> BookingError {
    tracing::warn!(reason = msg, "rejected command");
    BookingError::invalid(msg)
}
