//! Handling event registration endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use cargo_store::{CargoRepository, EventRepository};
use chrono::{DateTime, Utc};
use domain::{Delivery, HandlingActivity, HandlingEventType, TrackingId, VoyageNumber};
use serde::Deserialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct RegisterEventRequest {
    pub tracking_id: String,
    pub event_type: HandlingEventType,
    pub location: String,
    pub voyage_number: Option<String>,
    /// Defaults to the time the request is received.
    pub completed_at: Option<DateTime<Utc>>,
}

/// POST /handling/events: record a handling event and return the new delivery.
#[tracing::instrument(skip(state, req))]
pub async fn register<C, E>(
    State(state): State<Arc<AppState<C, E>>>,
    Json(req): Json<RegisterEventRequest>,
) -> Result<(StatusCode, Json<Delivery>), ApiError>
where
    C: CargoRepository + 'static,
    E: EventRepository + 'static,
{
    let activity = HandlingActivity::new(
        req.event_type,
        req.location,
        req.voyage_number.map(VoyageNumber::new),
    )?;
    let completed_at = req.completed_at.unwrap_or_else(Utc::now);

    let delivery = state
        .booking
        .register_handling_event(&TrackingId::new(req.tracking_id), activity, completed_at)
        .await?;

    Ok((StatusCode::CREATED, Json(delivery)))
}
