//! Cargo booking and routing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use booking::CargoView;
use cargo_store::{CargoRepository, EventRepository};
use chrono::{DateTime, Utc};
use domain::{Delivery, Itinerary, Leg, TrackingId, UnLocode};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct BookCargoRequest {
    pub origin: String,
    pub destination: String,
    pub arrival_deadline: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct AssignRouteRequest {
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Deserialize)]
pub struct ChangeDestinationRequest {
    pub destination: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct CargoBookedResponse {
    pub tracking_id: String,
}

#[derive(Serialize)]
pub struct CargoListResponse {
    pub cargos: Vec<CargoView>,
}

// -- Handlers --

/// POST /booking/cargos: book a new cargo.
#[tracing::instrument(skip(state, req))]
pub async fn book<C, E>(
    State(state): State<Arc<AppState<C, E>>>,
    Json(req): Json<BookCargoRequest>,
) -> Result<(StatusCode, Json<CargoBookedResponse>), ApiError>
where
    C: CargoRepository + 'static,
    E: EventRepository + 'static,
{
    let tracking_id = state
        .booking
        .book_new_cargo(
            UnLocode::new(req.origin),
            UnLocode::new(req.destination),
            req.arrival_deadline,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CargoBookedResponse {
            tracking_id: tracking_id.into_inner(),
        }),
    ))
}

/// GET /booking/cargos: list every cargo.
#[tracing::instrument(skip(state))]
pub async fn list<C, E>(
    State(state): State<Arc<AppState<C, E>>>,
) -> Result<Json<CargoListResponse>, ApiError>
where
    C: CargoRepository + 'static,
    E: EventRepository + 'static,
{
    let cargos = state.booking.list_cargos().await?;
    Ok(Json(CargoListResponse { cargos }))
}

/// GET /booking/cargos/{id}: load one cargo.
#[tracing::instrument(skip(state))]
pub async fn get<C, E>(
    State(state): State<Arc<AppState<C, E>>>,
    Path(id): Path<String>,
) -> Result<Json<CargoView>, ApiError>
where
    C: CargoRepository + 'static,
    E: EventRepository + 'static,
{
    let view = state.booking.load_cargo(&TrackingId::new(id)).await?;
    Ok(Json(view))
}

/// POST /booking/cargos/{id}/assign_route: attach an itinerary.
#[tracing::instrument(skip(state, req))]
pub async fn assign_route<C, E>(
    State(state): State<Arc<AppState<C, E>>>,
    Path(id): Path<String>,
    Json(req): Json<AssignRouteRequest>,
) -> Result<StatusCode, ApiError>
where
    C: CargoRepository + 'static,
    E: EventRepository + 'static,
{
    let itinerary = Itinerary::new(req.legs)?;
    state
        .booking
        .assign_cargo_to_route(&TrackingId::new(id), itinerary)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /booking/cargos/{id}/change_destination: re-specify the destination.
#[tracing::instrument(skip(state, req))]
pub async fn change_destination<C, E>(
    State(state): State<Arc<AppState<C, E>>>,
    Path(id): Path<String>,
    Json(req): Json<ChangeDestinationRequest>,
) -> Result<StatusCode, ApiError>
where
    C: CargoRepository + 'static,
    E: EventRepository + 'static,
{
    state
        .booking
        .change_destination(&TrackingId::new(id), UnLocode::new(req.destination))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /booking/cargos/{id}/delivery: current delivery snapshot.
#[tracing::instrument(skip(state))]
pub async fn delivery<C, E>(
    State(state): State<Arc<AppState<C, E>>>,
    Path(id): Path<String>,
) -> Result<Json<Delivery>, ApiError>
where
    C: CargoRepository + 'static,
    E: EventRepository + 'static,
{
    let delivery = state.booking.track_cargo(&TrackingId::new(id)).await?;
    Ok(Json(delivery))
}
