//! HTTP API server for the cargo booking system.
//!
//! Exposes the booking commands and handling-event registration as REST
//! endpoints, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use cargo_store::{CargoRepository, EventRepository};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<C, E>(state: Arc<AppState<C, E>>, metrics_handle: PrometheusHandle) -> Router
where
    C: CargoRepository + 'static,
    E: EventRepository + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/booking/cargos",
            post(routes::cargos::book::<C, E>).get(routes::cargos::list::<C, E>),
        )
        .route("/booking/cargos/{id}", get(routes::cargos::get::<C, E>))
        .route(
            "/booking/cargos/{id}/assign_route",
            post(routes::cargos::assign_route::<C, E>),
        )
        .route(
            "/booking/cargos/{id}/change_destination",
            post(routes::cargos::change_destination::<C, E>),
        )
        .route(
            "/booking/cargos/{id}/delivery",
            get(routes::cargos::delivery::<C, E>),
        )
        .route("/handling/events", post(routes::handling::register::<C, E>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state backed by the given repositories.
pub fn create_state<C, E>(cargos: C, events: E) -> Arc<AppState<C, E>>
where
    C: CargoRepository,
    E: EventRepository,
{
    Arc::new(AppState::new(cargos, events))
}
