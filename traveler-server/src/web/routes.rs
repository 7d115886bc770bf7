//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::integration::DOMAIN;
use crate::services::{ServiceCall, ServiceError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/entries/:entry_id/journeys", get(entry_journeys))
        .route("/entries/:entry_id/sensors", get(entry_sensors))
        .route("/services/:domain/:name", post(invoke_service))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Snapshot of an entry's coordinators.
async fn entry_journeys(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> Response {
    let Some(coordinators) = state.integration.registry().get(DOMAIN, &entry_id).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("no entry {entry_id}"),
            }),
        )
            .into_response();
    };

    let next_snapshot = coordinators.next_journey.snapshot().await;
    let last_snapshot = match &coordinators.last_journey {
        Some(last) => Some(last.snapshot().await),
        None => None,
    };

    Json(EntryJourneysResponse {
        entry_id,
        next_journey: SnapshotView::from(&next_snapshot),
        last_journey: last_snapshot.as_ref().map(SnapshotView::from),
    })
    .into_response()
}

/// Current sensor readouts for an entry, derived from the live
/// coordinator snapshots.
async fn entry_sensors(
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> Response {
    match state.sensors.readouts(&entry_id).await {
        Some(readouts) => Json(readouts).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("no sensors for entry {entry_id}"),
            }),
        )
            .into_response(),
    }
}

/// Invoke a registered service (e.g. `train_traveler/update_journeys`).
///
/// Returns 202: services are side-effecting only; consumers read updated
/// state from the journeys endpoint afterwards.
async fn invoke_service(
    State(state): State<AppState>,
    Path((domain, name)): Path<(String, String)>,
) -> Response {
    match state
        .integration
        .services()
        .call(&domain, &name, ServiceCall::default())
        .await
    {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(ServiceError::NotFound { domain, name }) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("no service {domain}.{name}"),
            }),
        )
            .into_response(),
    }
}
