use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::event::{EventListItem, EventSummary},
    error::AppError,
    services::event_service,
    state::SharedState,
};

/// Public read-only event endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/{id}", get(get_event))
}

#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    responses((status = 200, description = "Active event cards", body = [EventListItem]))
)]
/// List all active event cards, soonest first.
pub async fn list_events(
    State(state): State<SharedState>,
) -> Result<Json<Vec<EventListItem>>, AppError> {
    Ok(Json(event_service::list_events(&state).await?))
}

#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Identifier of the event")),
    responses(
        (status = 200, description = "Event detail", body = EventSummary),
        (status = 404, description = "Event not found")
    )
)]
/// Return one event card with its full fight roster.
pub async fn get_event(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventSummary>, AppError> {
    Ok(Json(event_service::get_event(&state, id).await?))
}
