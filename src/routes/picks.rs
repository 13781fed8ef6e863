use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    auth::CurrentAccount,
    dto::pick::{PickSetSummary, SubmitPicksRequest},
    error::AppError,
    services::pick_service,
    state::SharedState,
};

/// Pick submission and retrieval endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/picks", get(my_picks))
        .route("/events/{id}/picks", post(submit_picks).get(event_picks))
        .route("/events/{id}/picks/me", get(my_picks_for_event))
}

#[utoipa::path(
    post,
    path = "/events/{id}/picks",
    tag = "picks",
    params(
        ("Authorization" = String, Header, description = "Bearer token"),
        ("id" = Uuid, Path, description = "Identifier of the event")
    ),
    request_body = SubmitPicksRequest,
    responses(
        (status = 200, description = "Pick-set submitted", body = PickSetSummary),
        (status = 400, description = "Validation failed or unknown fight position"),
        (status = 409, description = "Deadline passed or event closed")
    )
)]
/// Submit or resubmit the caller's picks for an event.
pub async fn submit_picks(
    State(state): State<SharedState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitPicksRequest>,
) -> Result<Json<PickSetSummary>, AppError> {
    Ok(Json(
        pick_service::submit_picks(&state, &account, id, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/picks",
    tag = "picks",
    params(("Authorization" = String, Header, description = "Bearer token")),
    responses((status = 200, description = "The caller's pick-sets", body = [PickSetSummary]))
)]
/// Return every pick-set the caller has submitted.
pub async fn my_picks(
    State(state): State<SharedState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Vec<PickSetSummary>>, AppError> {
    Ok(Json(pick_service::my_picks(&state, account.id).await?))
}

#[utoipa::path(
    get,
    path = "/events/{id}/picks/me",
    tag = "picks",
    params(
        ("Authorization" = String, Header, description = "Bearer token"),
        ("id" = Uuid, Path, description = "Identifier of the event")
    ),
    responses(
        (status = 200, description = "The caller's pick-set for the event", body = PickSetSummary),
        (status = 404, description = "No picks submitted for this event")
    )
)]
/// Return the caller's pick-set for one event.
pub async fn my_picks_for_event(
    State(state): State<SharedState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<PickSetSummary>, AppError> {
    Ok(Json(
        pick_service::my_picks_for_event(&state, account.id, id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/events/{id}/picks",
    tag = "picks",
    params(
        ("Authorization" = String, Header, description = "Bearer token"),
        ("id" = Uuid, Path, description = "Identifier of the event")
    ),
    responses(
        (status = 200, description = "All pick-sets for the event", body = [PickSetSummary]),
        (status = 403, description = "Caller is not a participant or the deadline has not passed")
    )
)]
/// Return every pick-set for an event; participants after the deadline, admins any time.
pub async fn event_picks(
    State(state): State<SharedState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PickSetSummary>>, AppError> {
    Ok(Json(
        pick_service::event_picks(&state, &account, id).await?,
    ))
}
