use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    auth::AdminAccount,
    dto::{
        admin::{
            AccountPage, PurgeResponse, RecomputeStatsResponse, UpdateRoleRequest,
            UpdateStatusRequest,
        },
        auth::AccountResponse,
        common::PageQuery,
        event::{
            CreateEventRequest, EventListItem, EventSummary, ResultsRequest, ResultsResponse,
            UpdateEventRequest,
        },
    },
    error::AppError,
    services::{admin_service, event_service, results_service, stats_service},
    state::SharedState,
};

/// Admin-only management endpoints for events, accounts, and maintenance.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/admin/events", get(list_all_events).post(create_event))
        .route(
            "/admin/events/{id}",
            put(update_event).delete(soft_delete_event),
        )
        .route("/admin/events/{id}/purge", delete(purge_event))
        .route("/admin/events/{id}/results", post(post_results))
        .route("/admin/accounts", get(list_accounts))
        .route("/admin/accounts/{id}/role", put(update_role))
        .route("/admin/accounts/{id}/status", put(update_status))
        .route(
            "/admin/maintenance/recompute-stats",
            post(recompute_stats),
        )
}

#[utoipa::path(
    get,
    path = "/admin/events",
    tag = "admin",
    params(("Authorization" = String, Header, description = "Bearer token with admin role")),
    responses((status = 200, description = "All events, soft-deleted included", body = [EventListItem]))
)]
/// List every event card, soft-deleted ones included.
pub async fn list_all_events(
    State(state): State<SharedState>,
    AdminAccount(_admin): AdminAccount,
) -> Result<Json<Vec<EventListItem>>, AppError> {
    Ok(Json(event_service::list_all_events(&state).await?))
}

#[utoipa::path(
    post,
    path = "/admin/events",
    tag = "admin",
    params(("Authorization" = String, Header, description = "Bearer token with admin role")),
    request_body = CreateEventRequest,
    responses(
        (status = 200, description = "Event created", body = EventSummary),
        (status = 400, description = "Validation failed")
    )
)]
/// Create a new event card with its fight roster.
pub async fn create_event(
    State(state): State<SharedState>,
    AdminAccount(_admin): AdminAccount,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Json<EventSummary>, AppError> {
    Ok(Json(event_service::create_event(&state, payload).await?))
}

#[utoipa::path(
    put,
    path = "/admin/events/{id}",
    tag = "admin",
    params(
        ("Authorization" = String, Header, description = "Bearer token with admin role"),
        ("id" = Uuid, Path, description = "Identifier of the event")
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventSummary),
        (status = 409, description = "Roster replacement after results were posted")
    )
)]
/// Apply a partial update to an event card.
pub async fn update_event(
    State(state): State<SharedState>,
    AdminAccount(_admin): AdminAccount,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<EventSummary>, AppError> {
    Ok(Json(event_service::update_event(&state, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/admin/events/{id}",
    tag = "admin",
    params(
        ("Authorization" = String, Header, description = "Bearer token with admin role"),
        ("id" = Uuid, Path, description = "Identifier of the event")
    ),
    responses((status = 204, description = "Event soft-deleted"))
)]
/// Soft-delete an event card.
pub async fn soft_delete_event(
    State(state): State<SharedState>,
    AdminAccount(_admin): AdminAccount,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    event_service::soft_delete_event(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/admin/events/{id}/purge",
    tag = "admin",
    params(
        ("Authorization" = String, Header, description = "Bearer token with admin role"),
        ("id" = Uuid, Path, description = "Identifier of the event")
    ),
    responses(
        (status = 200, description = "Event and orphan pick-sets removed", body = PurgeResponse),
        (status = 409, description = "Event is not soft-deleted")
    )
)]
/// Hard-delete a soft-deleted event and its orphan pick-sets.
pub async fn purge_event(
    State(state): State<SharedState>,
    AdminAccount(_admin): AdminAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<PurgeResponse>, AppError> {
    Ok(Json(event_service::purge_event(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/admin/events/{id}/results",
    tag = "admin",
    params(
        ("Authorization" = String, Header, description = "Bearer token with admin role"),
        ("id" = Uuid, Path, description = "Identifier of the event")
    ),
    request_body = ResultsRequest,
    responses(
        (status = 200, description = "Results stamped and pick-sets scored", body = ResultsResponse),
        (status = 400, description = "Validation failed or unknown fight position")
    )
)]
/// Post final outcomes for an event and run the scoring pass.
pub async fn post_results(
    State(state): State<SharedState>,
    AdminAccount(_admin): AdminAccount,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResultsRequest>,
) -> Result<Json<ResultsResponse>, AppError> {
    Ok(Json(
        results_service::post_results(&state, id, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/admin/accounts",
    tag = "admin",
    params(
        ("Authorization" = String, Header, description = "Bearer token with admin role"),
        PageQuery
    ),
    responses((status = 200, description = "Paginated account listing", body = AccountPage))
)]
/// List accounts for administration, oldest first.
pub async fn list_accounts(
    State(state): State<SharedState>,
    AdminAccount(_admin): AdminAccount,
    Query(query): Query<PageQuery>,
) -> Result<Json<AccountPage>, AppError> {
    Ok(Json(admin_service::list_accounts(&state, query).await?))
}

#[utoipa::path(
    put,
    path = "/admin/accounts/{id}/role",
    tag = "admin",
    params(
        ("Authorization" = String, Header, description = "Bearer token with admin role"),
        ("id" = Uuid, Path, description = "Identifier of the target account")
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = AccountResponse),
        (status = 403, description = "Owner protection"),
        (status = 409, description = "Would remove the last active administrator")
    )
)]
/// Grant or revoke the admin role on an account.
pub async fn update_role(
    State(state): State<SharedState>,
    AdminAccount(actor): AdminAccount,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    Ok(Json(
        admin_service::update_role(&state, &actor, id, payload).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/admin/accounts/{id}/status",
    tag = "admin",
    params(
        ("Authorization" = String, Header, description = "Bearer token with admin role"),
        ("id" = Uuid, Path, description = "Identifier of the target account")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = AccountResponse),
        (status = 403, description = "Owner protection"),
        (status = 409, description = "Would deactivate the last active administrator")
    )
)]
/// Activate or deactivate an account.
pub async fn update_status(
    State(state): State<SharedState>,
    AdminAccount(actor): AdminAccount,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    Ok(Json(
        admin_service::update_status(&state, &actor, id, payload).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/admin/maintenance/recompute-stats",
    tag = "admin",
    params(("Authorization" = String, Header, description = "Bearer token with admin role")),
    responses((status = 200, description = "All account rollups rebuilt", body = RecomputeStatsResponse))
)]
/// Rebuild every account's aggregate rollup from its scored pick-sets.
pub async fn recompute_stats(
    State(state): State<SharedState>,
    AdminAccount(_admin): AdminAccount,
) -> Result<Json<RecomputeStatsResponse>, AppError> {
    let accounts_recomputed = stats_service::recompute_all(&state).await?;
    Ok(Json(RecomputeStatsResponse {
        accounts_recomputed,
    }))
}
