use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};

use crate::{
    auth::CurrentAccount,
    dto::auth::{
        AccountResponse, LoginRequest, RegisterRequest, TokenResponse, UpdateProfileRequest,
    },
    error::AppError,
    services::auth_service,
    state::SharedState,
};

/// Registration, login, and profile endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me).put(update_me))
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = TokenResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Handle or email already taken")
    )
)]
/// Create an account and return a bearer token for it.
pub async fn register(
    State(state): State<SharedState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    Ok(Json(auth_service::register(&state, payload).await?))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
/// Exchange credentials for a bearer token.
pub async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    Ok(Json(auth_service::login(&state, payload).await?))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    params(("Authorization" = String, Header, description = "Bearer token")),
    responses((status = 200, description = "The authenticated account", body = AccountResponse))
)]
/// Return the authenticated account's profile.
pub async fn me(CurrentAccount(account): CurrentAccount) -> Json<AccountResponse> {
    Json(account.into())
}

#[utoipa::path(
    put,
    path = "/auth/me",
    tag = "auth",
    params(("Authorization" = String, Header, description = "Bearer token")),
    request_body = UpdateProfileRequest,
    responses((status = 200, description = "Profile updated", body = AccountResponse))
)]
/// Update the authenticated account's email or password.
pub async fn update_me(
    State(state): State<SharedState>,
    CurrentAccount(account): CurrentAccount,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    let updated = auth_service::update_profile(&state, account, payload).await?;
    Ok(Json(updated.into()))
}
