use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, MessageResponse},
        extractors::CurrentUser,
        repo_types::User,
        services,
    },
    error::{ApiError, ApiResult},
    state::AppState,
    validation::JsonBody,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/user", get(get_user))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let creds = payload.validate().map_err(ApiError::Validation)?;
    let (user, token) = services::login(&state, &creds.email, &creds.password).await?;
    Ok(Json(LoginResponse { user, token }))
}

#[instrument(skip(state, current), fields(user_id = %current.user.id))]
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<MessageResponse>> {
    services::logout(&state.db, current.token_id).await?;
    Ok(Json(MessageResponse::new("Logged out")))
}

#[instrument(skip(current), fields(user_id = %current.user.id))]
pub async fn get_me(current: CurrentUser) -> Json<User> {
    Json(current.user)
}

/// Same principal as `/me`; kept as its own route for existing clients.
pub async fn get_user(current: CurrentUser) -> Json<User> {
    Json(current.user)
}
