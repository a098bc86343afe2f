use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{PostPayload, PostResponse},
    pagination::{PageQuery, PageRequest, Paginated, DEFAULT_PER_PAGE},
    services,
};
use crate::{
    auth::{dto::MessageResponse, CurrentUser},
    error::{ApiError, ApiResult},
    state::AppState,
    validation::JsonBody,
};

pub fn posts_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/:slug",
            get(show_post)
                .put(update_post)
                .patch(update_post)
                .delete(delete_post),
        )
}

#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Paginated<PostResponse>>> {
    let req = PageRequest::from_query(&query, DEFAULT_PER_PAGE);
    let path = format!("{}/api/posts", state.config.app_url);
    let page = services::list(&state, req, &path).await?;
    Ok(Json(page))
}

#[instrument(skip(state))]
pub async fn show_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<PostResponse>> {
    Ok(Json(services::get_by_slug(&state, &slug).await?))
}

#[instrument(skip(state, current, payload), fields(user_id = %current.user.id))]
pub async fn create_post(
    State(state): State<AppState>,
    current: CurrentUser,
    JsonBody(payload): JsonBody<PostPayload>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    let new = payload.validate_create().map_err(ApiError::Validation)?;
    let post = services::create(&state, &current.user, new).await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

#[instrument(skip(state, current, payload), fields(user_id = %current.user.id))]
pub async fn update_post(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(slug): Path<String>,
    JsonBody(payload): JsonBody<PostPayload>,
) -> ApiResult<Json<PostResponse>> {
    let changes = payload.validate_update().map_err(ApiError::Validation)?;
    let post = services::update(&state, &current.user, &slug, changes).await?;
    Ok(Json(post.into()))
}

#[instrument(skip(state, current), fields(user_id = %current.user.id))]
pub async fn delete_post(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(slug): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    services::delete(&state, &current.user, &slug).await?;
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}
