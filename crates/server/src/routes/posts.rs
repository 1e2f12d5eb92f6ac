use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use models::post;
use serde::Deserialize;
use service::pagination::Paged;
use service::post_service;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::dto::PageQuery;
use crate::errors::JsonApiError;
use crate::extract::CurrentUser;
use crate::state::ServerState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub content: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    pub content: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorQuery {
    pub author_id: Option<Uuid>,
}

#[utoipa::path(post, path = "/posts", tag = "posts", request_body = CreatePostRequest, security(("bearer" = [])), responses((status = 201, description = "Published"), (status = 400, description = "Bad Request")))]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<post::Model>), JsonApiError> {
    let p = post_service::create(&state.db, &actor, &req.content, req.image_url).await?;
    Ok((StatusCode::CREATED, Json(p)))
}

#[utoipa::path(get, path = "/posts", tag = "posts", params(AuthorQuery, PageQuery), responses((status = 200, description = "Newest first")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<AuthorQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paged<post::Model>>, JsonApiError> {
    Ok(Json(post_service::list(&state.db, filter.author_id, page.into()).await?))
}

#[utoipa::path(get, path = "/posts/feed", tag = "posts", params(PageQuery), security(("bearer" = [])), responses((status = 200, description = "Own and followed authors' posts")))]
pub async fn feed(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paged<post::Model>>, JsonApiError> {
    Ok(Json(post_service::feed(&state.db, &actor, page.into()).await?))
}

#[utoipa::path(get, path = "/posts/{id}", tag = "posts", params(("id" = Uuid, Path, description = "Post ID")), responses((status = 200, description = "Post"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<post::Model>, JsonApiError> {
    Ok(Json(post_service::get(&state.db, id).await?))
}

#[utoipa::path(put, path = "/posts/{id}", tag = "posts", params(("id" = Uuid, Path, description = "Post ID")), request_body = UpdatePostRequest, security(("bearer" = [])), responses((status = 200, description = "Updated"), (status = 403, description = "Not the author")))]
pub async fn update(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<post::Model>, JsonApiError> {
    Ok(Json(post_service::update(&state.db, &actor, id, req.content, req.image_url).await?))
}

#[utoipa::path(delete, path = "/posts/{id}", tag = "posts", params(("id" = Uuid, Path, description = "Post ID")), security(("bearer" = [])), responses((status = 204, description = "Deleted"), (status = 403, description = "Forbidden")))]
pub async fn delete(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    post_service::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
