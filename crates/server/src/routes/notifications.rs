use axum::extract::{Path, Query, State};
use axum::Json;
use models::notification;
use serde::{Deserialize, Serialize};
use service::notification_service;
use service::pagination::Paged;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::dto::PageQuery;
use crate::errors::JsonApiError;
use crate::extract::CurrentUser;
use crate::state::ServerState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UnreadQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Serialize, ToSchema)]
pub struct UnreadCount {
    pub unread: u64,
}

#[derive(Serialize, ToSchema)]
pub struct Updated {
    pub updated: u64,
}

#[utoipa::path(get, path = "/notifications", tag = "notifications", params(UnreadQuery, PageQuery), security(("bearer" = [])), responses((status = 200, description = "Newest first")))]
pub async fn list(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Query(filter): Query<UnreadQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paged<notification::Model>>, JsonApiError> {
    Ok(Json(notification_service::list(&state.db, &actor, filter.unread_only, page.into()).await?))
}

#[utoipa::path(get, path = "/notifications/unread-count", tag = "notifications", security(("bearer" = [])), responses((status = 200, body = UnreadCount)))]
pub async fn unread_count(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<UnreadCount>, JsonApiError> {
    let unread = notification_service::unread_count(&state.db, &actor).await?;
    Ok(Json(UnreadCount { unread }))
}

#[utoipa::path(post, path = "/notifications/{id}/read", tag = "notifications", params(("id" = Uuid, Path, description = "Notification ID")), security(("bearer" = [])), responses((status = 200, description = "Marked read"), (status = 404, description = "Not Found")))]
pub async fn mark_read(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<notification::Model>, JsonApiError> {
    Ok(Json(notification_service::mark_read(&state.db, &actor, id).await?))
}

#[utoipa::path(post, path = "/notifications/read-all", tag = "notifications", security(("bearer" = [])), responses((status = 200, body = Updated)))]
pub async fn mark_all_read(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Updated>, JsonApiError> {
    let updated = notification_service::mark_all_read(&state.db, &actor).await?;
    Ok(Json(Updated { updated }))
}
