use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use models::role::Role;
use models::{follow, user};
use serde::Deserialize;
use service::pagination::Paged;
use service::{follow_service, role_service, user_service};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{parse_req, PageQuery, ProfileView, UserView};
use crate::errors::JsonApiError;
use crate::extract::CurrentUser;
use crate::state::ServerState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMeRequest {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetAdminRequest {
    pub is_admin: bool,
}

#[utoipa::path(get, path = "/users/{id}", tag = "users", params(("id" = Uuid, Path, description = "User ID")), responses((status = 200, body = ProfileView), (status = 404, description = "Not Found")))]
pub async fn get_profile(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<ProfileView>, JsonApiError> {
    Ok(Json(user_service::get_profile(&state.db, id).await?.into()))
}

#[utoipa::path(put, path = "/users/me", tag = "users", request_body = UpdateMeRequest, security(("bearer" = [])), responses((status = 200, description = "Updated account"), (status = 400, description = "Bad Request")))]
pub async fn update_me(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<UpdateMeRequest>,
) -> Result<Json<user::Model>, JsonApiError> {
    let patch = user::ProfilePatch { display_name: req.display_name, bio: req.bio, avatar_url: req.avatar_url };
    Ok(Json(user_service::update_me(&state.db, &actor, patch).await?))
}

#[utoipa::path(post, path = "/users/{id}/follow", tag = "users", params(("id" = Uuid, Path, description = "User ID")), security(("bearer" = [])), responses((status = 201, description = "Following"), (status = 400, description = "Self follow"), (status = 409, description = "Already following")))]
pub async fn follow(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<follow::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(follow_service::follow(&state.db, &actor, id).await?)))
}

#[utoipa::path(delete, path = "/users/{id}/follow", tag = "users", params(("id" = Uuid, Path, description = "User ID")), security(("bearer" = [])), responses((status = 204, description = "Unfollowed"), (status = 404, description = "Not following")))]
pub async fn unfollow(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    follow_service::unfollow(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/users/{id}/followers", tag = "users", params(("id" = Uuid, Path, description = "User ID"), PageQuery), responses((status = 200, description = "Followers")))]
pub async fn followers(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paged<UserView>>, JsonApiError> {
    let paged = follow_service::followers(&state.db, id, page.into()).await?;
    Ok(Json(paged.map(UserView::from)))
}

#[utoipa::path(get, path = "/users/{id}/following", tag = "users", params(("id" = Uuid, Path, description = "User ID"), PageQuery), responses((status = 200, description = "Followed users")))]
pub async fn following(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paged<UserView>>, JsonApiError> {
    let paged = follow_service::following(&state.db, id, page.into()).await?;
    Ok(Json(paged.map(UserView::from)))
}

#[utoipa::path(get, path = "/admin/users", tag = "admin", params(PageQuery), security(("bearer" = [])), responses((status = 200, description = "All users"), (status = 403, description = "Forbidden")))]
pub async fn admin_list(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paged<user::Model>>, JsonApiError> {
    Ok(Json(user_service::list_users(&state.db, &actor, page.into()).await?))
}

#[utoipa::path(put, path = "/admin/users/{id}/admin", tag = "admin", params(("id" = Uuid, Path, description = "User ID")), request_body = SetAdminRequest, security(("bearer" = [])), responses((status = 200, description = "Updated"), (status = 400, description = "Cannot demote self")))]
pub async fn set_admin(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SetAdminRequest>,
) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(user_service::set_admin(&state.db, &actor, id, req.is_admin).await?))
}

#[utoipa::path(delete, path = "/admin/users/{id}/roles/{role}", tag = "admin", params(("id" = Uuid, Path, description = "User ID"), ("role" = String, Path, description = "Photographer or Retoucher")), security(("bearer" = [])), responses((status = 204, description = "Revoked"), (status = 404, description = "Role not held")))]
pub async fn revoke_role(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path((id, role)): Path<(Uuid, String)>,
) -> Result<StatusCode, JsonApiError> {
    let role: Role = parse_req(&role)?;
    role_service::revoke(&state.db, &actor, id, role).await?;
    Ok(StatusCode::NO_CONTENT)
}
