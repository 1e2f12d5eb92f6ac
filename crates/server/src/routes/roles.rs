use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use models::role::Role;
use models::role_application;
use models::status::ApplicationStatus;
use serde::Deserialize;
use service::pagination::Paged;
use service::role_service::{self, ApplyInput};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{parse_opt, parse_req, PageQuery, StatusQuery};
use crate::errors::JsonApiError;
use crate::extract::CurrentUser;
use crate::state::ServerState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyRequest {
    /// `Photographer` or `Retoucher`
    pub role: String,
    pub message: String,
    /// Hourly rate for photographers, per-photo price for retouchers
    pub rate_cents: i64,
    pub location: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RejectRequest {
    pub note: Option<String>,
}

#[utoipa::path(post, path = "/role-applications", tag = "roles", request_body = ApplyRequest, security(("bearer" = [])), responses((status = 201, description = "Submitted"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn apply(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<role_application::Model>), JsonApiError> {
    let role: Role = parse_req(&req.role)?;
    let input = ApplyInput { role, message: req.message, rate_cents: req.rate_cents, location: req.location };
    let app = role_service::apply(&state.db, &actor, input).await?;
    Ok((StatusCode::CREATED, Json(app)))
}

#[utoipa::path(get, path = "/role-applications/mine", tag = "roles", security(("bearer" = [])), responses((status = 200, description = "Own applications")))]
pub async fn mine(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<role_application::Model>>, JsonApiError> {
    Ok(Json(role_service::my_applications(&state.db, &actor).await?))
}

#[utoipa::path(get, path = "/admin/role-applications", tag = "admin", params(StatusQuery, PageQuery), security(("bearer" = [])), responses((status = 200, description = "Applications"), (status = 403, description = "Forbidden")))]
pub async fn admin_list(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Query(filter): Query<StatusQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paged<role_application::Model>>, JsonApiError> {
    let status: Option<ApplicationStatus> = parse_opt(filter.status.as_deref())?;
    Ok(Json(role_service::list_applications(&state.db, &actor, status, page.into()).await?))
}

#[utoipa::path(post, path = "/admin/role-applications/{id}/approve", tag = "admin", params(("id" = Uuid, Path, description = "Role application ID")), security(("bearer" = [])), responses((status = 200, description = "Approved"), (status = 400, description = "Already decided")))]
pub async fn approve(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<role_application::Model>, JsonApiError> {
    Ok(Json(role_service::approve(&state.db, &actor, id).await?))
}

#[utoipa::path(post, path = "/admin/role-applications/{id}/reject", tag = "admin", params(("id" = Uuid, Path, description = "Role application ID")), request_body = RejectRequest, security(("bearer" = [])), responses((status = 200, description = "Rejected"), (status = 400, description = "Already decided")))]
pub async fn reject(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    body: Option<Json<RejectRequest>>,
) -> Result<Json<role_application::Model>, JsonApiError> {
    let note = body.and_then(|Json(r)| r.note);
    Ok(Json(role_service::reject(&state.db, &actor, id, note).await?))
}
