//! Public directories of photographers and retouchers, plus self-service profile edits.

use axum::extract::{Path, Query, State};
use axum::Json;
use models::{photographer, retoucher};
use serde::Deserialize;
use service::pagination::Paged;
use service::{photographer_service, retoucher_service};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::dto::PageQuery;
use crate::errors::JsonApiError;
use crate::extract::CurrentUser;
use crate::state::ServerState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LocationQuery {
    /// Substring match on the profile location
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePhotographerRequest {
    pub bio: Option<String>,
    pub location: Option<String>,
    pub hourly_rate_cents: Option<i64>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRetoucherRequest {
    pub bio: Option<String>,
    pub price_per_photo_cents: Option<i64>,
    pub is_available: Option<bool>,
}

#[utoipa::path(get, path = "/photographers", tag = "profiles", params(LocationQuery, PageQuery), responses((status = 200, description = "Bookable photographers")))]
pub async fn list_photographers(
    State(state): State<ServerState>,
    Query(filter): Query<LocationQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paged<photographer::Model>>, JsonApiError> {
    Ok(Json(photographer_service::list(&state.db, filter.location.as_deref(), page.into()).await?))
}

#[utoipa::path(get, path = "/photographers/{id}", tag = "profiles", params(("id" = Uuid, Path, description = "Photographer ID")), responses((status = 200, description = "Photographer"), (status = 404, description = "Not Found")))]
pub async fn get_photographer(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<photographer::Model>, JsonApiError> {
    Ok(Json(photographer_service::get(&state.db, id).await?))
}

#[utoipa::path(put, path = "/photographers/me", tag = "profiles", request_body = UpdatePhotographerRequest, security(("bearer" = [])), responses((status = 200, description = "Updated"), (status = 403, description = "Not a photographer")))]
pub async fn update_photographer(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<UpdatePhotographerRequest>,
) -> Result<Json<photographer::Model>, JsonApiError> {
    let patch = photographer::ProfilePatch {
        bio: req.bio,
        location: req.location,
        hourly_rate_cents: req.hourly_rate_cents,
        is_available: req.is_available,
    };
    Ok(Json(photographer_service::update_me(&state.db, &actor, patch).await?))
}

#[utoipa::path(get, path = "/retouchers", tag = "profiles", params(PageQuery), responses((status = 200, description = "Retouchers taking orders")))]
pub async fn list_retouchers(
    State(state): State<ServerState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paged<retoucher::Model>>, JsonApiError> {
    Ok(Json(retoucher_service::list(&state.db, page.into()).await?))
}

#[utoipa::path(get, path = "/retouchers/{id}", tag = "profiles", params(("id" = Uuid, Path, description = "Retoucher ID")), responses((status = 200, description = "Retoucher"), (status = 404, description = "Not Found")))]
pub async fn get_retoucher(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<retoucher::Model>, JsonApiError> {
    Ok(Json(retoucher_service::get(&state.db, id).await?))
}

#[utoipa::path(put, path = "/retouchers/me", tag = "profiles", request_body = UpdateRetoucherRequest, security(("bearer" = [])), responses((status = 200, description = "Updated"), (status = 403, description = "Not a retoucher")))]
pub async fn update_retoucher(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<UpdateRetoucherRequest>,
) -> Result<Json<retoucher::Model>, JsonApiError> {
    let patch = retoucher::ProfilePatch {
        bio: req.bio,
        price_per_photo_cents: req.price_per_photo_cents,
        is_available: req.is_available,
    };
    Ok(Json(retoucher_service::update_me(&state.db, &actor, patch).await?))
}
