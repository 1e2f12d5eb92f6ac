use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use models::photo;
use serde::Deserialize;
use service::photo_service::{self, BatchOutcome, NewPhoto};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::extract::CurrentUser;
use crate::state::ServerState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePhotoRequest {
    pub url: String,
    pub title: Option<String>,
    pub booking_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PhotoItem {
    pub url: String,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchRequest {
    pub photos: Vec<PhotoItem>,
}

#[utoipa::path(post, path = "/photos", tag = "photos", request_body = CreatePhotoRequest, security(("bearer" = [])), responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 403, description = "Not the booking's photographer")))]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreatePhotoRequest>,
) -> Result<(StatusCode, Json<photo::Model>), JsonApiError> {
    let input = NewPhoto { url: req.url, title: req.title };
    let p = photo_service::create(&state.db, &actor, req.booking_id, input).await?;
    Ok((StatusCode::CREATED, Json(p)))
}

/// Best-effort: the response lists what was stored and why the rest was not.
#[utoipa::path(post, path = "/bookings/{id}/photos", tag = "photos", params(("id" = Uuid, Path, description = "Booking ID")), request_body = BatchRequest, security(("bearer" = [])), responses((status = 200, description = "Created and failed items"), (status = 400, description = "Empty or oversized batch")))]
pub async fn batch_create(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<BatchOutcome>, JsonApiError> {
    let items = req.photos.into_iter().map(|p| NewPhoto { url: p.url, title: p.title }).collect();
    Ok(Json(photo_service::batch_create(&state.db, &actor, booking_id, items).await?))
}

#[utoipa::path(get, path = "/bookings/{id}/photos", tag = "photos", params(("id" = Uuid, Path, description = "Booking ID")), security(("bearer" = [])), responses((status = 200, description = "Photos of the booking"), (status = 403, description = "Not a party")))]
pub async fn list_for_booking(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Vec<photo::Model>>, JsonApiError> {
    Ok(Json(photo_service::list_for_booking(&state.db, &actor, booking_id).await?))
}

#[utoipa::path(get, path = "/photos/{id}", tag = "photos", params(("id" = Uuid, Path, description = "Photo ID")), security(("bearer" = [])), responses((status = 200, description = "Photo"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<photo::Model>, JsonApiError> {
    Ok(Json(photo_service::get(&state.db, &actor, id).await?))
}

#[utoipa::path(delete, path = "/photos/{id}", tag = "photos", params(("id" = Uuid, Path, description = "Photo ID")), security(("bearer" = [])), responses((status = 204, description = "Deleted"), (status = 400, description = "Referenced by a retouch order")))]
pub async fn delete(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    photo_service::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
