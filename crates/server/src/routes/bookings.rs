use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use models::booking;
use models::status::BookingStatus;
use serde::Deserialize;
use service::booking_service::{self, BookingView, CreateBooking};
use service::pagination::Paged;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{parse_opt, parse_req, PageQuery, PartyQuery, StatusQuery};
use crate::errors::JsonApiError;
use crate::extract::CurrentUser;
use crate::state::ServerState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub photographer_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub location: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusRequest {
    pub status: String,
}

fn booking_view(raw: Option<&str>) -> Result<BookingView, JsonApiError> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("client") => Ok(BookingView::Client),
        Some("photographer") => Ok(BookingView::Photographer),
        Some(other) => Err(JsonApiError::bad_request(format!("unknown view '{other}'"))),
    }
}

#[utoipa::path(post, path = "/bookings", tag = "bookings", request_body = CreateBookingRequest, security(("bearer" = [])), responses((status = 201, description = "Requested"), (status = 400, description = "Bad Request"), (status = 404, description = "Unknown photographer")))]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<booking::Model>), JsonApiError> {
    let input = CreateBooking {
        photographer_id: req.photographer_id,
        start_at: req.start_at,
        duration_minutes: req.duration_minutes,
        location: req.location,
        notes: req.notes,
    };
    let b = booking_service::create(&state.db, &actor, input).await?;
    Ok((StatusCode::CREATED, Json(b)))
}

#[utoipa::path(get, path = "/bookings", tag = "bookings", params(PartyQuery, PageQuery), security(("bearer" = [])), responses((status = 200, description = "Caller's bookings")))]
pub async fn list_mine(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Query(filter): Query<PartyQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paged<booking::Model>>, JsonApiError> {
    let view = booking_view(filter.view.as_deref())?;
    let status: Option<BookingStatus> = parse_opt(filter.status.as_deref())?;
    Ok(Json(booking_service::list_mine(&state.db, &actor, view, status, page.into()).await?))
}

#[utoipa::path(get, path = "/bookings/{id}", tag = "bookings", params(("id" = Uuid, Path, description = "Booking ID")), security(("bearer" = [])), responses((status = 200, description = "Booking"), (status = 403, description = "Not a party"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<booking::Model>, JsonApiError> {
    Ok(Json(booking_service::get(&state.db, &actor, id).await?))
}

#[utoipa::path(patch, path = "/bookings/{id}/status", tag = "bookings", params(("id" = Uuid, Path, description = "Booking ID")), request_body = StatusRequest, security(("bearer" = [])), responses((status = 200, description = "Moved"), (status = 400, description = "Illegal transition or overlap"), (status = 403, description = "Forbidden")))]
pub async fn change_status(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<booking::Model>, JsonApiError> {
    let next: BookingStatus = parse_req(&req.status)?;
    Ok(Json(booking_service::change_status(&state.db, &actor, id, next).await?))
}

#[utoipa::path(get, path = "/admin/bookings", tag = "admin", params(StatusQuery, PageQuery), security(("bearer" = [])), responses((status = 200, description = "All bookings"), (status = 403, description = "Forbidden")))]
pub async fn admin_list(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Query(filter): Query<StatusQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paged<booking::Model>>, JsonApiError> {
    let status: Option<BookingStatus> = parse_opt(filter.status.as_deref())?;
    Ok(Json(booking_service::admin_list(&state.db, &actor, status, page.into()).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_defaults_to_client() {
        assert_eq!(booking_view(None).unwrap(), BookingView::Client);
        assert_eq!(booking_view(Some("Photographer")).unwrap(), BookingView::Photographer);
        assert!(booking_view(Some("retoucher")).is_err());
    }
}
