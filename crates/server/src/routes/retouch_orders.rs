use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use models::retouch_order;
use models::status::RetouchOrderStatus;
use serde::Deserialize;
use service::pagination::Paged;
use service::retouch_order_service::{self, CreateOrder, OrderView};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{parse_opt, parse_req, PageQuery, PartyQuery};
use crate::errors::JsonApiError;
use crate::extract::CurrentUser;
use crate::routes::bookings::StatusRequest;
use crate::state::ServerState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub retoucher_id: Uuid,
    pub photo_id: Uuid,
    pub instructions: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompleteRequest {
    pub result_url: String,
}

fn order_view(raw: Option<&str>) -> Result<OrderView, JsonApiError> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("client") => Ok(OrderView::Client),
        Some("retoucher") => Ok(OrderView::Retoucher),
        Some(other) => Err(JsonApiError::bad_request(format!("unknown view '{other}'"))),
    }
}

#[utoipa::path(post, path = "/retouch-orders", tag = "retouch-orders", request_body = CreateOrderRequest, security(("bearer" = [])), responses((status = 201, description = "Ordered"), (status = 400, description = "Bad Request"), (status = 403, description = "Photo not yours")))]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<retouch_order::Model>), JsonApiError> {
    let input = CreateOrder { retoucher_id: req.retoucher_id, photo_id: req.photo_id, instructions: req.instructions };
    let order = retouch_order_service::create(&state.db, &actor, input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(get, path = "/retouch-orders", tag = "retouch-orders", params(PartyQuery, PageQuery), security(("bearer" = [])), responses((status = 200, description = "Caller's orders")))]
pub async fn list_mine(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Query(filter): Query<PartyQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paged<retouch_order::Model>>, JsonApiError> {
    let view = order_view(filter.view.as_deref())?;
    let status: Option<RetouchOrderStatus> = parse_opt(filter.status.as_deref())?;
    Ok(Json(retouch_order_service::list_mine(&state.db, &actor, view, status, page.into()).await?))
}

#[utoipa::path(get, path = "/retouch-orders/{id}", tag = "retouch-orders", params(("id" = Uuid, Path, description = "Retouch order ID")), security(("bearer" = [])), responses((status = 200, description = "Order"), (status = 403, description = "Not a party"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<retouch_order::Model>, JsonApiError> {
    Ok(Json(retouch_order_service::get(&state.db, &actor, id).await?))
}

#[utoipa::path(patch, path = "/retouch-orders/{id}/status", tag = "retouch-orders", params(("id" = Uuid, Path, description = "Retouch order ID")), request_body = StatusRequest, security(("bearer" = [])), responses((status = 200, description = "Moved"), (status = 400, description = "Illegal transition"), (status = 403, description = "Forbidden")))]
pub async fn change_status(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<retouch_order::Model>, JsonApiError> {
    let next: RetouchOrderStatus = parse_req(&req.status)?;
    Ok(Json(retouch_order_service::change_status(&state.db, &actor, id, next).await?))
}

#[utoipa::path(post, path = "/retouch-orders/{id}/complete", tag = "retouch-orders", params(("id" = Uuid, Path, description = "Retouch order ID")), request_body = CompleteRequest, security(("bearer" = [])), responses((status = 200, description = "Completed"), (status = 400, description = "Not in progress"), (status = 403, description = "Not the retoucher")))]
pub async fn complete(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CompleteRequest>,
) -> Result<Json<retouch_order::Model>, JsonApiError> {
    Ok(Json(retouch_order_service::complete(&state.db, &actor, id, &req.result_url).await?))
}
