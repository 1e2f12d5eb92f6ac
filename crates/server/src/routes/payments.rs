use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use models::payment;
use models::status::PaymentMethod;
use serde::Deserialize;
use service::pagination::Paged;
use service::payment_service::{self, CreatePayment};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{parse_req, PageQuery};
use crate::errors::JsonApiError;
use crate::extract::CurrentUser;
use crate::state::ServerState;

/// Exactly one of `booking_id` and `retouch_order_id`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub booking_id: Option<Uuid>,
    pub retouch_order_id: Option<Uuid>,
    /// `Card`, `Transfer` or `Cash`
    pub method: String,
}

#[utoipa::path(post, path = "/payments", tag = "payments", request_body = CreatePaymentRequest, security(("bearer" = [])), responses((status = 201, description = "Recorded"), (status = 400, description = "Not payable"), (status = 403, description = "Not the client"), (status = 409, description = "Already paid")))]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<payment::Model>), JsonApiError> {
    let method: PaymentMethod = parse_req(&req.method)?;
    let input = CreatePayment { booking_id: req.booking_id, retouch_order_id: req.retouch_order_id, method };
    let p = payment_service::create(&state.db, &actor, input).await?;
    Ok((StatusCode::CREATED, Json(p)))
}

#[utoipa::path(get, path = "/payments", tag = "payments", params(PageQuery), security(("bearer" = [])), responses((status = 200, description = "Payments made or received")))]
pub async fn list_mine(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paged<payment::Model>>, JsonApiError> {
    Ok(Json(payment_service::list_mine(&state.db, &actor, page.into()).await?))
}

#[utoipa::path(get, path = "/payments/{id}", tag = "payments", params(("id" = Uuid, Path, description = "Payment ID")), security(("bearer" = [])), responses((status = 200, description = "Payment"), (status = 403, description = "Not a party"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<payment::Model>, JsonApiError> {
    Ok(Json(payment_service::get(&state.db, &actor, id).await?))
}

#[utoipa::path(post, path = "/payments/{id}/confirm", tag = "payments", params(("id" = Uuid, Path, description = "Payment ID")), security(("bearer" = [])), responses((status = 200, description = "Confirmed"), (status = 400, description = "Not pending"), (status = 403, description = "Not the payee")))]
pub async fn confirm(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<payment::Model>, JsonApiError> {
    Ok(Json(payment_service::confirm(&state.db, &actor, id).await?))
}

#[utoipa::path(post, path = "/admin/payments/{id}/refund", tag = "admin", params(("id" = Uuid, Path, description = "Payment ID")), security(("bearer" = [])), responses((status = 200, description = "Refunded"), (status = 400, description = "Not completed"), (status = 403, description = "Forbidden")))]
pub async fn refund(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<payment::Model>, JsonApiError> {
    Ok(Json(payment_service::refund(&state.db, &actor, id).await?))
}
