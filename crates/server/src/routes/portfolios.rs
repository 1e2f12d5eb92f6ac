use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use models::{portfolio, portfolio_item};
use serde::Deserialize;
use service::portfolio_service::{self, PortfolioWithItems};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::extract::CurrentUser;
use crate::state::ServerState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePortfolioRequest {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemRequest {
    pub photo_id: Uuid,
    pub caption: Option<String>,
}

#[utoipa::path(post, path = "/portfolios", tag = "portfolios", request_body = CreatePortfolioRequest, security(("bearer" = [])), responses((status = 201, description = "Created"), (status = 403, description = "Not a photographer")))]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreatePortfolioRequest>,
) -> Result<(StatusCode, Json<portfolio::Model>), JsonApiError> {
    let folio = portfolio_service::create(&state.db, &actor, &req.title, req.description).await?;
    Ok((StatusCode::CREATED, Json(folio)))
}

#[utoipa::path(get, path = "/photographers/{id}/portfolios", tag = "portfolios", params(("id" = Uuid, Path, description = "Photographer ID")), responses((status = 200, description = "Portfolios"), (status = 404, description = "Unknown photographer")))]
pub async fn list_for_photographer(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<portfolio::Model>>, JsonApiError> {
    Ok(Json(portfolio_service::list_for_photographer(&state.db, id).await?))
}

#[utoipa::path(get, path = "/portfolios/{id}", tag = "portfolios", params(("id" = Uuid, Path, description = "Portfolio ID")), responses((status = 200, description = "Portfolio with items by position"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PortfolioWithItems>, JsonApiError> {
    Ok(Json(portfolio_service::get(&state.db, id).await?))
}

#[utoipa::path(post, path = "/portfolios/{id}/items", tag = "portfolios", params(("id" = Uuid, Path, description = "Portfolio ID")), request_body = AddItemRequest, security(("bearer" = [])), responses((status = 201, description = "Appended"), (status = 403, description = "Not yours")))]
pub async fn add_item(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<portfolio_item::Model>), JsonApiError> {
    let item = portfolio_service::add_item(&state.db, &actor, id, req.photo_id, req.caption).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(delete, path = "/portfolios/{id}/items/{item_id}", tag = "portfolios", params(("id" = Uuid, Path, description = "Portfolio ID"), ("item_id" = Uuid, Path, description = "Portfolio item ID")), security(("bearer" = [])), responses((status = 204, description = "Removed"), (status = 404, description = "Not Found")))]
pub async fn remove_item(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, JsonApiError> {
    portfolio_service::remove_item(&state.db, &actor, id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(delete, path = "/portfolios/{id}", tag = "portfolios", params(("id" = Uuid, Path, description = "Portfolio ID")), security(("bearer" = [])), responses((status = 204, description = "Deleted"), (status = 403, description = "Forbidden")))]
pub async fn delete(
    State(state): State<ServerState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    portfolio_service::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
