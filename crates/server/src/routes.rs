use axum::{
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod auth;
pub mod bookings;
pub mod notifications;
pub mod payments;
pub mod photos;
pub mod portfolios;
pub mod posts;
pub mod profiles;
pub mod retouch_orders;
pub mod roles;
pub mod users;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

fn api_routes() -> Router<ServerState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/users/me", put(users::update_me))
        .route("/users/:id", get(users::get_profile))
        .route("/users/:id/follow", post(users::follow).delete(users::unfollow))
        .route("/users/:id/followers", get(users::followers))
        .route("/users/:id/following", get(users::following))
        .route("/role-applications", post(roles::apply))
        .route("/role-applications/mine", get(roles::mine))
        .route("/photographers", get(profiles::list_photographers))
        .route("/photographers/me", put(profiles::update_photographer))
        .route("/photographers/:id", get(profiles::get_photographer))
        .route("/photographers/:id/portfolios", get(portfolios::list_for_photographer))
        .route("/retouchers", get(profiles::list_retouchers))
        .route("/retouchers/me", put(profiles::update_retoucher))
        .route("/retouchers/:id", get(profiles::get_retoucher))
        .route("/bookings", post(bookings::create).get(bookings::list_mine))
        .route("/bookings/:id", get(bookings::get))
        .route("/bookings/:id/status", patch(bookings::change_status))
        .route("/bookings/:id/photos", post(photos::batch_create).get(photos::list_for_booking))
        .route("/photos", post(photos::create))
        .route("/photos/:id", get(photos::get).delete(photos::delete))
        .route("/retouch-orders", post(retouch_orders::create).get(retouch_orders::list_mine))
        .route("/retouch-orders/:id", get(retouch_orders::get))
        .route("/retouch-orders/:id/status", patch(retouch_orders::change_status))
        .route("/retouch-orders/:id/complete", post(retouch_orders::complete))
        .route("/payments", post(payments::create).get(payments::list_mine))
        .route("/payments/:id", get(payments::get))
        .route("/payments/:id/confirm", post(payments::confirm))
        .route("/posts", post(posts::create).get(posts::list))
        .route("/posts/feed", get(posts::feed))
        .route("/posts/:id", get(posts::get).put(posts::update).delete(posts::delete))
        .route("/notifications", get(notifications::list))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/:id/read", post(notifications::mark_read))
        .route("/portfolios", post(portfolios::create))
        .route("/portfolios/:id", get(portfolios::get).delete(portfolios::delete))
        .route("/portfolios/:id/items", post(portfolios::add_item))
        .route("/portfolios/:id/items/:item_id", delete(portfolios::remove_item))
}

fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/admin/users", get(users::admin_list))
        .route("/admin/users/:id/admin", put(users::set_admin))
        .route("/admin/users/:id/roles/:role", delete(users::revoke_role))
        .route("/admin/role-applications", get(roles::admin_list))
        .route("/admin/role-applications/:id/approve", post(roles::approve))
        .route("/admin/role-applications/:id/reject", post(roles::reject))
        .route("/admin/bookings", get(bookings::admin_list))
        .route("/admin/payments/:id/refund", post(payments::refund))
}

/// Build the full application router. Authentication is enforced per handler
/// through the `CurrentUser` extractor; admin checks happen in the services.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(api_routes())
        .merge(admin_routes())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
