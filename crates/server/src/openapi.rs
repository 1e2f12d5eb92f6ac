use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::routes::{
    auth, bookings, notifications, payments, photos, portfolios, posts, profiles, retouch_orders, roles, users,
};

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Mirrors `service::auth::domain::RegisterInput` for the docs.
#[derive(ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub display_name: String,
    /// 8 to 128 characters
    pub password: String,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    /// Username or email address
    pub login: String,
    pub password: String,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        users::get_profile,
        users::update_me,
        users::follow,
        users::unfollow,
        users::followers,
        users::following,
        users::admin_list,
        users::set_admin,
        users::revoke_role,
        roles::apply,
        roles::mine,
        roles::admin_list,
        roles::approve,
        roles::reject,
        profiles::list_photographers,
        profiles::get_photographer,
        profiles::update_photographer,
        profiles::list_retouchers,
        profiles::get_retoucher,
        profiles::update_retoucher,
        bookings::create,
        bookings::list_mine,
        bookings::get,
        bookings::change_status,
        bookings::admin_list,
        photos::create,
        photos::batch_create,
        photos::list_for_booking,
        photos::get,
        photos::delete,
        retouch_orders::create,
        retouch_orders::list_mine,
        retouch_orders::get,
        retouch_orders::change_status,
        retouch_orders::complete,
        payments::create,
        payments::list_mine,
        payments::get,
        payments::confirm,
        payments::refund,
        posts::create,
        posts::list,
        posts::feed,
        posts::get,
        posts::update,
        posts::delete,
        notifications::list,
        notifications::unread_count,
        notifications::mark_read,
        notifications::mark_all_read,
        portfolios::create,
        portfolios::list_for_photographer,
        portfolios::get,
        portfolios::add_item,
        portfolios::remove_item,
        portfolios::delete,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            auth::LoginOutput,
            crate::dto::UserView,
            crate::dto::MeView,
            crate::dto::ProfileView,
            users::UpdateMeRequest,
            users::SetAdminRequest,
            roles::ApplyRequest,
            roles::RejectRequest,
            profiles::UpdatePhotographerRequest,
            profiles::UpdateRetoucherRequest,
            bookings::CreateBookingRequest,
            bookings::StatusRequest,
            photos::CreatePhotoRequest,
            photos::PhotoItem,
            photos::BatchRequest,
            retouch_orders::CreateOrderRequest,
            retouch_orders::CompleteRequest,
            payments::CreatePaymentRequest,
            posts::CreatePostRequest,
            posts::UpdatePostRequest,
            notifications::UnreadCount,
            notifications::Updated,
            portfolios::CreatePortfolioRequest,
            portfolios::AddItemRequest,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "roles"),
        (name = "profiles"),
        (name = "bookings"),
        (name = "photos"),
        (name = "retouch-orders"),
        (name = "payments"),
        (name = "posts"),
        (name = "notifications"),
        (name = "portfolios"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
