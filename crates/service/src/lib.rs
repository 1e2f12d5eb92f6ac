//! Service layer providing business operations on top of models.
//! - Separates business logic and authorization from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Every operation takes the calling [`actor::Actor`] where access depends on who asks.

pub mod errors;
pub mod pagination;
pub mod actor;
pub mod auth;
pub mod user_service;
pub mod role_service;
pub mod photographer_service;
pub mod retoucher_service;
pub mod booking_service;
pub mod photo_service;
pub mod retouch_order_service;
pub mod payment_service;
pub mod post_service;
pub mod follow_service;
pub mod notification_service;
pub mod portfolio_service;
#[cfg(test)]
pub mod test_support;
