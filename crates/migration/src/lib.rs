//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_user;
mod m20240601_000002_create_user_credentials;
mod m20240601_000003_create_photographer;
mod m20240601_000004_create_retoucher;
mod m20240601_000005_create_role_application;
mod m20240601_000006_create_booking;
mod m20240601_000007_create_photo;
mod m20240601_000008_create_retouch_order;
mod m20240601_000009_create_payment;
mod m20240601_000010_create_post;
mod m20240601_000011_create_follow;
mod m20240601_000012_create_notification;
mod m20240601_000013_create_portfolio;
mod m20240601_000020_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_user::Migration),
            Box::new(m20240601_000002_create_user_credentials::Migration),
            Box::new(m20240601_000003_create_photographer::Migration),
            Box::new(m20240601_000004_create_retoucher::Migration),
            Box::new(m20240601_000005_create_role_application::Migration),
            Box::new(m20240601_000006_create_booking::Migration),
            Box::new(m20240601_000007_create_photo::Migration),
            Box::new(m20240601_000008_create_retouch_order::Migration),
            Box::new(m20240601_000009_create_payment::Migration),
            Box::new(m20240601_000010_create_post::Migration),
            Box::new(m20240601_000011_create_follow::Migration),
            Box::new(m20240601_000012_create_notification::Migration),
            Box::new(m20240601_000013_create_portfolio::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000020_add_indexes::Migration),
        ]
    }
}
