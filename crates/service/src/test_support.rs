#![cfg(test)]
use migration::MigratorTrait;
use models::{photographer, retoucher, user};
use sea_orm::{Database, DatabaseConnection};

use crate::actor::Actor;

/// Fresh in-memory database with every migration applied.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = Database::connect("sqlite::memory:").await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn user(db: &DatabaseConnection, username: &str) -> Result<user::Model, anyhow::Error> {
    Ok(user::create(db, username, &format!("{username}@example.com"), username).await?)
}

pub async fn admin(db: &DatabaseConnection, username: &str) -> Result<user::Model, anyhow::Error> {
    let u = user(db, username).await?;
    Ok(user::set_admin(db, u, true).await?)
}

pub async fn photographer(
    db: &DatabaseConnection,
    username: &str,
    hourly_rate_cents: i64,
) -> Result<(user::Model, photographer::Model), anyhow::Error> {
    let u = user(db, username).await?;
    let p = photographer::activate(db, u.id, hourly_rate_cents, Some("Lisbon".into())).await?;
    Ok((u, p))
}

pub async fn retoucher(
    db: &DatabaseConnection,
    username: &str,
    price_per_photo_cents: i64,
) -> Result<(user::Model, retoucher::Model), anyhow::Error> {
    let u = user(db, username).await?;
    let r = retoucher::activate(db, u.id, price_per_photo_cents).await?;
    Ok((u, r))
}

pub async fn actor(db: &DatabaseConnection, u: &user::Model) -> Result<Actor, anyhow::Error> {
    Ok(Actor::load(db, u.id).await?)
}
