use models::photo;
use models::retouch_order;
use models::retoucher;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::actor::Actor;
use crate::booking_service::{self, BookingCtx};
use crate::errors::ServiceError;

pub const MAX_BATCH: usize = 50;

#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub url: String,
    pub title: Option<String>,
}

/// Outcome of a best-effort batch registration.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub created: Vec<photo::Model>,
    pub failed: Vec<BatchFailure>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BatchFailure {
    pub index: usize,
    pub error: String,
}

/// Only the booking's photographer may attach photos, and only once the shoot started.
async fn booking_for_upload(db: &DatabaseConnection, actor: &Actor, booking_id: Uuid) -> Result<BookingCtx, ServiceError> {
    let ctx = booking_service::load(db, booking_id).await?;
    if !ctx.is_photographer(actor) {
        return Err(ServiceError::forbidden("only the booking's photographer can upload photos"));
    }
    let status = ctx.booking.status()?;
    if !status.accepts_photos() {
        return Err(ServiceError::InvalidState(format!("cannot attach photos to a {status} booking")));
    }
    Ok(ctx)
}

pub async fn create(
    db: &DatabaseConnection,
    actor: &Actor,
    booking_id: Option<Uuid>,
    input: NewPhoto,
) -> Result<photo::Model, ServiceError> {
    if let Some(id) = booking_id {
        booking_for_upload(db, actor, id).await?;
    }
    let p = photo::create(db, actor.user_id, booking_id, &input.url, input.title).await?;
    info!(photo_id = %p.id, owner_id = %actor.user_id, "photo registered");
    Ok(p)
}

/// Register many photos for a booking. A failing item is reported and skipped;
/// it never aborts the others.
#[instrument(skip(db, items), fields(user_id = %actor.user_id, count = items.len()))]
pub async fn batch_create(
    db: &DatabaseConnection,
    actor: &Actor,
    booking_id: Uuid,
    items: Vec<NewPhoto>,
) -> Result<BatchOutcome, ServiceError> {
    if items.is_empty() {
        return Err(ServiceError::Validation("photos must not be empty".into()));
    }
    if items.len() > MAX_BATCH {
        return Err(ServiceError::Validation(format!("at most {MAX_BATCH} photos per batch")));
    }
    booking_for_upload(db, actor, booking_id).await?;

    let mut outcome = BatchOutcome { created: Vec::with_capacity(items.len()), failed: Vec::new() };
    for (index, item) in items.into_iter().enumerate() {
        match photo::create(db, actor.user_id, Some(booking_id), &item.url, item.title).await {
            Ok(p) => outcome.created.push(p),
            Err(e) => {
                warn!(index, error = %e, "batch photo skipped");
                outcome.failed.push(BatchFailure { index, error: ServiceError::from(e).to_string() });
            }
        }
    }
    info!(created = outcome.created.len(), failed = outcome.failed.len(), "batch registered");
    Ok(outcome)
}

async fn find(db: &DatabaseConnection, id: Uuid) -> Result<photo::Model, ServiceError> {
    photo::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("photo"))
}

/// Owner, admin, the client of the photo's booking, or a retoucher working on it.
async fn can_view(db: &DatabaseConnection, actor: &Actor, p: &photo::Model) -> Result<bool, ServiceError> {
    if p.owner_id == actor.user_id || actor.is_admin() {
        return Ok(true);
    }
    if let Some(booking_id) = p.booking_id {
        if booking_service::load(db, booking_id).await?.is_party(actor) {
            return Ok(true);
        }
    }
    if let Some(r) = retoucher::find_by_user(db, actor.user_id).await? {
        let assigned = retouch_order::Entity::find()
            .filter(retouch_order::Column::PhotoId.eq(p.id))
            .filter(retouch_order::Column::RetoucherId.eq(r.id))
            .one(db)
            .await?;
        return Ok(assigned.is_some());
    }
    Ok(false)
}

pub async fn get(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<photo::Model, ServiceError> {
    let p = find(db, id).await?;
    if !can_view(db, actor, &p).await? {
        return Err(ServiceError::forbidden("not allowed to view this photo"));
    }
    Ok(p)
}

pub async fn list_for_booking(db: &DatabaseConnection, actor: &Actor, booking_id: Uuid) -> Result<Vec<photo::Model>, ServiceError> {
    let ctx = booking_service::load(db, booking_id).await?;
    if !ctx.is_party(actor) {
        return Err(ServiceError::forbidden("not a party to this booking"));
    }
    Ok(photo::Entity::find()
        .filter(photo::Column::BookingId.eq(booking_id))
        .order_by_asc(photo::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    let p = find(db, id).await?;
    if p.owner_id != actor.user_id && !actor.is_admin() {
        return Err(ServiceError::forbidden("only the owner can delete this photo"));
    }
    if retouch_order::references_photo(db, p.id).await? {
        return Err(ServiceError::InvalidState("photo is referenced by a retouch order".into()));
    }
    p.delete(db).await?;
    info!(photo_id = %id, "photo deleted");
    Ok(())
}
