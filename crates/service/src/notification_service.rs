use models::notification::{self, NotificationKind};
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::debug;
use uuid::Uuid;

use crate::actor::Actor;
use crate::errors::ServiceError;
use crate::pagination::{fetch_page, Paged, Pagination};

/// Queue a notification inside the caller's transaction.
pub(crate) async fn notify<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    kind: NotificationKind,
    message: impl Into<String>,
    reference_id: Option<Uuid>,
) -> Result<(), ServiceError> {
    let n = notification::create(db, user_id, kind, message, reference_id).await?;
    debug!(notification_id = %n.id, user_id = %user_id, kind = %kind, "notification queued");
    Ok(())
}

/// The caller's notifications, newest first.
pub async fn list(
    db: &DatabaseConnection,
    actor: &Actor,
    unread_only: bool,
    opts: Pagination,
) -> Result<Paged<notification::Model>, ServiceError> {
    let mut select = notification::Entity::find().filter(notification::Column::UserId.eq(actor.user_id));
    if unread_only {
        select = select.filter(notification::Column::IsRead.eq(false));
    }
    let select = select
        .order_by_desc(notification::Column::CreatedAt)
        .order_by_desc(notification::Column::Id);
    fetch_page(db, select, opts).await
}

pub async fn unread_count(db: &DatabaseConnection, actor: &Actor) -> Result<u64, ServiceError> {
    Ok(notification::count_unread(db, actor.user_id).await?)
}

/// Another user's notification is reported as missing.
pub async fn mark_read(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<notification::Model, ServiceError> {
    let n = notification::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|n| n.user_id == actor.user_id)
        .ok_or_else(|| ServiceError::not_found("notification"))?;
    Ok(notification::mark_read(db, n).await?)
}

pub async fn mark_all_read(db: &DatabaseConnection, actor: &Actor) -> Result<u64, ServiceError> {
    Ok(notification::mark_all_read(db, actor.user_id).await?)
}
