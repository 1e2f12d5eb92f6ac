use std::collections::HashMap;

use models::notification::NotificationKind;
use models::{follow, user};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QueryOrder, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use crate::actor::Actor;
use crate::errors::ServiceError;
use crate::notification_service::notify;
use crate::pagination::{fetch_page, Paged, Pagination};

pub async fn follow(db: &DatabaseConnection, actor: &Actor, target: Uuid) -> Result<follow::Model, ServiceError> {
    if target == actor.user_id {
        return Err(ServiceError::Validation("cannot follow yourself".into()));
    }
    if user::Entity::find_by_id(target).one(db).await?.is_none() {
        return Err(ServiceError::not_found("user"));
    }
    if follow::find_pair(db, actor.user_id, target).await?.is_some() {
        return Err(ServiceError::Conflict("already following".into()));
    }
    let txn = db.begin().await?;
    let f = follow::create(&txn, actor.user_id, target).await?;
    notify(&txn, target, NotificationKind::NewFollower, format!("{} started following you", actor.username), Some(actor.user_id)).await?;
    txn.commit().await?;
    info!(follower_id = %actor.user_id, followed_id = %target, "follow created");
    Ok(f)
}

pub async fn unfollow(db: &DatabaseConnection, actor: &Actor, target: Uuid) -> Result<(), ServiceError> {
    let f = follow::find_pair(db, actor.user_id, target)
        .await?
        .ok_or_else(|| ServiceError::NotFound("not following this user".into()))?;
    f.delete(db).await?;
    Ok(())
}

/// Resolve a page of follow rows to users, keeping the page order.
async fn users_for(
    db: &DatabaseConnection,
    page: Paged<follow::Model>,
    pick: fn(&follow::Model) -> Uuid,
) -> Result<Paged<user::Model>, ServiceError> {
    let ids: Vec<Uuid> = page.items.iter().map(pick).collect();
    let mut by_id: HashMap<Uuid, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let items = ids.iter().filter_map(|id| by_id.remove(id)).collect();
    Ok(Paged { items, page: page.page, per_page: page.per_page, total: page.total })
}

pub async fn followers(db: &DatabaseConnection, user_id: Uuid, opts: Pagination) -> Result<Paged<user::Model>, ServiceError> {
    let select = follow::Entity::find()
        .filter(follow::Column::FollowedId.eq(user_id))
        .order_by_desc(follow::Column::CreatedAt);
    let page = fetch_page(db, select, opts).await?;
    users_for(db, page, |f| f.follower_id).await
}

pub async fn following(db: &DatabaseConnection, user_id: Uuid, opts: Pagination) -> Result<Paged<user::Model>, ServiceError> {
    let select = follow::Entity::find()
        .filter(follow::Column::FollowerId.eq(user_id))
        .order_by_desc(follow::Column::CreatedAt);
    let page = fetch_page(db, select, opts).await?;
    users_for(db, page, |f| f.followed_id).await
}
