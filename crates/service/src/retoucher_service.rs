use models::retoucher::{self, ProfilePatch};
use models::role::Role;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::actor::Actor;
use crate::errors::ServiceError;
use crate::pagination::{fetch_page, Paged, Pagination};

pub async fn list(db: &DatabaseConnection, opts: Pagination) -> Result<Paged<retoucher::Model>, ServiceError> {
    let select = retoucher::Entity::find()
        .filter(retoucher::Column::Active.eq(true))
        .filter(retoucher::Column::IsAvailable.eq(true))
        .order_by_asc(retoucher::Column::CreatedAt);
    fetch_page(db, select, opts).await
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<retoucher::Model, ServiceError> {
    retoucher::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|r| r.active)
        .ok_or_else(|| ServiceError::not_found("retoucher"))
}

pub async fn update_me(db: &DatabaseConnection, actor: &Actor, patch: ProfilePatch) -> Result<retoucher::Model, ServiceError> {
    actor.require(Role::Retoucher)?;
    let profile = retoucher::find_active_by_user(db, actor.user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("retoucher profile"))?;
    Ok(retoucher::update_profile(db, profile, patch).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, get_db};

    #[tokio::test]
    async fn update_and_list() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let (u, r) = test_support::retoucher(&db, "fixer", 250).await?;
        let me = test_support::actor(&db, &u).await?;
        let updated = update_me(&db, &me, ProfilePatch { price_per_photo_cents: Some(400), ..Default::default() }).await?;
        assert_eq!(updated.price_per_photo_cents, 400);
        assert_eq!(get(&db, r.id).await?.price_per_photo_cents, 400);
        assert_eq!(list(&db, Pagination::default()).await?.total, 1);

        update_me(&db, &me, ProfilePatch { is_available: Some(false), ..Default::default() }).await?;
        assert_eq!(list(&db, Pagination::default()).await?.total, 0);
        Ok(())
    }
}
