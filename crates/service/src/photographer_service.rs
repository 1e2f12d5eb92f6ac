use models::photographer::{self, ProfilePatch};
use models::role::Role;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::actor::Actor;
use crate::errors::ServiceError;
use crate::pagination::{fetch_page, Paged, Pagination};

/// Active, available photographers, optionally filtered by a location substring.
pub async fn list(
    db: &DatabaseConnection,
    location: Option<&str>,
    opts: Pagination,
) -> Result<Paged<photographer::Model>, ServiceError> {
    let mut select = photographer::Entity::find()
        .filter(photographer::Column::Active.eq(true))
        .filter(photographer::Column::IsAvailable.eq(true));
    if let Some(loc) = location.map(str::trim).filter(|l| !l.is_empty()) {
        select = select.filter(photographer::Column::Location.contains(loc));
    }
    fetch_page(db, select.order_by_asc(photographer::Column::CreatedAt), opts).await
}

/// Revoked profiles are hidden.
pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<photographer::Model, ServiceError> {
    photographer::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|p| p.active)
        .ok_or_else(|| ServiceError::not_found("photographer"))
}

pub(crate) async fn my_profile(db: &DatabaseConnection, actor: &Actor) -> Result<photographer::Model, ServiceError> {
    actor.require(Role::Photographer)?;
    photographer::find_active_by_user(db, actor.user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("photographer profile"))
}

pub async fn update_me(db: &DatabaseConnection, actor: &Actor, patch: ProfilePatch) -> Result<photographer::Model, ServiceError> {
    let profile = my_profile(db, actor).await?;
    Ok(photographer::update_profile(db, profile, patch).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, get_db};

    #[tokio::test]
    async fn list_hides_unavailable_and_revoked() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let (_, a) = test_support::photographer(&db, "anna", 5000).await?;
        let (ub, _) = test_support::photographer(&db, "bruno", 6000).await?;
        let (_, c) = test_support::photographer(&db, "carla", 7000).await?;
        photographer::deactivate(&db, c.clone()).await?;
        let bruno = test_support::actor(&db, &ub).await?;
        update_me(&db, &bruno, ProfilePatch { is_available: Some(false), ..Default::default() }).await?;

        let page = list(&db, None, Pagination::default()).await?;
        assert_eq!(page.items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![a.id]);
        assert!(matches!(get(&db, c.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn location_filter_matches_substring() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let (u, _) = test_support::photographer(&db, "dora", 5000).await?;
        let me = test_support::actor(&db, &u).await?;
        update_me(&db, &me, ProfilePatch { location: Some("Berlin Mitte".into()), ..Default::default() }).await?;
        test_support::photographer(&db, "emil", 5000).await?;
        assert_eq!(list(&db, Some("Berlin"), Pagination::default()).await?.total, 1);
        assert_eq!(list(&db, Some("  "), Pagination::default()).await?.total, 2);
        Ok(())
    }

    #[tokio::test]
    async fn update_requires_role() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let u = test_support::user(&db, "nobody").await?;
        let me = test_support::actor(&db, &u).await?;
        assert!(matches!(update_me(&db, &me, ProfilePatch::default()).await, Err(ServiceError::Forbidden(_))));
        let (p, _) = test_support::photographer(&db, "pricy", 100).await?;
        let pa = test_support::actor(&db, &p).await?;
        let bad = update_me(&db, &pa, ProfilePatch { hourly_rate_cents: Some(-1), ..Default::default() }).await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));
        let huge = update_me(&db, &pa, ProfilePatch { hourly_rate_cents: Some(i64::MAX / 2), ..Default::default() }).await;
        assert!(matches!(huge, Err(ServiceError::Validation(_))));
        Ok(())
    }
}
