use models::role::Role;
use models::{photo, photographer, portfolio, portfolio_item};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use uuid::Uuid;

use crate::actor::Actor;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioWithItems {
    pub portfolio: portfolio::Model,
    pub items: Vec<portfolio_item::Model>,
}

async fn find(db: &DatabaseConnection, id: Uuid) -> Result<portfolio::Model, ServiceError> {
    portfolio::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("portfolio"))
}

async fn owner_user(db: &DatabaseConnection, folio: &portfolio::Model) -> Result<Uuid, ServiceError> {
    photographer::Entity::find_by_id(folio.photographer_id)
        .one(db)
        .await?
        .map(|p| p.user_id)
        .ok_or_else(|| ServiceError::not_found("photographer"))
}

async fn require_owner(db: &DatabaseConnection, actor: &Actor, folio: &portfolio::Model) -> Result<(), ServiceError> {
    if owner_user(db, folio).await? != actor.user_id {
        return Err(ServiceError::forbidden("not your portfolio"));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    actor: &Actor,
    title: &str,
    description: Option<String>,
) -> Result<portfolio::Model, ServiceError> {
    actor.require(Role::Photographer)?;
    let me = photographer::find_active_by_user(db, actor.user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("photographer profile"))?;
    Ok(portfolio::create(db, me.id, title, description).await?)
}

pub async fn list_for_photographer(db: &DatabaseConnection, photographer_id: Uuid) -> Result<Vec<portfolio::Model>, ServiceError> {
    if photographer::Entity::find_by_id(photographer_id).one(db).await?.is_none() {
        return Err(ServiceError::not_found("photographer"));
    }
    Ok(portfolio::Entity::find()
        .filter(portfolio::Column::PhotographerId.eq(photographer_id))
        .order_by_asc(portfolio::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<PortfolioWithItems, ServiceError> {
    let folio = find(db, id).await?;
    let items = portfolio_item::list_for(db, folio.id).await?;
    Ok(PortfolioWithItems { portfolio: folio, items })
}

pub async fn add_item(
    db: &DatabaseConnection,
    actor: &Actor,
    portfolio_id: Uuid,
    photo_id: Uuid,
    caption: Option<String>,
) -> Result<portfolio_item::Model, ServiceError> {
    let folio = find(db, portfolio_id).await?;
    require_owner(db, actor, &folio).await?;
    let p = photo::Entity::find_by_id(photo_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("photo"))?;
    if p.owner_id != actor.user_id {
        return Err(ServiceError::forbidden("only your own photos can be added"));
    }
    Ok(portfolio_item::append(db, folio.id, p.id, caption).await?)
}

pub async fn remove_item(db: &DatabaseConnection, actor: &Actor, portfolio_id: Uuid, item_id: Uuid) -> Result<(), ServiceError> {
    let folio = find(db, portfolio_id).await?;
    if !actor.is_admin() {
        require_owner(db, actor, &folio).await?;
    }
    let item = portfolio_item::Entity::find_by_id(item_id)
        .one(db)
        .await?
        .filter(|i| i.portfolio_id == folio.id)
        .ok_or_else(|| ServiceError::not_found("portfolio item"))?;
    item.delete(db).await?;
    Ok(())
}

pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    let folio = find(db, id).await?;
    if !actor.is_admin() {
        require_owner(db, actor, &folio).await?;
    }
    folio.delete(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, get_db};

    #[tokio::test]
    async fn portfolio_lifecycle() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let (pu, p) = test_support::photographer(&db, "artist", 9000).await?;
        let o = test_support::user(&db, "visitor").await?;
        let (me, visitor) = (test_support::actor(&db, &pu).await?, test_support::actor(&db, &o).await?);

        assert!(matches!(create(&db, &visitor, "Nope", None).await, Err(ServiceError::Forbidden(_))));
        let folio = create(&db, &me, "Portraits", Some("Studio work".into())).await?;
        let mine = photo::create(&db, pu.id, None, "https://cdn.example.com/p1.jpg", None).await?;
        let theirs = photo::create(&db, o.id, None, "https://cdn.example.com/v1.jpg", None).await?;

        let first = add_item(&db, &me, folio.id, mine.id, Some("Lead".into())).await?;
        let second = add_item(&db, &me, folio.id, mine.id, None).await?;
        assert_eq!((first.position, second.position), (1, 2));
        assert!(matches!(add_item(&db, &me, folio.id, theirs.id, None).await, Err(ServiceError::Forbidden(_))));
        assert!(matches!(add_item(&db, &visitor, folio.id, theirs.id, None).await, Err(ServiceError::Forbidden(_))));

        let full = get(&db, folio.id).await?;
        assert_eq!(full.items.len(), 2);
        assert_eq!(list_for_photographer(&db, p.id).await?.len(), 1);

        remove_item(&db, &me, folio.id, first.id).await?;
        assert!(matches!(remove_item(&db, &me, folio.id, first.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(delete(&db, &visitor, folio.id).await, Err(ServiceError::Forbidden(_))));
        delete(&db, &me, folio.id).await?;
        assert!(matches!(get(&db, folio.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
