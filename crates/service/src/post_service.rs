use models::{follow, post};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::actor::Actor;
use crate::errors::ServiceError;
use crate::pagination::{fetch_page, Paged, Pagination};

pub async fn create(
    db: &DatabaseConnection,
    actor: &Actor,
    content: &str,
    image_url: Option<String>,
) -> Result<post::Model, ServiceError> {
    Ok(post::create(db, actor.user_id, content, image_url).await?)
}

pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<post::Model, ServiceError> {
    post::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("post"))
}

/// Newest first, optionally restricted to one author.
pub async fn list(db: &DatabaseConnection, author_id: Option<Uuid>, opts: Pagination) -> Result<Paged<post::Model>, ServiceError> {
    let mut select = post::Entity::find();
    if let Some(author) = author_id {
        select = select.filter(post::Column::AuthorId.eq(author));
    }
    let select = select.order_by_desc(post::Column::CreatedAt).order_by_desc(post::Column::Id);
    fetch_page(db, select, opts).await
}

/// Posts by the caller and everyone they follow.
pub async fn feed(db: &DatabaseConnection, actor: &Actor, opts: Pagination) -> Result<Paged<post::Model>, ServiceError> {
    let mut authors = follow::followed_ids(db, actor.user_id).await?;
    authors.push(actor.user_id);
    let select = post::Entity::find()
        .filter(post::Column::AuthorId.is_in(authors))
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id);
    fetch_page(db, select, opts).await
}

pub async fn update(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    content: Option<String>,
    image_url: Option<String>,
) -> Result<post::Model, ServiceError> {
    let p = get(db, id).await?;
    if p.author_id != actor.user_id {
        return Err(ServiceError::forbidden("only the author can edit this post"));
    }
    Ok(post::update(db, p, content, image_url).await?)
}

pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    let p = get(db, id).await?;
    if p.author_id != actor.user_id && !actor.is_admin() {
        return Err(ServiceError::forbidden("only the author can delete this post"));
    }
    p.delete(db).await?;
    Ok(())
}
