use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;
use crate::validation::{validate_http_url, validate_len};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Author,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Author => Entity::belongs_to(user::Entity).from(Column::AuthorId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn validate(content: &str, image_url: Option<&str>) -> Result<(), ModelError> {
    validate_len("content", content, 1, 2000)?;
    if let Some(url) = image_url {
        validate_http_url("image_url", url)?;
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    author_id: Uuid,
    content: &str,
    image_url: Option<String>,
) -> Result<Model, ModelError> {
    let image_url = image_url.and_then(user::non_empty);
    validate(content, image_url.as_deref())?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        author_id: Set(author_id),
        content: Set(content.trim().to_string()),
        image_url: Set(image_url),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    post: Model,
    content: Option<String>,
    image_url: Option<String>,
) -> Result<Model, ModelError> {
    let content = content.unwrap_or_else(|| post.content.clone());
    let image_url = match image_url {
        Some(url) => user::non_empty(url),
        None => post.image_url.clone(),
    };
    validate(&content, image_url.as_deref())?;
    let mut am: ActiveModel = post.into();
    am.content = Set(content.trim().to_string());
    am.image_url = Set(image_url);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}
