use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::validation::{validate_len, validate_optional_len};
use crate::{photographer, portfolio_item, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portfolio")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub photographer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Photographer,
    Items,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Photographer => Entity::belongs_to(photographer::Entity)
                .from(Column::PhotographerId)
                .to(photographer::Column::Id)
                .into(),
            Relation::Items => Entity::has_many(portfolio_item::Entity).into(),
        }
    }
}

impl Related<portfolio_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    photographer_id: Uuid,
    title: &str,
    description: Option<String>,
) -> Result<Model, ModelError> {
    validate_len("title", title, 1, 128)?;
    validate_optional_len("description", description.as_deref(), 4000)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        photographer_id: Set(photographer_id),
        title: Set(title.trim().to_string()),
        description: Set(description.and_then(user::non_empty)),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}
