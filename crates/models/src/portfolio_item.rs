use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::validation::validate_optional_len;
use crate::{photo, portfolio, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portfolio_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub photo_id: Uuid,
    pub caption: Option<String>,
    pub position: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Portfolio,
    Photo,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Portfolio => Entity::belongs_to(portfolio::Entity)
                .from(Column::PortfolioId)
                .to(portfolio::Column::Id)
                .into(),
            Relation::Photo => Entity::belongs_to(photo::Entity).from(Column::PhotoId).to(photo::Column::Id).into(),
        }
    }
}

impl Related<portfolio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Portfolio.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn list_for<C: ConnectionTrait>(db: &C, portfolio_id: Uuid) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::PortfolioId.eq(portfolio_id))
        .order_by_asc(Column::Position)
        .all(db)
        .await?)
}

/// Append a photo at the end of the portfolio.
pub async fn append<C: ConnectionTrait>(
    db: &C,
    portfolio_id: Uuid,
    photo_id: Uuid,
    caption: Option<String>,
) -> Result<Model, ModelError> {
    validate_optional_len("caption", caption.as_deref(), 255)?;
    let last = Entity::find()
        .filter(Column::PortfolioId.eq(portfolio_id))
        .order_by_desc(Column::Position)
        .one(db)
        .await?;
    let position = last.map(|i| i.position + 1).unwrap_or(1);
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        portfolio_id: Set(portfolio_id),
        photo_id: Set(photo_id),
        caption: Set(caption.and_then(user::non_empty)),
        position: Set(position),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}
