use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::validation::{validate_http_url, validate_optional_len};
use crate::{booking, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photo")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub url: String,
    pub title: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Owner,
    Booking,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(user::Entity).from(Column::OwnerId).to(user::Column::Id).into(),
            Relation::Booking => Entity::belongs_to(booking::Entity)
                .from(Column::BookingId)
                .to(booking::Column::Id)
                .into(),
        }
    }
}

impl Related<booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate(url: &str, title: Option<&str>) -> Result<(), ModelError> {
    validate_http_url("url", url)?;
    validate_optional_len("title", title, 255)
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    owner_id: Uuid,
    booking_id: Option<Uuid>,
    url: &str,
    title: Option<String>,
) -> Result<Model, ModelError> {
    validate(url, title.as_deref())?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        booking_id: Set(booking_id),
        url: Set(url.trim().to_string()),
        title: Set(title.and_then(user::non_empty)),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}
