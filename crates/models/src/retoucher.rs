use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;
use crate::validation::{validate_cents, validate_optional_len};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "retoucher")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub bio: Option<String>,
    pub price_per_photo_cents: i64,
    pub is_available: bool,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity).from(Column::UserId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn accepts_orders(&self) -> bool {
        self.active && self.is_available
    }
}

pub async fn find_by_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::UserId.eq(user_id)).one(db).await?)
}

pub async fn find_active_by_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(find_by_user(db, user_id).await?.filter(|r| r.active))
}

pub async fn activate<C: ConnectionTrait>(db: &C, user_id: Uuid, price_per_photo_cents: i64) -> Result<Model, ModelError> {
    validate_cents("price_per_photo_cents", price_per_photo_cents)?;
    let now = Utc::now().into();
    if let Some(existing) = find_by_user(db, user_id).await? {
        let mut am: ActiveModel = existing.into();
        am.price_per_photo_cents = Set(price_per_photo_cents);
        am.active = Set(true);
        am.is_available = Set(true);
        am.updated_at = Set(now);
        return Ok(am.update(db).await?);
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        bio: Set(None),
        price_per_photo_cents: Set(price_per_photo_cents),
        is_available: Set(true),
        active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn deactivate<C: ConnectionTrait>(db: &C, profile: Model) -> Result<Model, ModelError> {
    let mut am: ActiveModel = profile.into();
    am.active = Set(false);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub bio: Option<String>,
    pub price_per_photo_cents: Option<i64>,
    pub is_available: Option<bool>,
}

pub async fn update_profile<C: ConnectionTrait>(db: &C, profile: Model, patch: ProfilePatch) -> Result<Model, ModelError> {
    let mut am: ActiveModel = profile.into();
    if let Some(bio) = patch.bio {
        validate_optional_len("bio", Some(&bio), 2000)?;
        am.bio = Set(user::non_empty(bio));
    }
    if let Some(price) = patch.price_per_photo_cents {
        validate_cents("price_per_photo_cents", price)?;
        am.price_per_photo_cents = Set(price);
    }
    if let Some(available) = patch.is_available {
        am.is_available = Set(available);
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}
