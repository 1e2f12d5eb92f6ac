use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::status::RetouchOrderStatus;
use crate::validation::validate_len;
use crate::{photo, retoucher, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "retouch_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    /// Retoucher profile id.
    pub retoucher_id: Uuid,
    pub photo_id: Uuid,
    pub instructions: String,
    pub price_cents: i64,
    pub status: String,
    pub result_photo_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Client,
    Retoucher,
    Photo,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Client => Entity::belongs_to(user::Entity).from(Column::ClientId).to(user::Column::Id).into(),
            Relation::Retoucher => Entity::belongs_to(retoucher::Entity)
                .from(Column::RetoucherId)
                .to(retoucher::Column::Id)
                .into(),
            Relation::Photo => Entity::belongs_to(photo::Entity).from(Column::PhotoId).to(photo::Column::Id).into(),
        }
    }
}

impl Related<retoucher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Retoucher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn status(&self) -> Result<RetouchOrderStatus, ModelError> {
        self.status.parse()
    }
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
    retoucher: &retoucher::Model,
    photo_id: Uuid,
    instructions: &str,
) -> Result<Model, ModelError> {
    validate_len("instructions", instructions, 1, 4000)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        client_id: Set(client_id),
        retoucher_id: Set(retoucher.id),
        photo_id: Set(photo_id),
        instructions: Set(instructions.trim().to_string()),
        price_cents: Set(retoucher.price_per_photo_cents),
        status: Set(RetouchOrderStatus::Pending.to_string()),
        result_photo_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn set_status<C: ConnectionTrait>(
    db: &C,
    order: Model,
    status: RetouchOrderStatus,
    result_photo_id: Option<Uuid>,
) -> Result<Model, ModelError> {
    let mut am: ActiveModel = order.into();
    am.status = Set(status.to_string());
    if result_photo_id.is_some() {
        am.result_photo_id = Set(result_photo_id);
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Whether any order uses the photo as its source or result.
pub async fn references_photo<C: ConnectionTrait>(db: &C, photo_id: Uuid) -> Result<bool, ModelError> {
    let n = Entity::find()
        .filter(Column::PhotoId.eq(photo_id).or(Column::ResultPhotoId.eq(photo_id)))
        .count(db)
        .await?;
    Ok(n > 0)
}
