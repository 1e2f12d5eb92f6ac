use chrono::Utc;
use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::status::string_enum;
use crate::user;

string_enum!(
    /// What a notification is about; `reference_id` points at the matching record.
    NotificationKind, "notification kind" {
        BookingRequested,
        BookingStatusChanged,
        RetouchOrderRequested,
        RetouchOrderStatusChanged,
        PaymentReceived,
        PaymentConfirmed,
        PaymentRefunded,
        RoleApplicationDecided,
        RoleRevoked,
        NewFollower,
    }
);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub message: String,
    pub reference_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTimeWithTimeZone,
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

pub async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    kind: NotificationKind,
    message: impl Into<String>,
    reference_id: Option<Uuid>,
) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        kind: Set(kind.to_string()),
        message: Set(message.into()),
        reference_id: Set(reference_id),
        is_read: Set(false),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub async fn count_unread<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<u64, ModelError> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsRead.eq(false))
        .count(db)
        .await?)
}

pub async fn mark_read<C: ConnectionTrait>(db: &C, n: Model) -> Result<Model, ModelError> {
    if n.is_read {
        return Ok(n);
    }
    let mut am: ActiveModel = n.into();
    am.is_read = Set(true);
    Ok(am.update(db).await?)
}

/// Returns the number of notifications flipped to read.
pub async fn mark_all_read<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<u64, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::IsRead, Expr::value(true))
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsRead.eq(false))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
