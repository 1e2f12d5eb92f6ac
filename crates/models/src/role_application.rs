use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::role::Role;
use crate::status::{ApplicationStatus, Lifecycle};
use crate::user;
use crate::validation::{validate_cents, validate_len, validate_optional_len};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role_application")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub message: String,
    /// Hourly rate for photographers, per-photo price for retouchers.
    pub rate_cents: i64,
    pub location: Option<String>,
    pub status: String,
    pub reviewed_by: Option<Uuid>,
    pub review_note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub reviewed_at: Option<DateTimeWithTimeZone>,
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
    pub fn role(&self) -> Result<Role, ModelError> {
        self.role.parse()
    }

    pub fn status(&self) -> Result<ApplicationStatus, ModelError> {
        self.status.parse()
    }
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    role: Role,
    message: &str,
    rate_cents: i64,
    location: Option<String>,
) -> Result<Model, ModelError> {
    if !role.is_applicable() {
        return Err(ModelError::Validation(format!("cannot apply for role {role}")));
    }
    validate_len("message", message, 1, 2000)?;
    validate_cents("rate_cents", rate_cents)?;
    validate_optional_len("location", location.as_deref(), 128)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        role: Set(role.to_string()),
        message: Set(message.trim().to_string()),
        rate_cents: Set(rate_cents),
        location: Set(location.and_then(user::non_empty)),
        status: Set(ApplicationStatus::Pending.to_string()),
        reviewed_by: Set(None),
        review_note: Set(None),
        created_at: Set(Utc::now().into()),
        reviewed_at: Set(None),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_pending<C: ConnectionTrait>(db: &C, user_id: Uuid, role: Role) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::Role.eq(role.as_str()))
        .filter(Column::Status.eq(ApplicationStatus::Pending.as_str()))
        .one(db)
        .await?)
}

/// Record an admin decision. Only pending applications can be decided.
pub async fn decide<C: ConnectionTrait>(
    db: &C,
    app: Model,
    decision: ApplicationStatus,
    reviewer: Uuid,
    note: Option<String>,
) -> Result<Model, ModelError> {
    app.status()?.ensure_transition(decision)?;
    validate_optional_len("note", note.as_deref(), 2000)?;
    let mut am: ActiveModel = app.into();
    am.status = Set(decision.to_string());
    am.reviewed_by = Set(Some(reviewer));
    am.review_note = Set(note.and_then(user::non_empty));
    am.reviewed_at = Set(Some(Utc::now().into()));
    Ok(am.update(db).await?)
}
