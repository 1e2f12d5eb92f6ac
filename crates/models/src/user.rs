use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::validation::{validate_http_url, validate_len, validate_optional_len};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    validate_len("username", username, 3, 32)?;
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')) {
        return Err(ModelError::Validation("username may only contain letters, digits, '_', '.' and '-'".into()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    validate_len("email", email, 3, 255)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace) => Ok(()),
        _ => Err(ModelError::Validation("invalid email".into())),
    }
}

pub fn validate_display_name(name: &str) -> Result<(), ModelError> {
    validate_len("display_name", name, 1, 64)
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    username: &str,
    email: &str,
    display_name: &str,
) -> Result<Model, ModelError> {
    let username = username.trim();
    let email = email.trim().to_lowercase();
    validate_username(username)?;
    validate_email(&email)?;
    validate_display_name(display_name)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(email),
        display_name: Set(display_name.trim().to_string()),
        bio: Set(None),
        avatar_url: Set(None),
        is_admin: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_username<C: ConnectionTrait>(db: &C, username: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Username.eq(username.trim())).one(db).await?)
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(email.trim().to_lowercase())).one(db).await?)
}

/// Resolve a login handle: anything containing `@` is treated as an email.
pub async fn find_by_login<C: ConnectionTrait>(db: &C, login: &str) -> Result<Option<Model>, ModelError> {
    if login.contains('@') {
        find_by_email(db, login).await
    } else {
        find_by_username(db, login).await
    }
}

/// Partial profile update; `None` leaves a field untouched, `Some("")` clears optional ones.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

pub async fn update_profile<C: ConnectionTrait>(db: &C, user: Model, patch: ProfilePatch) -> Result<Model, ModelError> {
    let mut am: ActiveModel = user.into();
    if let Some(name) = patch.display_name {
        validate_display_name(&name)?;
        am.display_name = Set(name.trim().to_string());
    }
    if let Some(bio) = patch.bio {
        validate_optional_len("bio", Some(&bio), 1000)?;
        am.bio = Set(non_empty(bio));
    }
    if let Some(url) = patch.avatar_url {
        let url = non_empty(url);
        if let Some(u) = &url {
            validate_http_url("avatar_url", u)?;
        }
        am.avatar_url = Set(url);
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn set_admin<C: ConnectionTrait>(db: &C, user: Model, is_admin: bool) -> Result<Model, ModelError> {
    if user.is_admin == is_admin {
        return Ok(user);
    }
    let mut am: ActiveModel = user.into();
    am.is_admin = Set(is_admin);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub(crate) fn non_empty(s: String) -> Option<String> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}
