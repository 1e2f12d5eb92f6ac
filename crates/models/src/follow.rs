use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "follow")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Follower,
    Followed,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Follower => Entity::belongs_to(user::Entity).from(Column::FollowerId).to(user::Column::Id).into(),
            Relation::Followed => Entity::belongs_to(user::Entity).from(Column::FollowedId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(db: &C, follower_id: Uuid, followed_id: Uuid) -> Result<Model, ModelError> {
    if follower_id == followed_id {
        return Err(ModelError::Validation("cannot follow yourself".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        follower_id: Set(follower_id),
        followed_id: Set(followed_id),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_pair<C: ConnectionTrait>(db: &C, follower_id: Uuid, followed_id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::FollowerId.eq(follower_id))
        .filter(Column::FollowedId.eq(followed_id))
        .one(db)
        .await?)
}

pub async fn count_followers<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<u64, ModelError> {
    Ok(Entity::find().filter(Column::FollowedId.eq(user_id)).count(db).await?)
}

pub async fn count_following<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<u64, ModelError> {
    Ok(Entity::find().filter(Column::FollowerId.eq(user_id)).count(db).await?)
}

pub async fn followed_ids<C: ConnectionTrait>(db: &C, follower_id: Uuid) -> Result<Vec<Uuid>, ModelError> {
    Ok(Entity::find()
        .filter(Column::FollowerId.eq(follower_id))
        .all(db)
        .await?
        .into_iter()
        .map(|f| f.followed_id)
        .collect())
}
