use std::collections::BTreeSet;

use models::role::Role;
use models::user::{self, ProfilePatch};
use models::follow;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use tracing::{info, warn};
use uuid::Uuid;

use crate::actor::{roles_of, Actor};
use crate::errors::ServiceError;
use crate::pagination::{fetch_page, Paged, Pagination};

/// A user as seen by others, with social counters.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: user::Model,
    pub roles: BTreeSet<Role>,
    pub followers: u64,
    pub following: u64,
}

pub async fn get_user(db: &DatabaseConnection, id: Uuid) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))
}

pub async fn get_profile(db: &DatabaseConnection, id: Uuid) -> Result<UserProfile, ServiceError> {
    let user = get_user(db, id).await?;
    let roles = roles_of(db, &user).await?;
    let followers = follow::count_followers(db, id).await?;
    let following = follow::count_following(db, id).await?;
    Ok(UserProfile { user, roles, followers, following })
}

pub async fn update_me(db: &DatabaseConnection, actor: &Actor, patch: ProfilePatch) -> Result<user::Model, ServiceError> {
    let me = get_user(db, actor.user_id).await?;
    Ok(user::update_profile(db, me, patch).await?)
}

pub async fn list_users(db: &DatabaseConnection, actor: &Actor, opts: Pagination) -> Result<Paged<user::Model>, ServiceError> {
    actor.require_admin()?;
    let select = user::Entity::find().order_by_asc(user::Column::Username);
    fetch_page(db, select, opts).await
}

/// Grant or remove the admin flag. Admins cannot demote themselves.
pub async fn set_admin(db: &DatabaseConnection, actor: &Actor, target: Uuid, is_admin: bool) -> Result<user::Model, ServiceError> {
    actor.require_admin()?;
    if target == actor.user_id && !is_admin {
        return Err(ServiceError::Validation("cannot remove your own admin flag".into()));
    }
    let u = get_user(db, target).await?;
    let updated = user::set_admin(db, u, is_admin).await?;
    info!(admin_id = %actor.user_id, user_id = %target, is_admin, "admin flag changed");
    Ok(updated)
}

/// Promote the configured usernames; returns how many accounts changed.
pub async fn ensure_admins(db: &DatabaseConnection, usernames: &[String]) -> Result<usize, ServiceError> {
    let mut promoted = 0;
    for name in usernames {
        match user::find_by_username(db, name).await? {
            Some(u) if u.is_admin => {}
            Some(u) => {
                user::set_admin(db, u, true).await?;
                promoted += 1;
                info!(username = %name, "promoted configured admin");
            }
            None => warn!(username = %name, "configured admin does not exist yet"),
        }
    }
    Ok(promoted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, get_db};

    #[tokio::test]
    async fn profile_counts_followers() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = test_support::user(&db, "alpha").await?;
        let b = test_support::user(&db, "bravo").await?;
        follow::create(&db, b.id, a.id).await?;
        let p = get_profile(&db, a.id).await?;
        assert_eq!((p.followers, p.following), (1, 0));
        assert_eq!(p.roles, BTreeSet::from([Role::User]));
        assert!(matches!(get_profile(&db, Uuid::new_v4()).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn update_me_validates_urls() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let u = test_support::user(&db, "editor").await?;
        let actor = test_support::actor(&db, &u).await?;
        let updated = update_me(
            &db,
            &actor,
            ProfilePatch { bio: Some("hello".into()), avatar_url: Some("https://img.example.com/me.png".into()), ..Default::default() },
        )
        .await?;
        assert_eq!(updated.bio.as_deref(), Some("hello"));
        let bad = update_me(&db, &actor, ProfilePatch { avatar_url: Some("javascript:alert(1)".into()), ..Default::default() }).await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn admin_flag_rules() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let root = test_support::admin(&db, "root").await?;
        let u = test_support::user(&db, "member").await?;
        let root_actor = test_support::actor(&db, &root).await?;
        let member = test_support::actor(&db, &u).await?;

        assert!(matches!(set_admin(&db, &member, u.id, true).await, Err(ServiceError::Forbidden(_))));
        assert!(matches!(set_admin(&db, &root_actor, root.id, false).await, Err(ServiceError::Validation(_))));
        assert!(set_admin(&db, &root_actor, u.id, true).await?.is_admin);
        assert_eq!(list_users(&db, &root_actor, Pagination::default()).await?.total, 2);
        Ok(())
    }

    #[tokio::test]
    async fn ensure_admins_promotes_existing_only() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        test_support::user(&db, "boss").await?;
        let n = ensure_admins(&db, &["boss".to_string(), "ghost".to_string()]).await?;
        assert_eq!(n, 1);
        assert_eq!(ensure_admins(&db, &["boss".to_string()]).await?, 0);
        Ok(())
    }
}
