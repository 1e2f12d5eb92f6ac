//! The authenticated caller and the roles it currently holds.

use std::collections::BTreeSet;

use models::role::Role;
use models::{photographer, retoucher, user};
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::errors::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub username: String,
    pub roles: BTreeSet<Role>,
}

impl Actor {
    /// Build the actor from the current database state so role changes apply
    /// to the next request without a new token.
    pub async fn load(db: &DatabaseConnection, user_id: Uuid) -> Result<Self, ServiceError> {
        let u = user::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("user"))?;
        let roles = roles_of(db, &u).await?;
        Ok(Self { user_id: u.id, username: u.username, roles })
    }

    pub fn has(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has(Role::Admin)
    }

    pub fn require(&self, role: Role) -> Result<(), ServiceError> {
        if self.has(role) {
            Ok(())
        } else {
            Err(ServiceError::forbidden(format!("requires role {role}")))
        }
    }

    pub fn require_admin(&self) -> Result<(), ServiceError> {
        self.require(Role::Admin)
    }
}

pub async fn roles_of(db: &DatabaseConnection, u: &user::Model) -> Result<BTreeSet<Role>, ServiceError> {
    let mut roles = BTreeSet::from([Role::User]);
    if u.is_admin {
        roles.insert(Role::Admin);
    }
    if photographer::find_active_by_user(db, u.id).await?.is_some() {
        roles.insert(Role::Photographer);
    }
    if retoucher::find_active_by_user(db, u.id).await?.is_some() {
        roles.insert(Role::Retoucher);
    }
    Ok(roles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, get_db};

    #[tokio::test]
    async fn roles_follow_profiles_and_admin_flag() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let u = test_support::user(&db, "plain").await?;
        let a = Actor::load(&db, u.id).await?;
        assert_eq!(a.roles, BTreeSet::from([Role::User]));
        assert!(matches!(a.require_admin(), Err(ServiceError::Forbidden(_))));

        let p = photographer::activate(&db, u.id, 1000, None).await?;
        let a = Actor::load(&db, u.id).await?;
        assert!(a.has(Role::Photographer));

        photographer::deactivate(&db, p).await?;
        user::set_admin(&db, u, true).await?;
        let a = Actor::load(&db, a.user_id).await?;
        assert!(!a.has(Role::Photographer));
        assert!(a.is_admin());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        assert!(matches!(Actor::load(&db, Uuid::new_v4()).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
