use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use models::errors::ModelError;
use models::{user, user_credentials};

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_auth_user(u: user::Model) -> AuthUser {
    AuthUser { id: u.id, username: u.username, email: u.email, display_name: u.display_name }
}

fn to_credentials(c: user_credentials::Model) -> Credentials {
    Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(user::find_by_username(&self.db, username).await?.map(to_auth_user))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(user::find_by_email(&self.db, email).await?.map(to_auth_user))
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(user::find_by_login(&self.db, login).await?.map(to_auth_user))
    }

    async fn create_user_with_password(
        &self,
        username: &str,
        email: &str,
        display_name: &str,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<AuthUser, AuthError> {
        let txn = self.db.begin().await.map_err(ModelError::from)?;
        let created = user::create(&txn, username, email, display_name).await?;
        user_credentials::upsert_password(&txn, created.id, password_hash, &password_algorithm).await?;
        txn.commit().await.map_err(ModelError::from)?;
        Ok(to_auth_user(created))
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        Ok(user_credentials::find_by_user(&self.db, user_id).await?.map(to_credentials))
    }
}
