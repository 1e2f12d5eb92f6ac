use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    /// Email when the login contains `@`, username otherwise.
    async fn find_user_by_login(&self, login: &str) -> Result<Option<AuthUser>, AuthError>;

    /// Create the account and its credentials together; neither is kept if either write fails.
    async fn create_user_with_password(
        &self,
        username: &str,
        email: &str,
        display_name: &str,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<Uuid, AuthUser>>,
        creds: Mutex<HashMap<Uuid, Credentials>>, // key: user_id
    }

    fn poisoned<T>(_: T) -> AuthError {
        AuthError::Repository("mock lock poisoned".into())
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().map_err(poisoned)?;
            Ok(users.values().find(|u| u.username == username).cloned())
        }

        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().map_err(poisoned)?;
            let email = email.to_lowercase();
            Ok(users.values().find(|u| u.email == email).cloned())
        }

        async fn find_user_by_login(&self, login: &str) -> Result<Option<AuthUser>, AuthError> {
            if login.contains('@') {
                self.find_user_by_email(login).await
            } else {
                self.find_user_by_username(login).await
            }
        }

        async fn create_user_with_password(
            &self,
            username: &str,
            email: &str,
            display_name: &str,
            password_hash: String,
            password_algorithm: String,
        ) -> Result<AuthUser, AuthError> {
            let mut users = self.users.lock().map_err(poisoned)?;
            let mut creds = self.creds.lock().map_err(poisoned)?;
            let email = email.to_lowercase();
            if users.values().any(|u| u.username == username || u.email == email) {
                return Err(AuthError::Conflict("username or email already registered".into()));
            }
            let user = AuthUser {
                id: Uuid::new_v4(),
                username: username.to_string(),
                email,
                display_name: display_name.to_string(),
            };
            creds.insert(user.id, Credentials { user_id: user.id, password_hash, password_algorithm });
            users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().map_err(poisoned)?;
            Ok(creds.get(&user_id).cloned())
        }
    }
}
