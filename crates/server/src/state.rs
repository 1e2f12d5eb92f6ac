use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::auth::{repo::SeaOrmAuthRepository, AuthConfig, AuthService};

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    /// Mark the session cookie `Secure`; off for plain-http development.
    pub secure_cookies: bool,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, auth: AuthConfig) -> Self {
        let repo = Arc::new(SeaOrmAuthRepository::new(db.clone()));
        Self { db, auth: Arc::new(AuthService::new(repo, auth)), secure_cookies: false }
    }
}
