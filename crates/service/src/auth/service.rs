use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, AuthUser, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;
use super::token::{self, Claims};

pub const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_algorithm: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl_hours: i64) -> Self {
        Self { jwt_secret: jwt_secret.into(), token_ttl_hours, password_algorithm: "argon2".into() }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("0123456789abcdef", 12));
    /// let input = RegisterInput { username: "jane".into(), email: "Jane@Example.com".into(), display_name: "Jane".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "jane@example.com");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        let username = input.username.trim();
        let email = input.email.trim().to_lowercase();
        models::user::validate_username(username)?;
        models::user::validate_email(&email)?;
        models::user::validate_display_name(&input.display_name)?;
        let pw_len = input.password.chars().count();
        if pw_len < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
        }
        if pw_len > MAX_PASSWORD_LEN {
            return Err(AuthError::Validation(format!("password too long (<={MAX_PASSWORD_LEN})")));
        }
        if self.repo.find_user_by_username(username).await?.is_some() {
            debug!("username taken");
            return Err(AuthError::Conflict("username already taken".into()));
        }
        if self.repo.find_user_by_email(&email).await?.is_some() {
            debug!("email taken");
            return Err(AuthError::Conflict("email already registered".into()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let user = self
            .repo
            .create_user_with_password(username, &email, &input.display_name, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(user_id = %user.id, username = %user.username, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig::new("0123456789abcdef", 12));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { username: "neo".into(), email: "neo@e.com".into(), display_name: "N".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { login: "neo@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.username, "neo");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(login = %input.login))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let login = input.login.trim();
        let user = self.repo.find_user_by_login(login).await?.ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            debug!(user_id = %user.id, "password mismatch");
            return Err(AuthError::Unauthorized);
        }

        let (token, expires_at) = token::issue(&self.cfg.jwt_secret, user.id, &user.username, self.cfg.token_ttl_hours)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token, expires_at })
    }

    /// Validate a bearer token issued by [`AuthService::login`].
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        token::verify(&self.cfg.jwt_secret, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> AuthService<MockAuthRepository> {
        AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::new("0123456789abcdef", 1))
    }

    fn input(username: &str, email: &str) -> RegisterInput {
        RegisterInput {
            username: username.into(),
            email: email.into(),
            display_name: "Someone".into(),
            password: "hunter22!".into(),
        }
    }

    #[tokio::test]
    async fn register_rejects_duplicates() {
        let svc = svc();
        svc.register(input("mia", "mia@x.io")).await.unwrap();
        assert!(matches!(svc.register(input("mia", "other@x.io")).await, Err(AuthError::Conflict(_))));
        assert!(matches!(svc.register(input("mia2", "MIA@x.io")).await, Err(AuthError::Conflict(_))));
    }

    #[tokio::test]
    async fn register_validates_fields() {
        let svc = svc();
        let mut short = input("ok_name", "ok@x.io");
        short.password = "short".into();
        assert!(matches!(svc.register(short).await, Err(AuthError::Validation(_))));
        assert!(matches!(svc.register(input("x", "x@x.io")).await, Err(AuthError::Validation(_))));
        assert!(matches!(svc.register(input("valid", "nope")).await, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn login_by_username_or_email() {
        let svc = svc();
        let user = svc.register(input("leo", "leo@x.io")).await.unwrap();
        for login in ["leo", "LEO@x.io"] {
            let session = svc
                .login(LoginInput { login: login.into(), password: "hunter22!".into() })
                .await
                .unwrap();
            assert_eq!(session.user.id, user.id);
            assert_eq!(svc.verify_token(&session.token).unwrap().sub, user.id);
        }
    }

    #[tokio::test]
    async fn login_failures_are_uniform() {
        let svc = svc();
        svc.register(input("zed", "zed@x.io")).await.unwrap();
        let wrong = svc.login(LoginInput { login: "zed".into(), password: "nothunter".into() }).await;
        let missing = svc.login(LoginInput { login: "nobody".into(), password: "hunter22!".into() }).await;
        assert!(matches!(wrong, Err(AuthError::Unauthorized)));
        assert!(matches!(missing, Err(AuthError::Unauthorized)));
    }
}
