#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use serde_json::{json, Value};
use service::auth::AuthConfig;
use tower::ServiceExt;

use server::routes;
use server::state::ServerState;

pub const PASSWORD: &str = "S3curePass!";

pub struct TestApp {
    pub app: Router,
    pub db: DatabaseConnection,
}

pub struct Response {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

pub async fn spawn() -> anyhow::Result<TestApp> {
    let db = Database::connect("sqlite::memory:").await?;
    migration::Migrator::up(&db, None).await?;
    let state = ServerState::new(db.clone(), AuthConfig::new("test-secret-0123456789", 1));
    let app = routes::build_router(state, tower_http::cors::CorsLayer::very_permissive());
    Ok(TestApp { app, db })
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> anyhow::Result<Response> {
        let resp = self.app.clone().oneshot(req).await?;
        let status = resp.status();
        let set_cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
        Ok(Response { status, set_cookie, body })
    }

    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<Response> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&b)?))?,
            None => builder.body(Body::empty())?,
        };
        self.send(req).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> anyhow::Result<Response> {
        self.call(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> anyhow::Result<Response> {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }

    /// Register `username` and return `(user_id, token)`.
    pub async fn signup(&self, username: &str) -> anyhow::Result<(String, String)> {
        let reg = self
            .call(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "display_name": username,
                    "password": PASSWORD,
                })),
            )
            .await?;
        assert_eq!(reg.status, StatusCode::CREATED, "{:?}", reg.body);
        let login = self
            .call(Method::POST, "/auth/login", None, Some(json!({"login": username, "password": PASSWORD})))
            .await?;
        assert_eq!(login.status, StatusCode::OK, "{:?}", login.body);
        let id = reg.body["id"].as_str().unwrap_or_default().to_string();
        let token = login.body["token"].as_str().unwrap_or_default().to_string();
        Ok((id, token))
    }

    pub async fn admin(&self, username: &str) -> anyhow::Result<(String, String)> {
        let (id, token) = self.signup(username).await?;
        service::user_service::ensure_admins(&self.db, &[username.to_string()]).await?;
        Ok((id, token))
    }

    /// Apply for `role` and have `admin_token` approve it.
    pub async fn grant(&self, token: &str, admin_token: &str, role: &str, rate_cents: i64) -> anyhow::Result<()> {
        let app = self
            .post(
                "/role-applications",
                token,
                json!({"role": role, "message": "portfolio attached", "rate_cents": rate_cents, "location": "Lisbon"}),
            )
            .await?;
        assert_eq!(app.status, StatusCode::CREATED, "{:?}", app.body);
        let id = app.body["id"].as_str().unwrap_or_default();
        let ok = self.post(&format!("/admin/role-applications/{id}/approve"), admin_token, json!({})).await?;
        assert_eq!(ok.status, StatusCode::OK, "{:?}", ok.body);
        Ok(())
    }
}
