mod support;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;

use support::PASSWORD;

#[tokio::test]
async fn register_login_and_me() -> anyhow::Result<()> {
    let t = support::spawn().await?;
    let (id, token) = t.signup("tester").await?;

    let me = t.get("/auth/me", &token).await?;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["id"], id.as_str());
    assert_eq!(me.body["email"], "tester@example.com");
    assert_eq!(me.body["roles"], json!(["User"]));
    Ok(())
}

#[tokio::test]
async fn duplicate_username_or_email_conflicts() -> anyhow::Result<()> {
    let t = support::spawn().await?;
    t.signup("taken").await?;
    for body in [
        json!({"username": "taken", "email": "other@example.com", "display_name": "x", "password": PASSWORD}),
        json!({"username": "fresh", "email": "TAKEN@example.com", "display_name": "x", "password": PASSWORD}),
    ] {
        let resp = t.call(Method::POST, "/auth/register", None, Some(body)).await?;
        assert_eq!(resp.status, StatusCode::CONFLICT, "{:?}", resp.body);
        assert_eq!(resp.body["error"], "Conflict");
    }
    Ok(())
}

#[tokio::test]
async fn short_password_is_rejected() -> anyhow::Result<()> {
    let t = support::spawn().await?;
    let resp = t
        .call(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"username": "shorty", "email": "s@example.com", "display_name": "S", "password": "1234567"})),
        )
        .await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn login_by_email_sets_cookie_and_cookie_authenticates() -> anyhow::Result<()> {
    let t = support::spawn().await?;
    t.signup("cookie").await?;
    let login = t
        .call(Method::POST, "/auth/login", None, Some(json!({"login": "cookie@example.com", "password": PASSWORD})))
        .await?;
    assert_eq!(login.status, StatusCode::OK);
    let cookie = login.set_cookie.unwrap_or_default();
    assert!(cookie.starts_with("auth_token="), "{cookie}");
    assert!(cookie.contains("HttpOnly"));

    let pair = cookie.split(';').next().unwrap_or_default().to_string();
    let req = Request::builder().uri("/auth/me").header(header::COOKIE, pair).body(Body::empty())?;
    let me = t.send(req).await?;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "cookie");
    Ok(())
}

#[tokio::test]
async fn bad_credentials_and_tokens_are_unauthorized() -> anyhow::Result<()> {
    let t = support::spawn().await?;
    t.signup("victim").await?;
    let wrong = t
        .call(Method::POST, "/auth/login", None, Some(json!({"login": "victim", "password": "not-the-password"})))
        .await?;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let missing = t.call(Method::GET, "/auth/me", None, None).await?;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let forged = t.get("/auth/me", "not.a.jwt").await?;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
    assert_eq!(forged.body["error"], "Unauthorized");
    Ok(())
}

#[tokio::test]
async fn logout_clears_cookie() -> anyhow::Result<()> {
    let t = support::spawn().await?;
    let resp = t.call(Method::POST, "/auth/logout", None, None).await?;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    let cookie = resp.set_cookie.unwrap_or_default();
    assert!(cookie.starts_with("auth_token="), "{cookie}");
    assert!(cookie.contains("Max-Age=0") || cookie.contains("Expires"), "{cookie}");
    Ok(())
}

#[tokio::test]
async fn health_and_docs_are_public() -> anyhow::Result<()> {
    let t = support::spawn().await?;
    let health = t.call(Method::GET, "/health", None, None).await?;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body, json!({"status": "ok"}));

    let doc = t.call(Method::GET, "/api-docs/openapi.json", None, None).await?;
    assert_eq!(doc.status, StatusCode::OK);
    assert!(doc.body["paths"]["/bookings"].is_object());
    Ok(())
}
