//! Request extractors for the authenticated caller.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use axum_extra::extract::cookie::CookieJar;
use service::actor::Actor;
use service::errors::ServiceError;

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub const AUTH_COOKIE: &str = "auth_token";

/// The caller, resolved from `Authorization: Bearer` or the `auth_token` cookie.
pub struct CurrentUser(pub Actor);

fn bearer_or_cookie(parts: &Parts) -> Result<String, JsonApiError> {
    if let Some(h) = parts.headers.get(header::AUTHORIZATION) {
        let h = h.to_str().map_err(|_| JsonApiError::unauthorized("malformed Authorization header"))?;
        return match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(t.trim().to_string()),
            _ => {
                tracing::warn!(path = %parts.uri.path(), "invalid Authorization format (expect Bearer)");
                Err(JsonApiError::unauthorized("expected a Bearer token"))
            }
        };
    }
    CookieJar::from_headers(&parts.headers)
        .get(AUTH_COOKIE)
        .map(|c| c.value().trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| JsonApiError::unauthorized("missing credentials"))
}

#[axum::async_trait]
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ServerState) -> Result<Self, Self::Rejection> {
        let token = bearer_or_cookie(parts)?;
        let claims = state.auth.verify_token(&token)?;
        match Actor::load(&state.db, claims.sub).await {
            Ok(actor) => Ok(CurrentUser(actor)),
            // token for a user that no longer exists
            Err(ServiceError::NotFound(_)) => Err(JsonApiError::unauthorized("unknown user")),
            Err(e) => Err(e.into()),
        }
    }
}
