//! Request and response shapes of the HTTP surface.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use models::role::Role;
use models::user;
use serde::{Deserialize, Serialize};
use service::errors::ServiceError;
use service::pagination::Pagination;
use service::user_service::UserProfile;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::errors::JsonApiError;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page index
    pub page: Option<u32>,
    /// Page size, clamped to 1..=100
    pub per_page: Option<u32>,
}

impl From<PageQuery> for Pagination {
    fn from(q: PageQuery) -> Self {
        Pagination::new(q.page, q.per_page)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    pub status: Option<String>,
}

/// `?as=client|photographer|retoucher&status=`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PartyQuery {
    #[serde(rename = "as")]
    pub view: Option<String>,
    pub status: Option<String>,
}

/// Parse an optional enum from a query string or body field.
pub fn parse_opt<T>(raw: Option<&str>) -> Result<Option<T>, JsonApiError>
where
    T: FromStr<Err = models::errors::ModelError>,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Ok(Some(s.parse::<T>().map_err(ServiceError::from)?)),
        None => Ok(None),
    }
}

pub fn parse_req<T>(raw: &str) -> Result<T, JsonApiError>
where
    T: FromStr<Err = models::errors::ModelError>,
{
    Ok(raw.parse::<T>().map_err(ServiceError::from)?)
}

/// A user as shown to other users: no email, no admin flag.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserView {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            display_name: u.display_name,
            bio: u.bio,
            avatar_url: u.avatar_url,
            created_at: u.created_at.with_timezone(&Utc),
        }
    }
}

/// The caller's own account.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MeView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    #[schema(value_type = Vec<String>)]
    pub roles: BTreeSet<Role>,
}

impl MeView {
    pub fn new(u: user::Model, roles: BTreeSet<Role>) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            display_name: u.display_name,
            bio: u.bio,
            avatar_url: u.avatar_url,
            is_admin: u.is_admin,
            roles,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileView {
    #[serde(flatten)]
    pub user: UserView,
    #[schema(value_type = Vec<String>)]
    pub roles: BTreeSet<Role>,
    pub followers: u64,
    pub following: u64,
}

impl From<UserProfile> for ProfileView {
    fn from(p: UserProfile) -> Self {
        Self { user: p.user.into(), roles: p.roles, followers: p.followers, following: p.following }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::status::BookingStatus;

    #[test]
    fn blank_filters_are_ignored() {
        assert_eq!(parse_opt::<BookingStatus>(None).unwrap(), None);
        assert_eq!(parse_opt::<BookingStatus>(Some("  ")).unwrap(), None);
        assert_eq!(parse_opt::<BookingStatus>(Some("confirmed")).unwrap(), Some(BookingStatus::Confirmed));
    }

    #[test]
    fn unknown_filter_is_bad_request() {
        let err = parse_opt::<BookingStatus>(Some("Done")).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
