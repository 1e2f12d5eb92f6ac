//! Role applications and admin role management.

use models::notification::NotificationKind;
use models::role::Role;
use models::role_application;
use models::status::{ApplicationStatus, Lifecycle};
use models::{photographer, retoucher, user};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::actor::Actor;
use crate::errors::ServiceError;
use crate::notification_service::notify;
use crate::pagination::{fetch_page, Paged, Pagination};

#[derive(Debug, Clone)]
pub struct ApplyInput {
    pub role: Role,
    pub message: String,
    pub rate_cents: i64,
    pub location: Option<String>,
}

#[instrument(skip(db, input), fields(user_id = %actor.user_id, role = %input.role))]
pub async fn apply(db: &DatabaseConnection, actor: &Actor, input: ApplyInput) -> Result<role_application::Model, ServiceError> {
    if !input.role.is_applicable() {
        return Err(ServiceError::Validation(format!("role {} cannot be applied for", input.role)));
    }
    if actor.has(input.role) {
        return Err(ServiceError::Conflict(format!("already holding role {}", input.role)));
    }
    if role_application::find_pending(db, actor.user_id, input.role).await?.is_some() {
        return Err(ServiceError::Conflict(format!("a pending application for {} already exists", input.role)));
    }
    let app = role_application::create(db, actor.user_id, input.role, &input.message, input.rate_cents, input.location).await?;
    info!(application_id = %app.id, "role application submitted");
    Ok(app)
}

pub async fn my_applications(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<role_application::Model>, ServiceError> {
    Ok(role_application::Entity::find()
        .filter(role_application::Column::UserId.eq(actor.user_id))
        .order_by_desc(role_application::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn list_applications(
    db: &DatabaseConnection,
    actor: &Actor,
    status: Option<ApplicationStatus>,
    opts: Pagination,
) -> Result<Paged<role_application::Model>, ServiceError> {
    actor.require_admin()?;
    let mut select = role_application::Entity::find();
    if let Some(s) = status {
        select = select.filter(role_application::Column::Status.eq(s.as_str()));
    }
    fetch_page(db, select.order_by_asc(role_application::Column::CreatedAt), opts).await
}

async fn load_pending(db: &DatabaseConnection, id: Uuid, decision: ApplicationStatus) -> Result<role_application::Model, ServiceError> {
    let app = role_application::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("role application"))?;
    let current = app.status()?;
    if !current.can_transition_to(decision) {
        return Err(ServiceError::InvalidState(format!("application is already {current}")));
    }
    Ok(app)
}

/// Approve: activate the profile, record the decision and notify the applicant atomically.
#[instrument(skip(db), fields(admin_id = %actor.user_id))]
pub async fn approve(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<role_application::Model, ServiceError> {
    actor.require_admin()?;
    let app = load_pending(db, id, ApplicationStatus::Approved).await?;
    let role = app.role()?;

    let txn = db.begin().await?;
    match role {
        Role::Photographer => {
            photographer::activate(&txn, app.user_id, app.rate_cents, app.location.clone()).await?;
        }
        Role::Retoucher => {
            retoucher::activate(&txn, app.user_id, app.rate_cents).await?;
        }
        other => return Err(ServiceError::Validation(format!("role {other} cannot be granted by application"))),
    }
    let decided = role_application::decide(&txn, app, ApplicationStatus::Approved, actor.user_id, None).await?;
    notify(
        &txn,
        decided.user_id,
        NotificationKind::RoleApplicationDecided,
        format!("Your application for {role} was approved"),
        Some(decided.id),
    )
    .await?;
    txn.commit().await?;
    info!(application_id = %decided.id, %role, "role application approved");
    Ok(decided)
}

#[instrument(skip(db, note), fields(admin_id = %actor.user_id))]
pub async fn reject(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    note: Option<String>,
) -> Result<role_application::Model, ServiceError> {
    actor.require_admin()?;
    let app = load_pending(db, id, ApplicationStatus::Rejected).await?;
    let role = app.role()?;

    let txn = db.begin().await?;
    let decided = role_application::decide(&txn, app, ApplicationStatus::Rejected, actor.user_id, note).await?;
    let message = match &decided.review_note {
        Some(n) => format!("Your application for {role} was rejected: {n}"),
        None => format!("Your application for {role} was rejected"),
    };
    notify(&txn, decided.user_id, NotificationKind::RoleApplicationDecided, message, Some(decided.id)).await?;
    txn.commit().await?;
    info!(application_id = %decided.id, %role, "role application rejected");
    Ok(decided)
}

/// Deactivate a profile role. Admin is managed through the admin flag instead.
#[instrument(skip(db), fields(admin_id = %actor.user_id))]
pub async fn revoke(db: &DatabaseConnection, actor: &Actor, user_id: Uuid, role: Role) -> Result<(), ServiceError> {
    actor.require_admin()?;
    if user::Entity::find_by_id(user_id).one(db).await?.is_none() {
        return Err(ServiceError::not_found("user"));
    }
    let txn = db.begin().await?;
    match role {
        Role::Photographer => {
            let p = photographer::find_active_by_user(&txn, user_id)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("user does not hold role {role}")))?;
            photographer::deactivate(&txn, p).await?;
        }
        Role::Retoucher => {
            let r = retoucher::find_active_by_user(&txn, user_id)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("user does not hold role {role}")))?;
            retoucher::deactivate(&txn, r).await?;
        }
        other => return Err(ServiceError::Validation(format!("role {other} cannot be revoked"))),
    }
    notify(&txn, user_id, NotificationKind::RoleRevoked, format!("Your {role} role was revoked"), None).await?;
    txn.commit().await?;
    info!(%user_id, %role, "role revoked");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, get_db};
    use models::notification;

    fn photographer_app() -> ApplyInput {
        ApplyInput { role: Role::Photographer, message: "I shoot weddings".into(), rate_cents: 8000, location: Some("Porto".into()) }
    }

    #[tokio::test]
    async fn apply_then_approve_grants_role() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let root = test_support::admin(&db, "root").await?;
        let u = test_support::user(&db, "hopeful").await?;
        let (admin, me) = (test_support::actor(&db, &root).await?, test_support::actor(&db, &u).await?);

        let app = apply(&db, &me, photographer_app()).await?;
        assert!(matches!(apply(&db, &me, photographer_app()).await, Err(ServiceError::Conflict(_))));
        assert!(matches!(approve(&db, &me, app.id).await, Err(ServiceError::Forbidden(_))));

        let decided = approve(&db, &admin, app.id).await?;
        assert_eq!(decided.status, "Approved");
        assert_eq!(decided.reviewed_by, Some(root.id));

        let me = test_support::actor(&db, &u).await?;
        assert!(me.has(Role::Photographer));
        let profile = photographer::find_active_by_user(&db, u.id).await?.expect("profile");
        assert_eq!(profile.hourly_rate_cents, 8000);
        assert_eq!(notification::count_unread(&db, u.id).await?, 1);

        assert!(matches!(apply(&db, &me, photographer_app()).await, Err(ServiceError::Conflict(_))));
        assert!(matches!(reject(&db, &admin, app.id, None).await, Err(ServiceError::InvalidState(_))));
        Ok(())
    }

    #[tokio::test]
    async fn cannot_apply_for_admin() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let u = test_support::user(&db, "sneaky").await?;
        let me = test_support::actor(&db, &u).await?;
        let input = ApplyInput { role: Role::Admin, ..photographer_app() };
        assert!(matches!(apply(&db, &me, input).await, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn reject_keeps_note_and_allows_reapply() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let root = test_support::admin(&db, "root").await?;
        let u = test_support::user(&db, "retry").await?;
        let (admin, me) = (test_support::actor(&db, &root).await?, test_support::actor(&db, &u).await?);
        let input = ApplyInput { role: Role::Retoucher, message: "Lightroom pro".into(), rate_cents: 500, location: None };
        let app = apply(&db, &me, input.clone()).await?;
        let rejected = reject(&db, &admin, app.id, Some("portfolio too thin".into())).await?;
        assert_eq!(rejected.review_note.as_deref(), Some("portfolio too thin"));
        assert!(apply(&db, &me, input).await.is_ok());
        assert_eq!(my_applications(&db, &me).await?.len(), 2);
        let pending = list_applications(&db, &admin, Some(ApplicationStatus::Pending), Pagination::default()).await?;
        assert_eq!(pending.total, 1);
        Ok(())
    }

    #[tokio::test]
    async fn revoke_deactivates_profile() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let root = test_support::admin(&db, "root").await?;
        let admin = test_support::actor(&db, &root).await?;
        let (u, _) = test_support::retoucher(&db, "editor", 300).await?;

        revoke(&db, &admin, u.id, Role::Retoucher).await?;
        assert!(!test_support::actor(&db, &u).await?.has(Role::Retoucher));
        assert!(matches!(revoke(&db, &admin, u.id, Role::Retoucher).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(revoke(&db, &admin, u.id, Role::Admin).await, Err(ServiceError::Validation(_))));
        Ok(())
    }
}
