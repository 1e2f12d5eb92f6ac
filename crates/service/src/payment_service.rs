//! Payments for bookings and retouch orders.

use models::notification::NotificationKind;
use models::payment::{self, NewPayment, PaymentTarget};
use models::status::{Lifecycle, PaymentMethod, PaymentStatus};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::actor::Actor;
use crate::errors::ServiceError;
use crate::notification_service::notify;
use crate::pagination::{fetch_page, Paged, Pagination};
use crate::{booking_service, retouch_order_service};

#[derive(Debug, Clone)]
pub struct CreatePayment {
    pub booking_id: Option<Uuid>,
    pub retouch_order_id: Option<Uuid>,
    pub method: PaymentMethod,
}

/// Who pays whom and how much for a target, after checking the caller is its client.
async fn resolve(db: &DatabaseConnection, actor: &Actor, target: PaymentTarget) -> Result<(Uuid, i64), ServiceError> {
    match target {
        PaymentTarget::Booking(id) => {
            let ctx = booking_service::load(db, id).await?;
            if ctx.booking.client_id != actor.user_id {
                return Err(ServiceError::forbidden("only the client can pay for this booking"));
            }
            let status = ctx.booking.status()?;
            if !status.is_payable() {
                return Err(ServiceError::InvalidState(format!("a {status} booking cannot be paid")));
            }
            Ok((ctx.photographer.user_id, ctx.booking.price_cents))
        }
        PaymentTarget::RetouchOrder(id) => {
            let ctx = retouch_order_service::load(db, id).await?;
            if ctx.order.client_id != actor.user_id {
                return Err(ServiceError::forbidden("only the client can pay for this order"));
            }
            let status = ctx.order.status()?;
            if !status.is_payable() {
                return Err(ServiceError::InvalidState(format!("a {status} retouch order cannot be paid")));
            }
            Ok((ctx.retoucher.user_id, ctx.order.price_cents))
        }
    }
}

#[instrument(skip(db, input), fields(payer_id = %actor.user_id, method = %input.method))]
pub async fn create(db: &DatabaseConnection, actor: &Actor, input: CreatePayment) -> Result<payment::Model, ServiceError> {
    let target = PaymentTarget::from_ids(input.booking_id, input.retouch_order_id)?;
    let (payee_id, amount_cents) = resolve(db, actor, target).await?;

    let txn = db.begin().await?;
    if !payment::find_live_for(&txn, target).await?.is_empty() {
        return Err(ServiceError::Conflict("a payment for this item already exists".into()));
    }
    let p = payment::create(&txn, NewPayment { payer_id: actor.user_id, payee_id, target, amount_cents, method: input.method }).await?;
    let message = match p.status()? {
        PaymentStatus::Completed => format!("Received payment of {} {}", format_cents(p.amount_cents), p.currency),
        _ => format!("Payment of {} {} awaits your confirmation", format_cents(p.amount_cents), p.currency),
    };
    notify(&txn, payee_id, NotificationKind::PaymentReceived, message, Some(p.id)).await?;
    txn.commit().await?;
    info!(payment_id = %p.id, amount_cents, status = %p.status, "payment recorded");
    Ok(p)
}

async fn find(db: &DatabaseConnection, id: Uuid) -> Result<payment::Model, ServiceError> {
    payment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("payment"))
}

pub async fn get(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<payment::Model, ServiceError> {
    let p = find(db, id).await?;
    if p.payer_id != actor.user_id && p.payee_id != actor.user_id && !actor.is_admin() {
        return Err(ServiceError::forbidden("not a party to this payment"));
    }
    Ok(p)
}

/// Payments the caller made or received, newest first.
pub async fn list_mine(db: &DatabaseConnection, actor: &Actor, opts: Pagination) -> Result<Paged<payment::Model>, ServiceError> {
    let select = payment::Entity::find()
        .filter(
            Condition::any()
                .add(payment::Column::PayerId.eq(actor.user_id))
                .add(payment::Column::PayeeId.eq(actor.user_id)),
        )
        .order_by_desc(payment::Column::CreatedAt);
    fetch_page(db, select, opts).await
}

/// The payee acknowledges a pending (cash) payment.
#[instrument(skip(db), fields(user_id = %actor.user_id))]
pub async fn confirm(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<payment::Model, ServiceError> {
    let p = get(db, actor, id).await?;
    if p.payee_id != actor.user_id && !actor.is_admin() {
        return Err(ServiceError::forbidden("only the payee can confirm a payment"));
    }
    let current = p.status()?;
    if current != PaymentStatus::Pending {
        return Err(ServiceError::InvalidState(format!("payment is already {current}")));
    }
    let txn = db.begin().await?;
    let payer = p.payer_id;
    let updated = payment::set_status(&txn, p, PaymentStatus::Completed).await?;
    notify(&txn, payer, NotificationKind::PaymentConfirmed, "Your payment was confirmed", Some(updated.id)).await?;
    txn.commit().await?;
    info!(payment_id = %updated.id, "payment confirmed");
    Ok(updated)
}

#[instrument(skip(db), fields(admin_id = %actor.user_id))]
pub async fn refund(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<payment::Model, ServiceError> {
    actor.require_admin()?;
    let p = find(db, id).await?;
    let current = p.status()?;
    if current != PaymentStatus::Completed || !current.can_transition_to(PaymentStatus::Refunded) {
        return Err(ServiceError::InvalidState(format!("only completed payments can be refunded, this one is {current}")));
    }
    let txn = db.begin().await?;
    let payer = p.payer_id;
    let updated = payment::set_status(&txn, p, PaymentStatus::Refunded).await?;
    notify(&txn, payer, NotificationKind::PaymentRefunded, "Your payment was refunded", Some(updated.id)).await?;
    txn.commit().await?;
    info!(payment_id = %updated.id, "payment refunded");
    Ok(updated)
}

fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use models::booking::{self, NewBooking};
    use models::status::BookingStatus;

    use crate::test_support::{self, get_db};

    struct World {
        db: DatabaseConnection,
        client: Actor,
        shooter: Actor,
        admin: Actor,
        booking: booking::Model,
    }

    async fn world(status: BookingStatus) -> Result<World, anyhow::Error> {
        let db = get_db().await?;
        let c = test_support::user(&db, "client").await?;
        let (pu, p) = test_support::photographer(&db, "shooter", 5000).await?;
        let a = test_support::admin(&db, "root").await?;
        let b = booking::create(
            &db,
            NewBooking {
                client_id: c.id,
                photographer: p,
                start_at: Utc::now() + Duration::days(2),
                duration_minutes: 60,
                location: "Harbour".into(),
                notes: None,
            },
        )
        .await?;
        let b = booking::set_status(&db, b, status).await?;
        Ok(World {
            client: test_support::actor(&db, &c).await?,
            shooter: test_support::actor(&db, &pu).await?,
            admin: test_support::actor(&db, &a).await?,
            booking: b,
            db,
        })
    }

    fn pay(w: &World, method: PaymentMethod) -> CreatePayment {
        CreatePayment { booking_id: Some(w.booking.id), retouch_order_id: None, method }
    }

    #[tokio::test]
    async fn card_completes_and_blocks_duplicates() -> Result<(), anyhow::Error> {
        let w = world(BookingStatus::Confirmed).await?;
        let p = create(&w.db, &w.client, pay(&w, PaymentMethod::Card)).await?;
        assert_eq!(p.status()?, PaymentStatus::Completed);
        assert_eq!(p.amount_cents, 5000);
        assert_eq!(p.payee_id, w.shooter.user_id);
        let err = create(&w.db, &w.client, pay(&w, PaymentMethod::Transfer)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)), "{err:?}");

        assert!(matches!(refund(&w.db, &w.client, p.id).await, Err(ServiceError::Forbidden(_))));
        let refunded = refund(&w.db, &w.admin, p.id).await?;
        assert_eq!(refunded.status()?, PaymentStatus::Refunded);
        assert!(matches!(refund(&w.db, &w.admin, p.id).await, Err(ServiceError::InvalidState(_))));
        // a refunded payment no longer blocks a new one
        create(&w.db, &w.client, pay(&w, PaymentMethod::Card)).await?;
        Ok(())
    }

    #[tokio::test]
    async fn cash_waits_for_payee() -> Result<(), anyhow::Error> {
        let w = world(BookingStatus::InProgress).await?;
        let p = create(&w.db, &w.client, pay(&w, PaymentMethod::Cash)).await?;
        assert_eq!(p.status()?, PaymentStatus::Pending);
        assert!(p.paid_at.is_none());
        assert!(matches!(confirm(&w.db, &w.client, p.id).await, Err(ServiceError::Forbidden(_))));
        let done = confirm(&w.db, &w.shooter, p.id).await?;
        assert_eq!(done.status()?, PaymentStatus::Completed);
        assert!(done.paid_at.is_some());
        assert!(matches!(confirm(&w.db, &w.shooter, p.id).await, Err(ServiceError::InvalidState(_))));
        assert_eq!(list_mine(&w.db, &w.shooter, Pagination::default()).await?.total, 1);
        assert_eq!(list_mine(&w.db, &w.client, Pagination::default()).await?.total, 1);
        Ok(())
    }

    #[tokio::test]
    async fn pending_booking_is_not_payable() -> Result<(), anyhow::Error> {
        let w = world(BookingStatus::Pending).await?;
        let err = create(&w.db, &w.client, pay(&w, PaymentMethod::Card)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)), "{err:?}");
        let err = create(&w.db, &w.shooter, pay(&w, PaymentMethod::Card)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)), "{err:?}");
        let both = CreatePayment { retouch_order_id: Some(Uuid::new_v4()), ..pay(&w, PaymentMethod::Card) };
        assert!(matches!(create(&w.db, &w.client, both).await, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[test]
    fn cents_render_with_two_decimals() {
        assert_eq!(format_cents(12345), "123.45");
        assert_eq!(format_cents(5), "0.05");
    }
}
