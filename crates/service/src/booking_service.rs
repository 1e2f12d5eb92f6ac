//! Booking lifecycle: who may create, see and move a photographer booking.

use chrono::{DateTime, Utc};
use models::booking::{self, NewBooking};
use models::notification::NotificationKind;
use models::payment::{self, PaymentTarget};
use models::photographer;
use models::status::{BookingStatus, Lifecycle, PaymentStatus};
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::actor::Actor;
use crate::errors::ServiceError;
use crate::notification_service::notify;
use crate::pagination::{fetch_page, Paged, Pagination};

#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub photographer_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub location: String,
    pub notes: Option<String>,
}

/// Which side of the booking the caller lists from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingView {
    #[default]
    Client,
    Photographer,
}

/// How the caller relates to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Party {
    Client,
    Photographer,
    Admin,
}

/// A booking together with the photographer profile it refers to.
pub(crate) struct BookingCtx {
    pub booking: booking::Model,
    pub photographer: photographer::Model,
}

impl BookingCtx {
    fn party(&self, actor: &Actor) -> Option<Party> {
        if self.booking.client_id == actor.user_id {
            Some(Party::Client)
        } else if self.photographer.user_id == actor.user_id {
            Some(Party::Photographer)
        } else if actor.is_admin() {
            Some(Party::Admin)
        } else {
            None
        }
    }

    pub fn is_party(&self, actor: &Actor) -> bool {
        self.party(actor).is_some()
    }

    pub fn is_photographer(&self, actor: &Actor) -> bool {
        self.photographer.user_id == actor.user_id
    }
}

pub(crate) async fn load<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<BookingCtx, ServiceError> {
    let (booking, photographer) = booking::Entity::find_by_id(id)
        .find_also_related(photographer::Entity)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("booking"))?;
    let photographer = photographer.ok_or_else(|| ServiceError::Db("booking without photographer".into()))?;
    Ok(BookingCtx { booking, photographer })
}

fn may_move(party: Party, next: BookingStatus) -> bool {
    match next {
        BookingStatus::Cancelled => true,
        BookingStatus::Confirmed | BookingStatus::Rejected | BookingStatus::InProgress | BookingStatus::Completed => {
            matches!(party, Party::Photographer | Party::Admin)
        }
        BookingStatus::Pending => false,
    }
}

#[instrument(skip(db, input), fields(client_id = %actor.user_id, photographer_id = %input.photographer_id))]
pub async fn create(db: &DatabaseConnection, actor: &Actor, input: CreateBooking) -> Result<booking::Model, ServiceError> {
    let p = photographer::Entity::find_by_id(input.photographer_id)
        .one(db)
        .await?
        .filter(|p| p.active)
        .ok_or_else(|| ServiceError::not_found("photographer"))?;
    if p.user_id == actor.user_id {
        return Err(ServiceError::Validation("cannot book yourself".into()));
    }
    if !p.is_bookable() {
        return Err(ServiceError::Validation("photographer is not accepting bookings".into()));
    }
    let photographer_user = p.user_id;

    let txn = db.begin().await?;
    let b = booking::create(
        &txn,
        NewBooking {
            client_id: actor.user_id,
            photographer: p,
            start_at: input.start_at,
            duration_minutes: input.duration_minutes,
            location: input.location,
            notes: input.notes,
        },
    )
    .await?;
    notify(
        &txn,
        photographer_user,
        NotificationKind::BookingRequested,
        format!("New booking request for {}", b.start_at.to_rfc3339()),
        Some(b.id),
    )
    .await?;
    txn.commit().await?;
    info!(booking_id = %b.id, price_cents = b.price_cents, "booking created");
    Ok(b)
}

pub async fn get(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<booking::Model, ServiceError> {
    let ctx = load(db, id).await?;
    if !ctx.is_party(actor) {
        return Err(ServiceError::forbidden("not a party to this booking"));
    }
    Ok(ctx.booking)
}

pub async fn list_mine(
    db: &DatabaseConnection,
    actor: &Actor,
    view: BookingView,
    status: Option<BookingStatus>,
    opts: Pagination,
) -> Result<Paged<booking::Model>, ServiceError> {
    let mut select = match view {
        BookingView::Client => booking::Entity::find().filter(booking::Column::ClientId.eq(actor.user_id)),
        BookingView::Photographer => match photographer::find_by_user(db, actor.user_id).await? {
            Some(p) => booking::Entity::find().filter(booking::Column::PhotographerId.eq(p.id)),
            None => return Ok(Paged::empty(opts)),
        },
    };
    if let Some(s) = status {
        select = select.filter(booking::Column::Status.eq(s.as_str()));
    }
    fetch_page(db, select.order_by_asc(booking::Column::StartAt), opts).await
}

pub async fn admin_list(
    db: &DatabaseConnection,
    actor: &Actor,
    status: Option<BookingStatus>,
    opts: Pagination,
) -> Result<Paged<booking::Model>, ServiceError> {
    actor.require_admin()?;
    let mut select = booking::Entity::find();
    if let Some(s) = status {
        select = select.filter(booking::Column::Status.eq(s.as_str()));
    }
    fetch_page(db, select.order_by_desc(booking::Column::CreatedAt), opts).await
}

/// Move a booking along its lifecycle.
///
/// Non-parties get `Forbidden`; moves outside the graph get `InvalidState`;
/// legal moves by the wrong party get `Forbidden`. Confirming checks the
/// photographer's calendar and cancelling refunds live payments, both in the
/// same transaction as the status write.
#[instrument(skip(db), fields(user_id = %actor.user_id))]
pub async fn change_status(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    next: BookingStatus,
) -> Result<booking::Model, ServiceError> {
    let txn = db.begin().await?;
    let ctx = load(&txn, id).await?;
    let party = ctx.party(actor).ok_or_else(|| ServiceError::forbidden("not a party to this booking"))?;
    let current = ctx.booking.status()?;
    if !current.can_transition_to(next) {
        return Err(ServiceError::InvalidState(format!("cannot move booking from {current} to {next}")));
    }
    let party = match party {
        p if may_move(p, next) => p,
        _ if actor.is_admin() => Party::Admin,
        _ => return Err(ServiceError::forbidden(format!("only the photographer can mark a booking {next}"))),
    };

    if next == BookingStatus::Confirmed {
        let (start, end) = (ctx.booking.start_at.with_timezone(&Utc), ctx.booking.end_at());
        let clash = booking::find_blocking(&txn, ctx.photographer.id)
            .await?
            .into_iter()
            .find(|other| other.id != ctx.booking.id && other.overlaps(start, end));
        if let Some(other) = clash {
            return Err(ServiceError::InvalidState(format!("overlaps booking {}", other.id)));
        }
    }

    let client_id = ctx.booking.client_id;
    let photographer_user = ctx.photographer.user_id;
    let updated = booking::set_status(&txn, ctx.booking, next).await?;

    if next == BookingStatus::Cancelled {
        for p in payment::find_live_for(&txn, PaymentTarget::Booking(updated.id)).await? {
            let payer = p.payer_id;
            let refunded = payment::set_status(&txn, p, PaymentStatus::Refunded).await?;
            notify(&txn, payer, NotificationKind::PaymentRefunded, "Payment refunded after cancellation", Some(refunded.id)).await?;
        }
    }

    let message = format!("Booking is now {next}");
    let recipients = match party {
        Party::Client => vec![photographer_user],
        Party::Photographer => vec![client_id],
        Party::Admin => vec![client_id, photographer_user],
    };
    for to in recipients {
        notify(&txn, to, NotificationKind::BookingStatusChanged, message.clone(), Some(updated.id)).await?;
    }
    txn.commit().await?;
    info!(booking_id = %updated.id, from = %current, to = %next, "booking status changed");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use models::notification;
    use models::status::PaymentMethod;

    use crate::test_support::{self, get_db};

    struct World {
        db: DatabaseConnection,
        client: Actor,
        shooter: Actor,
        outsider: Actor,
        admin: Actor,
        photographer_id: Uuid,
    }

    async fn world() -> Result<World, anyhow::Error> {
        let db = get_db().await?;
        let c = test_support::user(&db, "client").await?;
        let (pu, p) = test_support::photographer(&db, "shooter", 6000).await?;
        let o = test_support::user(&db, "outsider").await?;
        let a = test_support::admin(&db, "root").await?;
        Ok(World {
            client: test_support::actor(&db, &c).await?,
            shooter: test_support::actor(&db, &pu).await?,
            outsider: test_support::actor(&db, &o).await?,
            admin: test_support::actor(&db, &a).await?,
            photographer_id: p.id,
            db,
        })
    }

    fn request(w: &World, hours_ahead: i64, minutes: i32) -> CreateBooking {
        CreateBooking {
            photographer_id: w.photographer_id,
            start_at: Utc::now() + Duration::hours(hours_ahead),
            duration_minutes: minutes,
            location: "Old town".into(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn happy_path_through_completion() -> Result<(), anyhow::Error> {
        let w = world().await?;
        let b = create(&w.db, &w.client, request(&w, 48, 120)).await?;
        assert_eq!(b.price_cents, 12000);
        assert_eq!(notification::count_unread(&w.db, w.shooter.user_id).await?, 1);

        for next in [BookingStatus::Confirmed, BookingStatus::InProgress, BookingStatus::Completed] {
            let b = change_status(&w.db, &w.shooter, b.id, next).await?;
            assert_eq!(b.status()?, next);
        }
        assert_eq!(notification::count_unread(&w.db, w.client.user_id).await?, 3);
        Ok(())
    }

    #[tokio::test]
    async fn wrong_actor_and_wrong_edge() -> Result<(), anyhow::Error> {
        let w = world().await?;
        let b = create(&w.db, &w.client, request(&w, 24, 60)).await?;

        let err = change_status(&w.db, &w.client, b.id, BookingStatus::Confirmed).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)), "{err:?}");
        let err = change_status(&w.db, &w.outsider, b.id, BookingStatus::Cancelled).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)), "{err:?}");
        let err = change_status(&w.db, &w.shooter, b.id, BookingStatus::Completed).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)), "{err:?}");

        change_status(&w.db, &w.client, b.id, BookingStatus::Cancelled).await?;
        let err = change_status(&w.db, &w.admin, b.id, BookingStatus::Confirmed).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn confirm_rejects_overlap() -> Result<(), anyhow::Error> {
        let w = world().await?;
        let first = create(&w.db, &w.client, request(&w, 24, 120)).await?;
        let overlapping = create(&w.db, &w.client, request(&w, 25, 60)).await?;
        let later = create(&w.db, &w.client, request(&w, 26, 60)).await?;

        change_status(&w.db, &w.shooter, first.id, BookingStatus::Confirmed).await?;
        let err = change_status(&w.db, &w.shooter, overlapping.id, BookingStatus::Confirmed).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)), "{err:?}");
        change_status(&w.db, &w.shooter, later.id, BookingStatus::Confirmed).await?;
        Ok(())
    }

    #[tokio::test]
    async fn cancel_refunds_payment() -> Result<(), anyhow::Error> {
        let w = world().await?;
        let b = create(&w.db, &w.client, request(&w, 24, 60)).await?;
        change_status(&w.db, &w.shooter, b.id, BookingStatus::Confirmed).await?;
        let paid = payment::create(
            &w.db,
            payment::NewPayment {
                payer_id: w.client.user_id,
                payee_id: w.shooter.user_id,
                target: PaymentTarget::Booking(b.id),
                amount_cents: b.price_cents,
                method: PaymentMethod::Card,
            },
        )
        .await?;

        change_status(&w.db, &w.client, b.id, BookingStatus::Cancelled).await?;
        let after = payment::Entity::find_by_id(paid.id).one(&w.db).await?.expect("payment");
        assert_eq!(after.status()?, PaymentStatus::Refunded);
        assert!(after.refunded_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn admin_booking_for_themselves_can_still_confirm() -> Result<(), anyhow::Error> {
        let w = world().await?;
        let b = create(&w.db, &w.admin, request(&w, 24, 60)).await?;
        let confirmed = change_status(&w.db, &w.admin, b.id, BookingStatus::Confirmed).await?;
        assert_eq!(confirmed.status()?, BookingStatus::Confirmed);
        let err = change_status(&w.db, &w.client, b.id, BookingStatus::Cancelled).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn create_guards() -> Result<(), anyhow::Error> {
        let w = world().await?;
        let err = create(&w.db, &w.shooter, request(&w, 24, 60)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = create(&w.db, &w.client, request(&w, 24, 10)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let mut bad = request(&w, 24, 60);
        bad.photographer_id = Uuid::new_v4();
        assert!(matches!(create(&w.db, &w.client, bad).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn listing_by_side_and_visibility() -> Result<(), anyhow::Error> {
        let w = world().await?;
        let b = create(&w.db, &w.client, request(&w, 24, 60)).await?;
        let as_client = list_mine(&w.db, &w.client, BookingView::Client, None, Pagination::default()).await?;
        let as_shooter = list_mine(&w.db, &w.shooter, BookingView::Photographer, None, Pagination::default()).await?;
        let none = list_mine(&w.db, &w.outsider, BookingView::Photographer, None, Pagination::default()).await?;
        assert_eq!((as_client.total, as_shooter.total, none.total), (1, 1, 0));
        let confirmed = list_mine(&w.db, &w.client, BookingView::Client, Some(BookingStatus::Confirmed), Pagination::default()).await?;
        assert_eq!(confirmed.total, 0);

        assert!(get(&w.db, &w.admin, b.id).await.is_ok());
        assert!(matches!(get(&w.db, &w.outsider, b.id).await, Err(ServiceError::Forbidden(_))));
        assert!(matches!(admin_list(&w.db, &w.client, None, Pagination::default()).await, Err(ServiceError::Forbidden(_))));
        assert_eq!(admin_list(&w.db, &w.admin, None, Pagination::default()).await?.total, 1);
        Ok(())
    }
}
