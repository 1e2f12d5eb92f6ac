//! Retouching orders: a client sends one of their photos to a retoucher.

use models::notification::NotificationKind;
use models::payment::{self, PaymentTarget};
use models::status::{Lifecycle, PaymentStatus, RetouchOrderStatus};
use models::{photo, retouch_order, retoucher};
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::actor::Actor;
use crate::booking_service;
use crate::errors::ServiceError;
use crate::notification_service::notify;
use crate::pagination::{fetch_page, Paged, Pagination};

#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub retoucher_id: Uuid,
    pub photo_id: Uuid,
    pub instructions: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderView {
    #[default]
    Client,
    Retoucher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Party {
    Client,
    Retoucher,
    Admin,
}

pub(crate) struct OrderCtx {
    pub order: retouch_order::Model,
    pub retoucher: retoucher::Model,
}

impl OrderCtx {
    fn party(&self, actor: &Actor) -> Option<Party> {
        if self.order.client_id == actor.user_id {
            Some(Party::Client)
        } else if self.retoucher.user_id == actor.user_id {
            Some(Party::Retoucher)
        } else if actor.is_admin() {
            Some(Party::Admin)
        } else {
            None
        }
    }
}

pub(crate) async fn load<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<OrderCtx, ServiceError> {
    let (order, retoucher) = retouch_order::Entity::find_by_id(id)
        .find_also_related(retoucher::Entity)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("retouch order"))?;
    let retoucher = retoucher.ok_or_else(|| ServiceError::Db("retouch order without retoucher".into()))?;
    Ok(OrderCtx { order, retoucher })
}

fn may_move(party: Party, next: RetouchOrderStatus) -> bool {
    match next {
        RetouchOrderStatus::Accepted | RetouchOrderStatus::Rejected | RetouchOrderStatus::InProgress => {
            matches!(party, Party::Retoucher | Party::Admin)
        }
        RetouchOrderStatus::Cancelled => matches!(party, Party::Client | Party::Admin),
        RetouchOrderStatus::Pending | RetouchOrderStatus::Completed => false,
    }
}

/// The caller may order retouching of photos they own or that were shot for their booking.
async fn may_order(db: &DatabaseConnection, actor: &Actor, p: &photo::Model) -> Result<bool, ServiceError> {
    if p.owner_id == actor.user_id {
        return Ok(true);
    }
    match p.booking_id {
        Some(id) => Ok(booking_service::load(db, id).await?.booking.client_id == actor.user_id),
        None => Ok(false),
    }
}

#[instrument(skip(db, input), fields(client_id = %actor.user_id, retoucher_id = %input.retoucher_id))]
pub async fn create(db: &DatabaseConnection, actor: &Actor, input: CreateOrder) -> Result<retouch_order::Model, ServiceError> {
    let p = photo::Entity::find_by_id(input.photo_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("photo"))?;
    if !may_order(db, actor, &p).await? {
        return Err(ServiceError::forbidden("photo does not belong to you"));
    }
    let r = retoucher::Entity::find_by_id(input.retoucher_id)
        .one(db)
        .await?
        .filter(|r| r.active)
        .ok_or_else(|| ServiceError::not_found("retoucher"))?;
    if r.user_id == actor.user_id {
        return Err(ServiceError::Validation("cannot order retouching from yourself".into()));
    }
    if !r.accepts_orders() {
        return Err(ServiceError::Validation("retoucher is not accepting orders".into()));
    }

    let txn = db.begin().await?;
    let order = retouch_order::create(&txn, actor.user_id, &r, p.id, &input.instructions).await?;
    notify(&txn, r.user_id, NotificationKind::RetouchOrderRequested, "New retouching order", Some(order.id)).await?;
    txn.commit().await?;
    info!(order_id = %order.id, price_cents = order.price_cents, "retouch order created");
    Ok(order)
}

pub async fn get(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<retouch_order::Model, ServiceError> {
    let ctx = load(db, id).await?;
    if ctx.party(actor).is_none() {
        return Err(ServiceError::forbidden("not a party to this order"));
    }
    Ok(ctx.order)
}

pub async fn list_mine(
    db: &DatabaseConnection,
    actor: &Actor,
    view: OrderView,
    status: Option<RetouchOrderStatus>,
    opts: Pagination,
) -> Result<Paged<retouch_order::Model>, ServiceError> {
    let mut select = match view {
        OrderView::Client => retouch_order::Entity::find().filter(retouch_order::Column::ClientId.eq(actor.user_id)),
        OrderView::Retoucher => match retoucher::find_by_user(db, actor.user_id).await? {
            Some(r) => retouch_order::Entity::find().filter(retouch_order::Column::RetoucherId.eq(r.id)),
            None => return Ok(Paged::empty(opts)),
        },
    };
    if let Some(s) = status {
        select = select.filter(retouch_order::Column::Status.eq(s.as_str()));
    }
    fetch_page(db, select.order_by_desc(retouch_order::Column::CreatedAt), opts).await
}

/// Move an order along its lifecycle. Completion goes through [`complete`].
#[instrument(skip(db), fields(user_id = %actor.user_id))]
pub async fn change_status(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    next: RetouchOrderStatus,
) -> Result<retouch_order::Model, ServiceError> {
    let txn = db.begin().await?;
    let ctx = load(&txn, id).await?;
    let party = ctx.party(actor).ok_or_else(|| ServiceError::forbidden("not a party to this order"))?;
    let current = ctx.order.status()?;
    if !current.can_transition_to(next) {
        return Err(ServiceError::InvalidState(format!("cannot move order from {current} to {next}")));
    }
    if next == RetouchOrderStatus::Completed {
        return Err(ServiceError::InvalidState("orders are completed by submitting a result".into()));
    }
    let party = match party {
        p if may_move(p, next) => p,
        _ if actor.is_admin() => Party::Admin,
        _ => return Err(ServiceError::forbidden(format!("not allowed to mark this order {next}"))),
    };

    let (client_id, retoucher_user) = (ctx.order.client_id, ctx.retoucher.user_id);
    let updated = retouch_order::set_status(&txn, ctx.order, next, None).await?;

    if next == RetouchOrderStatus::Cancelled {
        for p in payment::find_live_for(&txn, PaymentTarget::RetouchOrder(updated.id)).await? {
            let payer = p.payer_id;
            let refunded = payment::set_status(&txn, p, PaymentStatus::Refunded).await?;
            notify(&txn, payer, NotificationKind::PaymentRefunded, "Payment refunded after cancellation", Some(refunded.id)).await?;
        }
    }
    let recipients = match party {
        Party::Client => vec![retoucher_user],
        Party::Retoucher => vec![client_id],
        Party::Admin => vec![client_id, retoucher_user],
    };
    for to in recipients {
        notify(&txn, to, NotificationKind::RetouchOrderStatusChanged, format!("Retouch order is now {next}"), Some(updated.id)).await?;
    }
    txn.commit().await?;
    info!(order_id = %updated.id, from = %current, to = %next, "retouch order status changed");
    Ok(updated)
}

/// Deliver the result: registers the retouched photo for the client and completes the order.
#[instrument(skip(db, result_url), fields(user_id = %actor.user_id))]
pub async fn complete(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    result_url: &str,
) -> Result<retouch_order::Model, ServiceError> {
    photo::validate(result_url, None)?;
    let txn = db.begin().await?;
    let ctx = load(&txn, id).await?;
    let party = ctx.party(actor).ok_or_else(|| ServiceError::forbidden("not a party to this order"))?;
    let current = ctx.order.status()?;
    if !current.can_transition_to(RetouchOrderStatus::Completed) {
        return Err(ServiceError::InvalidState(format!("cannot complete an order that is {current}")));
    }
    if !matches!(party, Party::Retoucher | Party::Admin) && !actor.is_admin() {
        return Err(ServiceError::forbidden("only the retoucher can complete this order"));
    }

    let client_id = ctx.order.client_id;
    let result = photo::create(&txn, client_id, None, result_url, Some("Retouched".into())).await?;
    let updated = retouch_order::set_status(&txn, ctx.order, RetouchOrderStatus::Completed, Some(result.id)).await?;
    notify(&txn, client_id, NotificationKind::RetouchOrderStatusChanged, "Your retouched photo is ready", Some(updated.id)).await?;
    txn.commit().await?;
    info!(order_id = %updated.id, result_photo_id = %result.id, "retouch order completed");
    Ok(updated)
}
