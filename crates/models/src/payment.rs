use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::status::{PaymentMethod, PaymentStatus};
use crate::{booking, retouch_order, user};

pub const CURRENCY: &str = "USD";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub payer_id: Uuid,
    pub payee_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub retouch_order_id: Option<Uuid>,
    pub amount_cents: i64,
    pub currency: String,
    pub method: String,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub refunded_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Payer,
    Payee,
    Booking,
    RetouchOrder,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Payer => Entity::belongs_to(user::Entity).from(Column::PayerId).to(user::Column::Id).into(),
            Relation::Payee => Entity::belongs_to(user::Entity).from(Column::PayeeId).to(user::Column::Id).into(),
            Relation::Booking => Entity::belongs_to(booking::Entity)
                .from(Column::BookingId)
                .to(booking::Column::Id)
                .into(),
            Relation::RetouchOrder => Entity::belongs_to(retouch_order::Entity)
                .from(Column::RetouchOrderId)
                .to(retouch_order::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn status(&self) -> Result<PaymentStatus, ModelError> {
        self.status.parse()
    }

    pub fn method(&self) -> Result<PaymentMethod, ModelError> {
        self.method.parse()
    }
}

/// What a payment settles. Exactly one target per payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentTarget {
    Booking(Uuid),
    RetouchOrder(Uuid),
}

impl PaymentTarget {
    pub fn from_ids(booking_id: Option<Uuid>, retouch_order_id: Option<Uuid>) -> Result<Self, ModelError> {
        match (booking_id, retouch_order_id) {
            (Some(b), None) => Ok(PaymentTarget::Booking(b)),
            (None, Some(r)) => Ok(PaymentTarget::RetouchOrder(r)),
            _ => Err(ModelError::Validation("exactly one of booking_id or retouch_order_id is required".into())),
        }
    }

    fn column_filter(self) -> sea_orm::sea_query::SimpleExpr {
        match self {
            PaymentTarget::Booking(id) => Column::BookingId.eq(id),
            PaymentTarget::RetouchOrder(id) => Column::RetouchOrderId.eq(id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub payer_id: Uuid,
    pub payee_id: Uuid,
    pub target: PaymentTarget,
    pub amount_cents: i64,
    pub method: PaymentMethod,
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewPayment) -> Result<Model, ModelError> {
    // amounts are derived from capped rates, so only the sign is checked here
    if input.amount_cents < 0 {
        return Err(ModelError::Validation("amount_cents must not be negative".into()));
    }
    let now = Utc::now().into();
    let (status, paid_at) = if input.method.settles_immediately() {
        (PaymentStatus::Completed, Some(now))
    } else {
        (PaymentStatus::Pending, None)
    };
    let (booking_id, retouch_order_id) = match input.target {
        PaymentTarget::Booking(id) => (Some(id), None),
        PaymentTarget::RetouchOrder(id) => (None, Some(id)),
    };
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        payer_id: Set(input.payer_id),
        payee_id: Set(input.payee_id),
        booking_id: Set(booking_id),
        retouch_order_id: Set(retouch_order_id),
        amount_cents: Set(input.amount_cents),
        currency: Set(CURRENCY.to_string()),
        method: Set(input.method.to_string()),
        status: Set(status.to_string()),
        created_at: Set(now),
        paid_at: Set(paid_at),
        refunded_at: Set(None),
    };
    Ok(am.insert(db).await?)
}

/// Payments for a target that are still live (pending or settled).
pub async fn find_live_for<C: ConnectionTrait>(db: &C, target: PaymentTarget) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(target.column_filter())
        .filter(Column::Status.is_in([PaymentStatus::Pending.as_str(), PaymentStatus::Completed.as_str()]))
        .all(db)
        .await?)
}

pub async fn set_status<C: ConnectionTrait>(db: &C, payment: Model, status: PaymentStatus) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let mut am: ActiveModel = payment.into();
    am.status = Set(status.to_string());
    match status {
        PaymentStatus::Completed => am.paid_at = Set(Some(now)),
        PaymentStatus::Refunded => am.refunded_at = Set(Some(now)),
        PaymentStatus::Pending => {}
    }
    Ok(am.update(db).await?)
}
