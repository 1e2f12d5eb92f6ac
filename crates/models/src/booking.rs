use chrono::{DateTime, Duration, Utc};
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::status::BookingStatus;
use crate::validation::{validate_len, validate_optional_len};
use crate::{photographer, user};

pub const MIN_DURATION_MINUTES: i32 = 30;
pub const MAX_DURATION_MINUTES: i32 = 720;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    /// Photographer profile id, not the user id.
    pub photographer_id: Uuid,
    pub start_at: DateTimeWithTimeZone,
    pub duration_minutes: i32,
    pub location: String,
    pub notes: Option<String>,
    pub price_cents: i64,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Client,
    Photographer,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Client => Entity::belongs_to(user::Entity).from(Column::ClientId).to(user::Column::Id).into(),
            Relation::Photographer => Entity::belongs_to(photographer::Entity)
                .from(Column::PhotographerId)
                .to(photographer::Column::Id)
                .into(),
        }
    }
}

impl Related<photographer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photographer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn status(&self) -> Result<BookingStatus, ModelError> {
        self.status.parse()
    }

    pub fn end_at(&self) -> DateTime<Utc> {
        self.start_at.with_timezone(&Utc) + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Half-open interval overlap: back-to-back sessions do not collide.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_at.with_timezone(&Utc) < end && start < self.end_at()
    }
}

/// Price for a session, rounded down to the cent.
pub fn price_for(hourly_rate_cents: i64, duration_minutes: i32) -> Result<i64, ModelError> {
    hourly_rate_cents
        .checked_mul(i64::from(duration_minutes))
        .map(|total| total / 60)
        .ok_or_else(|| ModelError::Validation("price out of range".into()))
}

pub fn validate_duration(minutes: i32) -> Result<(), ModelError> {
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes) {
        return Err(ModelError::Validation(format!(
            "duration_minutes must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub client_id: Uuid,
    pub photographer: photographer::Model,
    pub start_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub location: String,
    pub notes: Option<String>,
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewBooking) -> Result<Model, ModelError> {
    validate_duration(input.duration_minutes)?;
    validate_len("location", &input.location, 1, 255)?;
    validate_optional_len("notes", input.notes.as_deref(), 2000)?;
    if input.start_at <= Utc::now() {
        return Err(ModelError::Validation("start_at must be in the future".into()));
    }
    let price_cents = price_for(input.photographer.hourly_rate_cents, input.duration_minutes)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        client_id: Set(input.client_id),
        photographer_id: Set(input.photographer.id),
        start_at: Set(input.start_at.into()),
        duration_minutes: Set(input.duration_minutes),
        location: Set(input.location.trim().to_string()),
        notes: Set(input.notes.and_then(user::non_empty)),
        price_cents: Set(price_cents),
        status: Set(BookingStatus::Pending.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

/// Persist a status already checked against the transition graph.
pub async fn set_status<C: ConnectionTrait>(db: &C, booking: Model, status: BookingStatus) -> Result<Model, ModelError> {
    let mut am: ActiveModel = booking.into();
    am.status = Set(status.to_string());
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Bookings of a photographer that currently hold calendar time.
pub async fn find_blocking<C: ConnectionTrait>(db: &C, photographer_id: Uuid) -> Result<Vec<Model>, ModelError> {
    let statuses: Vec<&str> = BookingStatus::ALL
        .iter()
        .filter(|s| s.blocks_calendar())
        .map(|s| s.as_str())
        .collect();
    Ok(Entity::find()
        .filter(Column::PhotographerId.eq(photographer_id))
        .filter(Column::Status.is_in(statuses))
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn booking_at(hour: u32, minutes: i32) -> Model {
        let start = Utc.with_ymd_and_hms(2030, 1, 1, hour, 0, 0).unwrap();
        Model {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            photographer_id: Uuid::new_v4(),
            start_at: start.into(),
            duration_minutes: minutes,
            location: "studio".into(),
            notes: None,
            price_cents: 0,
            status: "Confirmed".into(),
            created_at: start.into(),
            updated_at: start.into(),
        }
    }

    #[test]
    fn price_is_prorated_by_minutes() {
        assert_eq!(price_for(6000, 60).unwrap(), 6000);
        assert_eq!(price_for(6000, 90).unwrap(), 9000);
        assert_eq!(price_for(1001, 30).unwrap(), 500);
    }

    #[test]
    fn oversized_rate_is_rejected_not_overflowed() {
        let err = price_for(i64::MAX / 2, 60).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)), "{err:?}");
        assert_eq!(price_for(crate::validation::MAX_CENTS, MAX_DURATION_MINUTES).unwrap(), crate::validation::MAX_CENTS * 12);
    }

    #[test]
    fn duration_bounds() {
        assert!(validate_duration(30).is_ok());
        assert!(validate_duration(720).is_ok());
        assert!(validate_duration(29).is_err());
        assert!(validate_duration(721).is_err());
    }

    #[test]
    fn overlap_is_half_open() {
        let b = booking_at(10, 60);
        let at = |h: u32, m: u32| Utc.with_ymd_and_hms(2030, 1, 1, h, m, 0).unwrap();
        assert!(b.overlaps(at(10, 30), at(11, 30)));
        assert!(b.overlaps(at(9, 0), at(12, 0)));
        assert!(!b.overlaps(at(11, 0), at(12, 0)));
        assert!(!b.overlaps(at(9, 0), at(10, 0)));
    }
}
