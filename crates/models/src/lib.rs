pub mod errors;
pub mod db;
pub mod validation;
pub mod status;
pub mod role;
pub mod user;
pub mod user_credentials;
pub mod photographer;
pub mod retoucher;
pub mod role_application;
pub mod booking;
pub mod photo;
pub mod retouch_order;
pub mod payment;
pub mod post;
pub mod notification;
pub mod follow;
pub mod portfolio;
pub mod portfolio_item;

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use migration::MigratorTrait;
    use sea_orm::{Database, DatabaseConnection, EntityTrait};

    use crate::errors::ModelError;
    use crate::status::{PaymentMethod, PaymentStatus};
    use crate::{booking, follow, notification, payment, photographer, portfolio, portfolio_item, photo, user};

    async fn db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.expect("connect sqlite");
        migration::Migrator::up(&db, None).await.expect("migrate");
        db
    }

    #[tokio::test]
    async fn user_identity_is_unique() {
        let db = db().await;
        user::create(&db, "alice", "Alice@Example.com", "Alice").await.expect("create");
        let dup_name = user::create(&db, "alice", "other@example.com", "A2").await.unwrap_err();
        assert!(matches!(dup_name, ModelError::Conflict(_)), "{dup_name:?}");
        let dup_mail = user::create(&db, "alice2", "alice@example.com", "A3").await.unwrap_err();
        assert!(matches!(dup_mail, ModelError::Conflict(_)), "{dup_mail:?}");

        let by_mail = user::find_by_login(&db, "ALICE@example.com").await.unwrap();
        assert_eq!(by_mail.map(|u| u.username), Some("alice".to_string()));
    }

    #[tokio::test]
    async fn follow_pair_is_unique() {
        let db = db().await;
        let a = user::create(&db, "a_user", "a@x.io", "A").await.unwrap();
        let b = user::create(&db, "b_user", "b@x.io", "B").await.unwrap();
        follow::create(&db, a.id, b.id).await.unwrap();
        let err = follow::create(&db, a.id, b.id).await.unwrap_err();
        assert!(matches!(err, ModelError::Conflict(_)));
        assert!(matches!(follow::create(&db, a.id, a.id).await, Err(ModelError::Validation(_))));
        assert_eq!(follow::count_followers(&db, b.id).await.unwrap(), 1);
        assert_eq!(follow::count_following(&db, a.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn photographer_reactivation_keeps_row() {
        let db = db().await;
        let u = user::create(&db, "shooter", "s@x.io", "S").await.unwrap();
        let p = photographer::activate(&db, u.id, 5000, Some("Berlin".into())).await.unwrap();
        let p = photographer::deactivate(&db, p).await.unwrap();
        assert!(photographer::find_active_by_user(&db, u.id).await.unwrap().is_none());
        let again = photographer::activate(&db, u.id, 7000, None).await.unwrap();
        assert_eq!(again.id, p.id);
        assert!(again.active);
        assert_eq!(again.hourly_rate_cents, 7000);
        assert_eq!(again.location.as_deref(), Some("Berlin"));
    }

    #[tokio::test]
    async fn booking_price_and_payment_defaults() {
        let db = db().await;
        let client = user::create(&db, "client", "c@x.io", "C").await.unwrap();
        let pu = user::create(&db, "photog", "p@x.io", "P").await.unwrap();
        let p = photographer::activate(&db, pu.id, 6000, None).await.unwrap();
        let b = booking::create(
            &db,
            booking::NewBooking {
                client_id: client.id,
                photographer: p.clone(),
                start_at: Utc::now() + Duration::days(3),
                duration_minutes: 90,
                location: "Park".into(),
                notes: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(b.price_cents, 9000);
        assert_eq!(b.status, "Pending");

        let card = payment::create(
            &db,
            payment::NewPayment {
                payer_id: client.id,
                payee_id: pu.id,
                target: payment::PaymentTarget::Booking(b.id),
                amount_cents: b.price_cents,
                method: PaymentMethod::Card,
            },
        )
        .await
        .unwrap();
        assert_eq!(card.status().unwrap(), PaymentStatus::Completed);
        assert!(card.paid_at.is_some());
        assert_eq!(card.currency, "USD");

        let live = payment::find_live_for(&db, payment::PaymentTarget::Booking(b.id)).await.unwrap();
        assert_eq!(live.len(), 1);
        payment::set_status(&db, card, PaymentStatus::Refunded).await.unwrap();
        assert!(payment::find_live_for(&db, payment::PaymentTarget::Booking(b.id)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn booking_in_the_past_is_rejected() {
        let db = db().await;
        let client = user::create(&db, "client", "c@x.io", "C").await.unwrap();
        let pu = user::create(&db, "photog", "p@x.io", "P").await.unwrap();
        let p = photographer::activate(&db, pu.id, 6000, None).await.unwrap();
        let err = booking::create(
            &db,
            booking::NewBooking {
                client_id: client.id,
                photographer: p,
                start_at: Utc::now() - Duration::hours(1),
                duration_minutes: 60,
                location: "Park".into(),
                notes: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[tokio::test]
    async fn notifications_mark_all_read_counts_rows() {
        let db = db().await;
        let u = user::create(&db, "reader", "r@x.io", "R").await.unwrap();
        for _ in 0..3 {
            notification::create(&db, u.id, notification::NotificationKind::NewFollower, "hi", None).await.unwrap();
        }
        assert_eq!(notification::count_unread(&db, u.id).await.unwrap(), 3);
        assert_eq!(notification::mark_all_read(&db, u.id).await.unwrap(), 3);
        assert_eq!(notification::count_unread(&db, u.id).await.unwrap(), 0);
        assert_eq!(notification::mark_all_read(&db, u.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn portfolio_items_append_in_order() {
        let db = db().await;
        let u = user::create(&db, "folio", "f@x.io", "F").await.unwrap();
        let p = photographer::activate(&db, u.id, 0, None).await.unwrap();
        let folio = portfolio::create(&db, p.id, "Weddings", None).await.unwrap();
        let a = photo::create(&db, u.id, None, "https://cdn.example.com/a.jpg", None).await.unwrap();
        let b = photo::create(&db, u.id, None, "https://cdn.example.com/b.jpg", None).await.unwrap();
        let first = portfolio_item::append(&db, folio.id, a.id, Some("first".into())).await.unwrap();
        let second = portfolio_item::append(&db, folio.id, b.id, None).await.unwrap();
        assert_eq!((first.position, second.position), (1, 2));

        let items = portfolio_item::list_for(&db, folio.id).await.unwrap();
        assert_eq!(items.iter().map(|i| i.photo_id).collect::<Vec<_>>(), vec![a.id, b.id]);

        portfolio::Entity::delete_by_id(folio.id).exec(&db).await.unwrap();
        assert!(portfolio_item::list_for(&db, folio.id).await.unwrap().is_empty());
    }
}
