//! Create `payment` table. Exactly one of booking_id / retouch_order_id is set.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(uuid(Payment::Id).primary_key())
                    .col(uuid(Payment::PayerId).not_null())
                    .col(uuid(Payment::PayeeId).not_null())
                    .col(uuid_null(Payment::BookingId))
                    .col(uuid_null(Payment::RetouchOrderId))
                    .col(big_integer(Payment::AmountCents).not_null())
                    .col(string_len(Payment::Currency, 3).not_null())
                    .col(string_len(Payment::Method, 32).not_null())
                    .col(string_len(Payment::Status, 32).not_null())
                    .col(timestamp_with_time_zone(Payment::CreatedAt).not_null())
                    .col(timestamp_with_time_zone_null(Payment::PaidAt))
                    .col(timestamp_with_time_zone_null(Payment::RefundedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_payer")
                            .from(Payment::Table, Payment::PayerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_payee")
                            .from(Payment::Table, Payment::PayeeId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_booking")
                            .from(Payment::Table, Payment::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_retouch_order")
                            .from(Payment::Table, Payment::RetouchOrderId)
                            .to(RetouchOrder::Table, RetouchOrder::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Payment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Payment {
    Table,
    Id,
    PayerId,
    PayeeId,
    BookingId,
    RetouchOrderId,
    AmountCents,
    Currency,
    Method,
    Status,
    CreatedAt,
    PaidAt,
    RefundedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Booking { Table, Id }

#[derive(DeriveIden)]
enum RetouchOrder { Table, Id }
