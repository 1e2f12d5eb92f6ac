//! Create `booking` table linking a client to a photographer profile.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(uuid(Booking::ClientId).not_null())
                    .col(uuid(Booking::PhotographerId).not_null())
                    .col(timestamp_with_time_zone(Booking::StartAt).not_null())
                    .col(integer(Booking::DurationMinutes).not_null())
                    .col(string_len(Booking::Location, 255).not_null())
                    .col(text_null(Booking::Notes))
                    .col(big_integer(Booking::PriceCents).not_null())
                    .col(string_len(Booking::Status, 32).not_null())
                    .col(timestamp_with_time_zone(Booking::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Booking::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_client")
                            .from(Booking::Table, Booking::ClientId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_photographer")
                            .from(Booking::Table, Booking::PhotographerId)
                            .to(Photographer::Table, Photographer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Booking::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Booking {
    Table,
    Id,
    ClientId,
    PhotographerId,
    StartAt,
    DurationMinutes,
    Location,
    Notes,
    PriceCents,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Photographer { Table, Id }
