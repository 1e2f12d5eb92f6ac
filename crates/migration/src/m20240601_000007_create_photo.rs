//! Create `photo` table. Only metadata and an external URL are stored.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Photo::Table)
                    .if_not_exists()
                    .col(uuid(Photo::Id).primary_key())
                    .col(uuid(Photo::OwnerId).not_null())
                    .col(uuid_null(Photo::BookingId))
                    .col(string_len(Photo::Url, 1024).not_null())
                    .col(string_len_null(Photo::Title, 255))
                    .col(timestamp_with_time_zone(Photo::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photo_owner")
                            .from(Photo::Table, Photo::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photo_booking")
                            .from(Photo::Table, Photo::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Photo::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Photo { Table, Id, OwnerId, BookingId, Url, Title, CreatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Booking { Table, Id }
