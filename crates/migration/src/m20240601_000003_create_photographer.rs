//! Create `photographer` profile table; an active row grants the Photographer role.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Photographer::Table)
                    .if_not_exists()
                    .col(uuid(Photographer::Id).primary_key())
                    .col(uuid(Photographer::UserId).unique_key().not_null())
                    .col(text_null(Photographer::Bio))
                    .col(string_len_null(Photographer::Location, 128))
                    .col(big_integer(Photographer::HourlyRateCents).not_null())
                    .col(boolean(Photographer::IsAvailable).default(true))
                    .col(boolean(Photographer::Active).default(true))
                    .col(timestamp_with_time_zone(Photographer::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Photographer::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photographer_user")
                            .from(Photographer::Table, Photographer::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Photographer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Photographer { Table, Id, UserId, Bio, Location, HourlyRateCents, IsAvailable, Active, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
