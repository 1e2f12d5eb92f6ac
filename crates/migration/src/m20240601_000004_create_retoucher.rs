//! Create `retoucher` profile table; an active row grants the Retoucher role.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Retoucher::Table)
                    .if_not_exists()
                    .col(uuid(Retoucher::Id).primary_key())
                    .col(uuid(Retoucher::UserId).unique_key().not_null())
                    .col(text_null(Retoucher::Bio))
                    .col(big_integer(Retoucher::PricePerPhotoCents).not_null())
                    .col(boolean(Retoucher::IsAvailable).default(true))
                    .col(boolean(Retoucher::Active).default(true))
                    .col(timestamp_with_time_zone(Retoucher::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Retoucher::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retoucher_user")
                            .from(Retoucher::Table, Retoucher::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Retoucher::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Retoucher { Table, Id, UserId, Bio, PricePerPhotoCents, IsAvailable, Active, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
