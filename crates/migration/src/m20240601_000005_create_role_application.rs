//! Create `role_application` table: requests for the Photographer or Retoucher role.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoleApplication::Table)
                    .if_not_exists()
                    .col(uuid(RoleApplication::Id).primary_key())
                    .col(uuid(RoleApplication::UserId).not_null())
                    .col(string_len(RoleApplication::Role, 32).not_null())
                    .col(text(RoleApplication::Message).not_null())
                    .col(big_integer(RoleApplication::RateCents).not_null())
                    .col(string_len_null(RoleApplication::Location, 128))
                    .col(string_len(RoleApplication::Status, 32).not_null())
                    .col(uuid_null(RoleApplication::ReviewedBy))
                    .col(text_null(RoleApplication::ReviewNote))
                    .col(timestamp_with_time_zone(RoleApplication::CreatedAt).not_null())
                    .col(timestamp_with_time_zone_null(RoleApplication::ReviewedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_application_user")
                            .from(RoleApplication::Table, RoleApplication::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(RoleApplication::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum RoleApplication {
    Table,
    Id,
    UserId,
    Role,
    Message,
    RateCents,
    Location,
    Status,
    ReviewedBy,
    ReviewNote,
    CreatedAt,
    ReviewedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
