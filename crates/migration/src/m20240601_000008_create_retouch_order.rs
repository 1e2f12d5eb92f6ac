//! Create `retouch_order` table. The source photo cannot be deleted while referenced.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RetouchOrder::Table)
                    .if_not_exists()
                    .col(uuid(RetouchOrder::Id).primary_key())
                    .col(uuid(RetouchOrder::ClientId).not_null())
                    .col(uuid(RetouchOrder::RetoucherId).not_null())
                    .col(uuid(RetouchOrder::PhotoId).not_null())
                    .col(text(RetouchOrder::Instructions).not_null())
                    .col(big_integer(RetouchOrder::PriceCents).not_null())
                    .col(string_len(RetouchOrder::Status, 32).not_null())
                    .col(uuid_null(RetouchOrder::ResultPhotoId))
                    .col(timestamp_with_time_zone(RetouchOrder::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(RetouchOrder::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retouch_order_client")
                            .from(RetouchOrder::Table, RetouchOrder::ClientId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retouch_order_retoucher")
                            .from(RetouchOrder::Table, RetouchOrder::RetoucherId)
                            .to(Retoucher::Table, Retoucher::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retouch_order_photo")
                            .from(RetouchOrder::Table, RetouchOrder::PhotoId)
                            .to(Photo::Table, Photo::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_retouch_order_result_photo")
                            .from(RetouchOrder::Table, RetouchOrder::ResultPhotoId)
                            .to(Photo::Table, Photo::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(RetouchOrder::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum RetouchOrder {
    Table,
    Id,
    ClientId,
    RetoucherId,
    PhotoId,
    Instructions,
    PriceCents,
    Status,
    ResultPhotoId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Retoucher { Table, Id }

#[derive(DeriveIden)]
enum Photo { Table, Id }
