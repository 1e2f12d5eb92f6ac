//! Create `portfolio` and `portfolio_item` tables.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Portfolio::Table)
                    .if_not_exists()
                    .col(uuid(Portfolio::Id).primary_key())
                    .col(uuid(Portfolio::PhotographerId).not_null())
                    .col(string_len(Portfolio::Title, 128).not_null())
                    .col(text_null(Portfolio::Description))
                    .col(timestamp_with_time_zone(Portfolio::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_photographer")
                            .from(Portfolio::Table, Portfolio::PhotographerId)
                            .to(Photographer::Table, Photographer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PortfolioItem::Table)
                    .if_not_exists()
                    .col(uuid(PortfolioItem::Id).primary_key())
                    .col(uuid(PortfolioItem::PortfolioId).not_null())
                    .col(uuid(PortfolioItem::PhotoId).not_null())
                    .col(string_len_null(PortfolioItem::Caption, 255))
                    .col(integer(PortfolioItem::Position).not_null())
                    .col(timestamp_with_time_zone(PortfolioItem::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_item_portfolio")
                            .from(PortfolioItem::Table, PortfolioItem::PortfolioId)
                            .to(Portfolio::Table, Portfolio::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_item_photo")
                            .from(PortfolioItem::Table, PortfolioItem::PhotoId)
                            .to(Photo::Table, Photo::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PortfolioItem::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Portfolio::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Portfolio { Table, Id, PhotographerId, Title, Description, CreatedAt }

#[derive(DeriveIden)]
enum PortfolioItem { Table, Id, PortfolioId, PhotoId, Caption, Position, CreatedAt }

#[derive(DeriveIden)]
enum Photographer { Table, Id }

#[derive(DeriveIden)]
enum Photo { Table, Id }
