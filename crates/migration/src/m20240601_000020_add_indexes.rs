use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Follow: one edge per (follower, followed)
        manager
            .create_index(
                Index::create()
                    .name("uniq_follow_pair")
                    .table(Follow::Table)
                    .col(Follow::FollowerId)
                    .col(Follow::FollowedId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_follow_followed")
                    .table(Follow::Table)
                    .col(Follow::FollowedId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_client")
                    .table(Booking::Table)
                    .col(Booking::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_photographer_status")
                    .table(Booking::Table)
                    .col(Booking::PhotographerId)
                    .col(Booking::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_retouch_order_client")
                    .table(RetouchOrder::Table)
                    .col(RetouchOrder::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_retouch_order_retoucher")
                    .table(RetouchOrder::Table)
                    .col(RetouchOrder::RetoucherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_photo_booking")
                    .table(Photo::Table)
                    .col(Photo::BookingId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_post_author_created")
                    .table(Post::Table)
                    .col(Post::AuthorId)
                    .col(Post::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_user_read")
                    .table(Notification::Table)
                    .col(Notification::UserId)
                    .col(Notification::IsRead)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_role_application_user")
                    .table(RoleApplication::Table)
                    .col(RoleApplication::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_booking")
                    .table(Payment::Table)
                    .col(Payment::BookingId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_retouch_order")
                    .table(Payment::Table)
                    .col(Payment::RetouchOrderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_payment_retouch_order").table(Payment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_payment_booking").table(Payment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_role_application_user").table(RoleApplication::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_notification_user_read").table(Notification::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_post_author_created").table(Post::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_photo_booking").table(Photo::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_retouch_order_retoucher").table(RetouchOrder::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_retouch_order_client").table(RetouchOrder::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_booking_photographer_status").table(Booking::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_booking_client").table(Booking::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_follow_followed").table(Follow::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_follow_pair").table(Follow::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Follow { Table, FollowerId, FollowedId }

#[derive(DeriveIden)]
enum Booking { Table, ClientId, PhotographerId, Status }

#[derive(DeriveIden)]
enum RetouchOrder { Table, ClientId, RetoucherId }

#[derive(DeriveIden)]
enum Photo { Table, BookingId }

#[derive(DeriveIden)]
enum Post { Table, AuthorId, CreatedAt }

#[derive(DeriveIden)]
enum Notification { Table, UserId, IsRead }

#[derive(DeriveIden)]
enum RoleApplication { Table, UserId }

#[derive(DeriveIden)]
enum Payment { Table, BookingId, RetouchOrderId }
