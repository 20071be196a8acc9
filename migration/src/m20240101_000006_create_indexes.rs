use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Active-entry lookups by business drive join/leave compaction
        manager
            .create_index(
                Index::create()
                    .name("idx_queue_entries_business_status")
                    .table(QueueEntries::Table)
                    .col(QueueEntries::BusinessId)
                    .col(QueueEntries::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_queue_entries_user_status")
                    .table(QueueEntries::Table)
                    .col(QueueEntries::UserId)
                    .col(QueueEntries::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_businesses_category")
                    .table(Businesses::Table)
                    .col(Businesses::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_business")
                    .table(Reviews::Table)
                    .col(Reviews::BusinessId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_user")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_passes_user_status")
                    .table(UserPasses::Table)
                    .col(UserPasses::UserId)
                    .col(UserPasses::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_user_passes_user_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_subscriptions_user").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_reviews_business").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_businesses_category").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_queue_entries_user_status")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_queue_entries_business_status")
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum QueueEntries {
    Table,
    BusinessId,
    UserId,
    Status,
}

#[derive(DeriveIden)]
enum Businesses {
    Table,
    Category,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    BusinessId,
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    UserId,
}

#[derive(DeriveIden)]
enum UserPasses {
    Table,
    UserId,
    Status,
}
