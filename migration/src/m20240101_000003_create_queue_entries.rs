use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QueueEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QueueEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QueueEntries::BusinessId).uuid().not_null())
                    .col(ColumnDef::new(QueueEntries::UserId).uuid().not_null())
                    .col(ColumnDef::new(QueueEntries::Position).integer().not_null())
                    .col(
                        ColumnDef::new(QueueEntries::EstimatedWaitMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QueueEntries::Status).string().not_null())
                    .col(
                        ColumnDef::new(QueueEntries::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(QueueEntries::NotifiedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(QueueEntries::CompletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(QueueEntries::CancelledAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(QueueEntries::Notes).text())
                    .col(
                        ColumnDef::new(QueueEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(QueueEntries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_queue_entries_business")
                            .from(QueueEntries::Table, QueueEntries::BusinessId)
                            .to(Businesses::Table, Businesses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_queue_entries_user")
                            .from(QueueEntries::Table, QueueEntries::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QueueEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum QueueEntries {
    Table,
    Id,
    BusinessId,
    UserId,
    Position,
    EstimatedWaitMinutes,
    Status,
    JoinedAt,
    NotifiedAt,
    CompletedAt,
    CancelledAt,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Businesses {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
