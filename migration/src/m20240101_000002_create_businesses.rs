use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Businesses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Businesses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Businesses::Name).string().not_null())
                    .col(
                        ColumnDef::new(Businesses::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Businesses::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Businesses::Description).text())
                    .col(ColumnDef::new(Businesses::Address).string().not_null())
                    .col(ColumnDef::new(Businesses::Latitude).double().not_null())
                    .col(ColumnDef::new(Businesses::Longitude).double().not_null())
                    .col(ColumnDef::new(Businesses::PhoneNumber).string().not_null())
                    .col(ColumnDef::new(Businesses::Category).string().not_null())
                    .col(ColumnDef::new(Businesses::Images).json().not_null())
                    .col(
                        ColumnDef::new(Businesses::AverageWaitMinutes)
                            .integer()
                            .not_null()
                            .default(15),
                    )
                    .col(
                        ColumnDef::new(Businesses::CurrentQueueCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Businesses::MaxQueueCapacity)
                            .integer()
                            .not_null()
                            .default(50),
                    )
                    .col(
                        ColumnDef::new(Businesses::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Businesses::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Businesses::OperatingHours).json().not_null())
                    .col(
                        ColumnDef::new(Businesses::AverageRating)
                            .double()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Businesses::ReviewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Businesses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Businesses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Businesses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Businesses {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Description,
    Address,
    Latitude,
    Longitude,
    PhoneNumber,
    Category,
    Images,
    AverageWaitMinutes,
    CurrentQueueCount,
    MaxQueueCapacity,
    IsActive,
    IsVerified,
    OperatingHours,
    AverageRating,
    ReviewCount,
    CreatedAt,
    UpdatedAt,
}
