use super::Subscriptions;
use sea_orm::ConnectionTrait;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscriptions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::ServiceName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::Price)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Subscriptions::UserId).string().not_null())
                    .col(ColumnDef::new(Subscriptions::StartDate).date().not_null())
                    .col(ColumnDef::new(Subscriptions::EndDate).date().null())
                    .col(
                        ColumnDef::new(Subscriptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // SQLite cannot add a CHECK constraint after table creation
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared(
                    "ALTER TABLE subscriptions \
                     ADD CONSTRAINT chk_subscriptions_price_non_negative CHECK (price >= 0)",
                )
                .await?;
        }

        // Listing and totals filter on user, then optionally on service
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_subscriptions_user_id_service_name")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::UserId)
                    .col(Subscriptions::ServiceName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
            .await
    }
}
