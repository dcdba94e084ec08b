use sea_orm_migration::prelude::*;

pub use sea_orm_migration::MigratorTrait;

mod m20250701_000001_create_subscriptions_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(
            m20250701_000001_create_subscriptions_table::Migration,
        )]
    }
}

/// Common table and column identifiers
#[derive(Iden)]
pub enum Subscriptions {
    Table,
    Id,
    ServiceName,
    Price,
    UserId,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}
