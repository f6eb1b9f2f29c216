use sea_orm_migration::{prelude::*, schema::*};

use super::m20240301_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(uuid(Service::Id).primary_key())
                    .col(uuid(Service::ProviderId).not_null())
                    .col(string_len(Service::Title, 200).not_null())
                    .col(text(Service::Description).not_null())
                    .col(integer(Service::Duration).not_null())
                    .col(double(Service::Price).not_null())
                    .col(string_len(Service::Category, 100).not_null())
                    .col(string_len(Service::Location, 200).not_null())
                    .col(boolean(Service::IsActive).not_null().default(true))
                    .col(
                        timestamp_with_time_zone(Service::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Service::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_provider")
                            .from(Service::Table, Service::ProviderId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_provider")
                    .table(Service::Table)
                    .col(Service::ProviderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Service::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Service {
    Table,
    Id,
    ProviderId,
    Title,
    Description,
    Duration,
    Price,
    Category,
    Location,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
