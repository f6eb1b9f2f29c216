use sea_orm_migration::{prelude::*, schema::*};

use super::m20240301_000001_create_users::User;
use super::m20240301_000002_create_services::Service;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(uuid(Booking::ServiceId).not_null())
                    .col(uuid(Booking::RequesterId).not_null())
                    .col(uuid(Booking::ProviderId).not_null())
                    .col(text(Booking::Message).not_null())
                    // Values are constrained by the BookingStatus active enum
                    .col(string_len(Booking::Status, 16).not_null().default("pending"))
                    .col(text_null(Booking::Notes))
                    .col(
                        timestamp_with_time_zone(Booking::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Booking::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_service")
                            .from(Booking::Table, Booking::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_requester")
                            .from(Booking::Table, Booking::RequesterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_provider")
                            .from(Booking::Table, Booking::ProviderId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_requester")
                    .table(Booking::Table)
                    .col(Booking::RequesterId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_provider")
                    .table(Booking::Table)
                    .col(Booking::ProviderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    Id,
    ServiceId,
    RequesterId,
    ProviderId,
    Message,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}
