use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Partial indexes are not expressible through the index builder, so the
// statement is written by hand. Postgres and SQLite share this syntax.
const CREATE_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS uq_booking_pending_per_requester \
     ON booking (service_id, requester_id) WHERE status = 'pending'";

const DROP_INDEX: &str = "DROP INDEX IF EXISTS uq_booking_pending_per_requester";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(CREATE_INDEX)
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(DROP_INDEX)
            .await?;
        Ok(())
    }
}
