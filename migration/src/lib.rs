pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_users;
mod m20240301_000002_create_services;
mod m20240301_000003_create_bookings;
mod m20240315_000001_unique_pending_booking;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_users::Migration),
            Box::new(m20240301_000002_create_services::Migration),
            Box::new(m20240301_000003_create_bookings::Migration),
            Box::new(m20240315_000001_unique_pending_booking::Migration),
        ]
    }
}
