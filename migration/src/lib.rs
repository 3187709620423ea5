pub use sea_orm_migration::prelude::*;

mod m20241105_000001_create_users;
mod m20241105_000002_create_packages_and_memberships;
mod m20241105_000003_create_bookings;
mod m20241105_000004_create_progress_and_reviews;
mod m20241105_000005_create_payments_and_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241105_000001_create_users::Migration),
            Box::new(m20241105_000002_create_packages_and_memberships::Migration),
            Box::new(m20241105_000003_create_bookings::Migration),
            Box::new(m20241105_000004_create_progress_and_reviews::Migration),
            Box::new(m20241105_000005_create_payments_and_notifications::Migration),
        ]
    }
}
