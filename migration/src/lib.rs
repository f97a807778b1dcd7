pub use sea_orm_migration::prelude::*;

mod m20260810_000001_create_users;
mod m20260810_000002_create_attachments;
mod m20260810_000003_create_personal_info;
mod m20260810_000004_create_teachers;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260810_000001_create_users::Migration),
            Box::new(m20260810_000002_create_attachments::Migration),
            Box::new(m20260810_000003_create_personal_info::Migration),
            Box::new(m20260810_000004_create_teachers::Migration),
        ]
    }
}
