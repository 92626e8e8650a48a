pub use sea_orm_migration::prelude::*;

mod m20260101_000001_create_role_table;
mod m20260101_000002_create_task_table;
mod m20260101_000003_create_task_type_table;
mod m20260101_000004_create_user_table;
mod m20260101_000005_create_work_table;
mod m20260101_000006_create_comment_table;
mod m20260101_000007_seed_role_and_task;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_role_table::Migration),
            Box::new(m20260101_000002_create_task_table::Migration),
            Box::new(m20260101_000003_create_task_type_table::Migration),
            Box::new(m20260101_000004_create_user_table::Migration),
            Box::new(m20260101_000005_create_work_table::Migration),
            Box::new(m20260101_000006_create_comment_table::Migration),
            Box::new(m20260101_000007_seed_role_and_task::Migration),
        ]
    }
}
