use sea_orm_migration::{prelude::*, sea_orm::{ConnectionTrait, DbBackend}};

use crate::{m20260101_000001_create_role_table::Role, m20260101_000002_create_task_table::Task};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let roles = Query::insert()
            .into_table(Role::Table)
            .columns([Role::Id, Role::Name, Role::Description, Role::IsDelete])
            .values_panic([1.into(), "Admin".into(), "Supervisor".into(), false.into()])
            .values_panic([
                2.into(),
                "Staff".into(),
                "Petugas Kebersihan".into(),
                false.into(),
            ])
            .to_owned();
        manager.exec_stmt(roles).await?;

        let tasks = Query::insert()
            .into_table(Task::Table)
            .columns([Task::Id, Task::Name, Task::IsDelete])
            .values_panic([1.into(), "Daily".into(), false.into()])
            .values_panic([2.into(), "Service".into(), false.into()])
            .to_owned();
        manager.exec_stmt(tasks).await?;

        // Explicit ids leave the serial sequences behind on Postgres.
        if manager.get_database_backend() == DbBackend::Postgres {
            let db = manager.get_connection();
            db.execute_unprepared(
                "SELECT setval(pg_get_serial_sequence('role', 'id'), (SELECT MAX(id) FROM role))",
            )
            .await?;
            db.execute_unprepared(
                "SELECT setval(pg_get_serial_sequence('task', 'id'), (SELECT MAX(id) FROM task))",
            )
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Task::Table)
                    .and_where(Expr::col(Task::Id).is_in([1, 2]))
                    .to_owned(),
            )
            .await?;

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Role::Table)
                    .and_where(Expr::col(Role::Id).is_in([1, 2]))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
