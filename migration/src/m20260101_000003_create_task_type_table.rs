use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260101_000002_create_task_table::Task;

static FK_TASK_TYPE_TASK_ID: &str = "fk_task_type_task_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TaskType::Table)
                    .if_not_exists()
                    .col(pk_auto(TaskType::Id))
                    .col(string(TaskType::Name))
                    .col(integer(TaskType::TaskId))
                    .col(boolean(TaskType::IsDelete).default(false))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_TASK_TYPE_TASK_ID)
                    .from_tbl(TaskType::Table)
                    .from_col(TaskType::TaskId)
                    .to_tbl(Task::Table)
                    .to_col(Task::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_TASK_TYPE_TASK_ID)
                    .table(TaskType::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(TaskType::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum TaskType {
    Table,
    Id,
    Name,
    TaskId,
    IsDelete,
}
