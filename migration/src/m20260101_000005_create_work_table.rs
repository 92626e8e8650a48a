use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260101_000002_create_task_table::Task, m20260101_000003_create_task_type_table::TaskType,
    m20260101_000004_create_user_table::User,
};

static FK_WORK_USER_ID: &str = "fk_work_user_id";
static FK_WORK_TASK_ID: &str = "fk_work_task_id";
static FK_WORK_TASK_TYPE_ID: &str = "fk_work_task_type_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Work::Table)
                    .if_not_exists()
                    .col(pk_auto(Work::Id))
                    .col(integer(Work::UserId))
                    .col(integer(Work::TaskId))
                    .col(integer(Work::TaskTypeId))
                    .col(string(Work::Floor))
                    .col(text(Work::Info))
                    .col(string_null(Work::ImageBefore))
                    .col(string_null(Work::ImageAfter))
                    .col(boolean(Work::IsDelete).default(false))
                    .col(timestamp(Work::CreatedAt))
                    .col(timestamp_null(Work::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_WORK_USER_ID)
                    .from_tbl(Work::Table)
                    .from_col(Work::UserId)
                    .to_tbl(User::Table)
                    .to_col(User::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_WORK_TASK_ID)
                    .from_tbl(Work::Table)
                    .from_col(Work::TaskId)
                    .to_tbl(Task::Table)
                    .to_col(Task::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_WORK_TASK_TYPE_ID)
                    .from_tbl(Work::Table)
                    .from_col(Work::TaskTypeId)
                    .to_tbl(TaskType::Table)
                    .to_col(TaskType::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for fk in [FK_WORK_TASK_TYPE_ID, FK_WORK_TASK_ID, FK_WORK_USER_ID] {
            manager
                .drop_foreign_key(ForeignKey::drop().name(fk).table(Work::Table).to_owned())
                .await?;
        }

        manager
            .drop_table(Table::drop().table(Work::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Work {
    Table,
    Id,
    UserId,
    TaskId,
    TaskTypeId,
    Floor,
    Info,
    ImageBefore,
    ImageAfter,
    IsDelete,
    CreatedAt,
    UpdatedAt,
}
