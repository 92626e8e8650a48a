use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20260101_000004_create_user_table::User, m20260101_000005_create_work_table::Work};

static FK_COMMENT_WORK_ID: &str = "fk_comment_work_id";
static FK_COMMENT_CREATED_BY: &str = "fk_comment_created_by";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(pk_auto(Comment::Id))
                    .col(integer(Comment::WorkId))
                    .col(text(Comment::Comment))
                    .col(boolean(Comment::IsDelete).default(false))
                    .col(timestamp(Comment::CreatedAt))
                    .col(timestamp_null(Comment::UpdatedAt))
                    .col(integer(Comment::CreatedBy))
                    .col(integer_null(Comment::UpdatedBy))
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_COMMENT_WORK_ID)
                    .from_tbl(Comment::Table)
                    .from_col(Comment::WorkId)
                    .to_tbl(Work::Table)
                    .to_col(Work::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_COMMENT_CREATED_BY)
                    .from_tbl(Comment::Table)
                    .from_col(Comment::CreatedBy)
                    .to_tbl(User::Table)
                    .to_col(User::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for fk in [FK_COMMENT_CREATED_BY, FK_COMMENT_WORK_ID] {
            manager
                .drop_foreign_key(ForeignKey::drop().name(fk).table(Comment::Table).to_owned())
                .await?;
        }

        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Comment {
    Table,
    Id,
    WorkId,
    Comment,
    IsDelete,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
    UpdatedBy,
}
