use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::db::CommentModel;

pub struct CommentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CommentRepository<'a, C> {
    /// Creates a new instance of [`CommentRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Comments of a work entry, oldest first
    pub async fn find_by_work(&self, work_id: i32) -> Result<Vec<CommentModel>, DbErr> {
        entity::prelude::Comment::find()
            .filter(entity::comment::Column::WorkId.eq(work_id))
            .filter(entity::comment::Column::IsDelete.eq(false))
            .order_by_asc(entity::comment::Column::CreatedAt)
            .order_by_asc(entity::comment::Column::Id)
            .all(self.db)
            .await
    }

    /// `(comment_id, work_id)` pairs of every live comment on the given work entries
    pub async fn ids_by_works(&self, work_ids: &[i32]) -> Result<Vec<(i32, i32)>, DbErr> {
        if work_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Comment::find()
            .select_only()
            .column(entity::comment::Column::Id)
            .column(entity::comment::Column::WorkId)
            .filter(entity::comment::Column::WorkId.is_in(work_ids.iter().copied()))
            .filter(entity::comment::Column::IsDelete.eq(false))
            .into_tuple()
            .all(self.db)
            .await
    }

    pub async fn get(&self, comment_id: i32) -> Result<Option<CommentModel>, DbErr> {
        entity::prelude::Comment::find_by_id(comment_id)
            .filter(entity::comment::Column::IsDelete.eq(false))
            .one(self.db)
            .await
    }

    pub async fn create(
        &self,
        work_id: i32,
        comment: String,
        created_by: i32,
    ) -> Result<CommentModel, DbErr> {
        let comment = entity::comment::ActiveModel {
            work_id: ActiveValue::Set(work_id),
            comment: ActiveValue::Set(comment),
            is_delete: ActiveValue::Set(false),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(None),
            created_by: ActiveValue::Set(created_by),
            updated_by: ActiveValue::Set(None),
            ..Default::default()
        };

        comment.insert(self.db).await
    }

    /// Replaces the text when given and stamps the editor
    pub async fn update(
        &self,
        comment: CommentModel,
        text: Option<String>,
        updated_by: i32,
    ) -> Result<CommentModel, DbErr> {
        let mut comment_am = comment.into_active_model();

        if let Some(text) = text {
            comment_am.comment = ActiveValue::Set(text);
        }
        comment_am.updated_by = ActiveValue::Set(Some(updated_by));
        comment_am.updated_at = ActiveValue::Set(Some(Utc::now().naive_utc()));

        comment_am.update(self.db).await
    }

    pub async fn soft_delete(
        &self,
        comment: CommentModel,
        deleted_by: i32,
    ) -> Result<CommentModel, DbErr> {
        let mut comment_am = comment.into_active_model();
        comment_am.is_delete = ActiveValue::Set(true);
        comment_am.updated_by = ActiveValue::Set(Some(deleted_by));
        comment_am.updated_at = ActiveValue::Set(Some(Utc::now().naive_utc()));

        comment_am.update(self.db).await
    }
}
