use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

use crate::server::{
    data::query::{contains_ci, fetch_page},
    model::{db::TaskModel, query::ListQuery},
};

pub struct TaskRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TaskRepository<'a, C> {
    /// Creates a new instance of [`TaskRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find(&self, query: &ListQuery) -> Result<(Vec<TaskModel>, u64), DbErr> {
        let mut condition = Condition::all().add(entity::task::Column::IsDelete.eq(false));

        if let Some(search) = query.search() {
            condition = condition.add(contains_ci(entity::task::Column::Name, search));
        }
        if let Some(id) = query.id {
            condition = condition.add(entity::task::Column::Id.eq(id));
        }
        if let Some(name) = query.name.as_deref() {
            condition = condition.add(contains_ci(entity::task::Column::Name, name));
        }

        fetch_page(
            self.db,
            entity::prelude::Task::find().filter(condition),
            query,
        )
        .await
    }

    pub async fn get(&self, task_id: i32) -> Result<Option<TaskModel>, DbErr> {
        entity::prelude::Task::find_by_id(task_id)
            .filter(entity::task::Column::IsDelete.eq(false))
            .one(self.db)
            .await
    }

    pub async fn find_by_ids(&self, ids: Vec<i32>) -> Result<Vec<TaskModel>, DbErr> {
        entity::prelude::Task::find()
            .filter(entity::task::Column::Id.is_in(ids))
            .all(self.db)
            .await
    }
}
