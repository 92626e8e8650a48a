use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter,
};

use crate::server::{
    data::query::{contains_ci, fetch_page},
    model::{db::TaskTypeModel, query::ListQuery},
};

pub struct TaskTypeRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TaskTypeRepository<'a, C> {
    /// Creates a new instance of [`TaskTypeRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Lists task types matching `search`, `id`, `name` and `task_id`
    pub async fn find(&self, query: &ListQuery) -> Result<(Vec<TaskTypeModel>, u64), DbErr> {
        let mut condition = Condition::all().add(entity::task_type::Column::IsDelete.eq(false));

        if let Some(search) = query.search() {
            condition = condition.add(contains_ci(entity::task_type::Column::Name, search));
        }
        if let Some(id) = query.id {
            condition = condition.add(entity::task_type::Column::Id.eq(id));
        }
        if let Some(name) = query.name.as_deref() {
            condition = condition.add(contains_ci(entity::task_type::Column::Name, name));
        }
        if let Some(task_id) = query.task_id {
            condition = condition.add(entity::task_type::Column::TaskId.eq(task_id));
        }

        fetch_page(
            self.db,
            entity::prelude::TaskType::find().filter(condition),
            query,
        )
        .await
    }

    pub async fn get(&self, task_type_id: i32) -> Result<Option<TaskTypeModel>, DbErr> {
        entity::prelude::TaskType::find_by_id(task_type_id)
            .filter(entity::task_type::Column::IsDelete.eq(false))
            .one(self.db)
            .await
    }

    pub async fn find_by_ids(&self, ids: Vec<i32>) -> Result<Vec<TaskTypeModel>, DbErr> {
        entity::prelude::TaskType::find()
            .filter(entity::task_type::Column::Id.is_in(ids))
            .all(self.db)
            .await
    }

    pub async fn create(&self, name: String, task_id: i32) -> Result<TaskTypeModel, DbErr> {
        let task_type = entity::task_type::ActiveModel {
            name: ActiveValue::Set(name),
            task_id: ActiveValue::Set(task_id),
            is_delete: ActiveValue::Set(false),
            ..Default::default()
        };

        task_type.insert(self.db).await
    }

    /// Updates the provided fields of an existing task type
    pub async fn update(
        &self,
        task_type: TaskTypeModel,
        name: Option<String>,
        task_id: Option<i32>,
    ) -> Result<TaskTypeModel, DbErr> {
        let mut task_type_am = task_type.into_active_model();

        if let Some(name) = name {
            task_type_am.name = ActiveValue::Set(name);
        }
        if let Some(task_id) = task_id {
            task_type_am.task_id = ActiveValue::Set(task_id);
        }

        task_type_am.update(self.db).await
    }

    pub async fn soft_delete(&self, task_type: TaskTypeModel) -> Result<TaskTypeModel, DbErr> {
        let mut task_type_am = task_type.into_active_model();
        task_type_am.is_delete = ActiveValue::Set(true);

        task_type_am.update(self.db).await
    }
}
