use chrono::Utc;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{
    constant::{TASK_ID_DAILY, TASK_ID_SERVICE},
    error::TestError,
    TestSetup,
};

impl TestSetup {
    pub fn work(&self) -> WorkFixtures<'_> {
        WorkFixtures { setup: self }
    }
}

pub struct WorkFixtures<'a> {
    setup: &'a TestSetup,
}

impl<'a> WorkFixtures<'a> {
    /// Insert the daily and service tasks with their fixed ids
    pub async fn insert_tasks(&self) -> Result<(), TestError> {
        let tasks = [(TASK_ID_DAILY, "Daily"), (TASK_ID_SERVICE, "Service")].map(|(id, name)| {
            entity::task::ActiveModel {
                id: ActiveValue::Set(id),
                name: ActiveValue::Set(name.to_string()),
                is_delete: ActiveValue::Set(false),
            }
        });

        entity::prelude::Task::insert_many(tasks)
            .exec(&self.setup.db)
            .await?;

        Ok(())
    }

    pub async fn insert_task_type(
        &self,
        name: &str,
        task_id: i32,
    ) -> Result<entity::task_type::Model, TestError> {
        Ok(
            entity::prelude::TaskType::insert(entity::task_type::ActiveModel {
                name: ActiveValue::Set(name.to_string()),
                task_id: ActiveValue::Set(task_id),
                is_delete: ActiveValue::Set(false),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    pub async fn insert_work(
        &self,
        user_id: i32,
        task_id: i32,
        task_type_id: i32,
        floor: &str,
    ) -> Result<entity::work::Model, TestError> {
        Ok(
            entity::prelude::Work::insert(entity::work::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                task_id: ActiveValue::Set(task_id),
                task_type_id: ActiveValue::Set(task_type_id),
                floor: ActiveValue::Set(floor.to_string()),
                info: ActiveValue::Set(format!("Cleaned floor {}", floor)),
                image_before: ActiveValue::Set(None),
                image_after: ActiveValue::Set(None),
                is_delete: ActiveValue::Set(false),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                updated_at: ActiveValue::Set(None),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    pub async fn insert_comment(
        &self,
        work_id: i32,
        created_by: i32,
        comment: &str,
    ) -> Result<entity::comment::Model, TestError> {
        Ok(
            entity::prelude::Comment::insert(entity::comment::ActiveModel {
                work_id: ActiveValue::Set(work_id),
                comment: ActiveValue::Set(comment.to_string()),
                is_delete: ActiveValue::Set(false),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                updated_at: ActiveValue::Set(None),
                created_by: ActiveValue::Set(created_by),
                updated_by: ActiveValue::Set(None),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }
}
