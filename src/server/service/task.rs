use sea_orm::DatabaseConnection;

use crate::{
    model::{
        api::ListDto,
        task::{TaskDto, TaskTypeDto},
    },
    server::{
        data::{task::TaskRepository, task_type::TaskTypeRepository},
        error::Error,
        model::{
            auth::AuthUser,
            db::{TaskModel, TaskTypeModel},
            query::ListQuery,
        },
    },
};

impl From<TaskModel> for TaskDto {
    fn from(task: TaskModel) -> Self {
        Self {
            id: task.id,
            name: task.name,
        }
    }
}

impl From<TaskTypeModel> for TaskTypeDto {
    fn from(task_type: TaskTypeModel) -> Self {
        Self {
            id: task_type.id,
            name: task_type.name,
            task_id: task_type.task_id,
        }
    }
}

pub struct TaskService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TaskService<'a> {
    /// Creates a new instance of [`TaskService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<ListDto<TaskDto>, Error> {
        let (tasks, count) = TaskRepository::new(self.db).find(query).await?;

        Ok(ListDto {
            count,
            data: tasks.into_iter().map(TaskDto::from).collect(),
        })
    }
}

pub struct TaskTypeService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TaskTypeService<'a> {
    /// Creates a new instance of [`TaskTypeService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<ListDto<TaskTypeDto>, Error> {
        let (task_types, count) = TaskTypeRepository::new(self.db).find(query).await?;

        Ok(ListDto {
            count,
            data: task_types.into_iter().map(TaskTypeDto::from).collect(),
        })
    }

    pub async fn create(
        &self,
        auth: &AuthUser,
        name: String,
        task_id: i32,
    ) -> Result<TaskTypeDto, Error> {
        auth.require_admin()?;

        if TaskRepository::new(self.db).get(task_id).await?.is_none() {
            return Err(Error::not_found("task id not found"));
        }

        let task_type = TaskTypeRepository::new(self.db)
            .create(name, task_id)
            .await?;

        Ok(task_type.into())
    }

    pub async fn update(
        &self,
        auth: &AuthUser,
        task_type_id: i32,
        name: Option<String>,
        task_id: Option<i32>,
    ) -> Result<TaskTypeDto, Error> {
        auth.require_admin()?;

        let task_type_repo = TaskTypeRepository::new(self.db);
        let Some(task_type) = task_type_repo.get(task_type_id).await? else {
            return Err(Error::not_found("task type not found"));
        };

        if let Some(task_id) = task_id {
            if TaskRepository::new(self.db).get(task_id).await?.is_none() {
                return Err(Error::not_found("task not found"));
            }
        }

        if name.is_none() && task_id.is_none() {
            return Ok(task_type.into());
        }

        let task_type = task_type_repo.update(task_type, name, task_id).await?;

        Ok(task_type.into())
    }

    pub async fn delete(&self, auth: &AuthUser, task_type_id: i32) -> Result<(), Error> {
        auth.require_admin()?;

        let task_type_repo = TaskTypeRepository::new(self.db);
        let Some(task_type) = task_type_repo.get(task_type_id).await? else {
            return Err(Error::not_found("task type not found"));
        };

        task_type_repo.soft_delete(task_type).await?;

        Ok(())
    }
}
