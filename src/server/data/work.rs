use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    FromQueryResult, IntoActiveModel, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};

use crate::server::{
    data::query::{contains_ci, fetch_page},
    model::{
        db::WorkModel,
        query::{in_range, ListQuery},
    },
    util::time::DateRange,
};

/// Fields of a new work entry
#[derive(Debug, Clone)]
pub struct NewWork {
    pub user_id: i32,
    pub task_id: i32,
    pub task_type_id: i32,
    pub floor: String,
    pub info: String,
    pub image_before: Option<String>,
    pub image_after: Option<String>,
}

/// Fields of a work entry that may change; `None` leaves a field untouched.
#[derive(Debug, Default, Clone)]
pub struct WorkChanges {
    pub task_id: Option<i32>,
    pub task_type_id: Option<i32>,
    pub floor: Option<String>,
    pub info: Option<String>,
    /// `Some(None)` removes the image
    pub image_before: Option<Option<String>>,
    pub image_after: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct FloorCount {
    pub floor: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct UserCount {
    pub user_id: i32,
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct TaskTypeCount {
    pub task_type_id: i32,
    pub name: String,
    pub count: i64,
}

pub struct WorkRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> WorkRepository<'a, C> {
    /// Creates a new instance of [`WorkRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Lists work entries; `search` matches floor and info.
    ///
    /// `owner_id` restricts the list to the work of one user regardless of the query.
    pub async fn find(
        &self,
        query: &ListQuery,
        created: Option<DateRange>,
        owner_id: Option<i32>,
    ) -> Result<(Vec<WorkModel>, u64), DbErr> {
        let mut condition = Condition::all().add(entity::work::Column::IsDelete.eq(false));

        if let Some(search) = query.search() {
            condition = condition.add(
                Condition::any()
                    .add(contains_ci(entity::work::Column::Floor, search))
                    .add(contains_ci(entity::work::Column::Info, search)),
            );
        }
        if let Some(id) = query.id {
            condition = condition.add(entity::work::Column::Id.eq(id));
        }
        if let Some(user_id) = owner_id.or(query.user_id) {
            condition = condition.add(entity::work::Column::UserId.eq(user_id));
        }
        if let Some(task_id) = query.task_id {
            condition = condition.add(entity::work::Column::TaskId.eq(task_id));
        }
        if let Some(task_type_id) = query.task_type_id {
            condition = condition.add(entity::work::Column::TaskTypeId.eq(task_type_id));
        }
        if let Some(floor) = query.floor.as_deref() {
            condition = condition.add(contains_ci(entity::work::Column::Floor, floor));
        }
        if let Some(info) = query.info.as_deref() {
            condition = condition.add(contains_ci(entity::work::Column::Info, info));
        }
        if let Some(range) = created {
            condition = condition.add(in_range(entity::work::Column::CreatedAt, range));
        }

        fetch_page(
            self.db,
            entity::prelude::Work::find().filter(condition),
            query,
        )
        .await
    }

    pub async fn get(&self, work_id: i32) -> Result<Option<WorkModel>, DbErr> {
        entity::prelude::Work::find_by_id(work_id)
            .filter(entity::work::Column::IsDelete.eq(false))
            .one(self.db)
            .await
    }

    pub async fn create(&self, work: NewWork) -> Result<WorkModel, DbErr> {
        let work = entity::work::ActiveModel {
            user_id: ActiveValue::Set(work.user_id),
            task_id: ActiveValue::Set(work.task_id),
            task_type_id: ActiveValue::Set(work.task_type_id),
            floor: ActiveValue::Set(work.floor),
            info: ActiveValue::Set(work.info),
            image_before: ActiveValue::Set(work.image_before),
            image_after: ActiveValue::Set(work.image_after),
            is_delete: ActiveValue::Set(false),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(None),
            ..Default::default()
        };

        work.insert(self.db).await
    }

    pub async fn update(&self, work: WorkModel, changes: WorkChanges) -> Result<WorkModel, DbErr> {
        let mut work_am = work.into_active_model();

        if let Some(task_id) = changes.task_id {
            work_am.task_id = ActiveValue::Set(task_id);
        }
        if let Some(task_type_id) = changes.task_type_id {
            work_am.task_type_id = ActiveValue::Set(task_type_id);
        }
        if let Some(floor) = changes.floor {
            work_am.floor = ActiveValue::Set(floor);
        }
        if let Some(info) = changes.info {
            work_am.info = ActiveValue::Set(info);
        }
        if let Some(image_before) = changes.image_before {
            work_am.image_before = ActiveValue::Set(image_before);
        }
        if let Some(image_after) = changes.image_after {
            work_am.image_after = ActiveValue::Set(image_after);
        }
        work_am.updated_at = ActiveValue::Set(Some(Utc::now().naive_utc()));

        work_am.update(self.db).await
    }

    pub async fn soft_delete(&self, work: WorkModel) -> Result<WorkModel, DbErr> {
        let mut work_am = work.into_active_model();
        work_am.is_delete = ActiveValue::Set(true);
        work_am.updated_at = ActiveValue::Set(Some(Utc::now().naive_utc()));

        work_am.update(self.db).await
    }

    /// Work count per floor for one task, lowest floor first
    pub async fn count_by_floor(
        &self,
        task_id: i32,
        created: Option<DateRange>,
    ) -> Result<Vec<FloorCount>, DbErr> {
        let mut floors = entity::prelude::Work::find()
            .select_only()
            .column(entity::work::Column::Floor)
            .column_as(entity::work::Column::Id.count(), "count")
            .filter(Self::dashboard_condition(task_id, created))
            .group_by(entity::work::Column::Floor)
            .into_model::<FloorCount>()
            .all(self.db)
            .await?;
        floors.sort_by(|a, b| floor_order(&a.floor).cmp(&floor_order(&b.floor)));

        Ok(floors)
    }

    /// Work count per user for one task
    pub async fn count_by_user(
        &self,
        task_id: i32,
        created: Option<DateRange>,
    ) -> Result<Vec<UserCount>, DbErr> {
        entity::prelude::Work::find()
            .select_only()
            .column(entity::work::Column::UserId)
            .column_as(entity::user::Column::Name, "name")
            .column_as(entity::work::Column::Id.count(), "count")
            .join(JoinType::InnerJoin, entity::work::Relation::User.def())
            .filter(Self::dashboard_condition(task_id, created))
            .group_by(entity::work::Column::UserId)
            .group_by(entity::user::Column::Name)
            .order_by_asc(entity::work::Column::UserId)
            .into_model::<UserCount>()
            .all(self.db)
            .await
    }

    /// Work count per task type for one task
    pub async fn count_by_task_type(
        &self,
        task_id: i32,
        created: Option<DateRange>,
    ) -> Result<Vec<TaskTypeCount>, DbErr> {
        entity::prelude::Work::find()
            .select_only()
            .column(entity::work::Column::TaskTypeId)
            .column_as(entity::task_type::Column::Name, "name")
            .column_as(entity::work::Column::Id.count(), "count")
            .join(JoinType::InnerJoin, entity::work::Relation::TaskType.def())
            .filter(Self::dashboard_condition(task_id, created))
            .group_by(entity::work::Column::TaskTypeId)
            .group_by(entity::task_type::Column::Name)
            .order_by_asc(entity::work::Column::TaskTypeId)
            .into_model::<TaskTypeCount>()
            .all(self.db)
            .await
    }

    fn dashboard_condition(task_id: i32, created: Option<DateRange>) -> Condition {
        let mut condition = Condition::all()
            .add(entity::work::Column::IsDelete.eq(false))
            .add(entity::work::Column::TaskId.eq(task_id));

        if let Some(range) = created {
            condition = condition.add(in_range(entity::work::Column::CreatedAt, range));
        }

        condition
    }
}

/// Floors by the number in their label (`Lantai 10` after `Lantai 2`), unnumbered labels last
fn floor_order(floor: &str) -> (bool, u32, &str) {
    let digits: String = floor
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();

    match digits.parse::<u32>() {
        Ok(number) => (false, number, floor),
        Err(_) => (true, 0, floor),
    }
}
