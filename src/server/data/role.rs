use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

use crate::server::{
    data::query::{contains_ci, fetch_page},
    model::{db::RoleModel, query::ListQuery},
};

pub struct RoleRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RoleRepository<'a, C> {
    /// Creates a new instance of [`RoleRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Lists roles matching `search`, `id` and `name`
    pub async fn find(&self, query: &ListQuery) -> Result<(Vec<RoleModel>, u64), DbErr> {
        let mut condition = Condition::all().add(entity::role::Column::IsDelete.eq(false));

        if let Some(search) = query.search() {
            condition = condition.add(contains_ci(entity::role::Column::Name, search));
        }
        if let Some(id) = query.id {
            condition = condition.add(entity::role::Column::Id.eq(id));
        }
        if let Some(name) = query.name.as_deref() {
            condition = condition.add(contains_ci(entity::role::Column::Name, name));
        }

        fetch_page(
            self.db,
            entity::prelude::Role::find().filter(condition),
            query,
        )
        .await
    }

    pub async fn get(&self, role_id: i32) -> Result<Option<RoleModel>, DbErr> {
        entity::prelude::Role::find_by_id(role_id)
            .filter(entity::role::Column::IsDelete.eq(false))
            .one(self.db)
            .await
    }

    /// Every role including deleted ones, for labelling users
    pub async fn all(&self) -> Result<Vec<RoleModel>, DbErr> {
        entity::prelude::Role::find().all(self.db).await
    }
}
