use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QuerySelect,
};

use crate::server::{
    data::query::{contains_ci, fetch_page},
    model::{
        db::{UserModel, ROLE_ID_ADMIN},
        query::{in_range, ListQuery},
    },
    util::time::DateRange,
};

/// Fields of a user that may change in an update; `None` leaves a field untouched.
#[derive(Debug, Default, Clone)]
pub struct UserChanges {
    pub number_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<i32>,
    pub floor: Option<String>,
    /// `Some(None)` removes the profile picture
    pub profile: Option<Option<(String, String)>>,
}

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Lists users; `search` matches name, email and number id
    pub async fn find(
        &self,
        query: &ListQuery,
        created: Option<DateRange>,
    ) -> Result<(Vec<UserModel>, u64), DbErr> {
        let mut condition = Condition::all().add(entity::user::Column::IsDelete.eq(false));

        if let Some(search) = query.search() {
            condition = condition.add(
                Condition::any()
                    .add(contains_ci(entity::user::Column::Name, search))
                    .add(contains_ci(entity::user::Column::Email, search))
                    .add(contains_ci(entity::user::Column::NumberId, search)),
            );
        }
        if let Some(id) = query.id {
            condition = condition.add(entity::user::Column::Id.eq(id));
        }
        if let Some(number_id) = query.number_id.as_deref() {
            condition = condition.add(contains_ci(entity::user::Column::NumberId, number_id));
        }
        if let Some(name) = query.name.as_deref() {
            condition = condition.add(contains_ci(entity::user::Column::Name, name));
        }
        if let Some(email) = query.email.as_deref() {
            condition = condition.add(contains_ci(entity::user::Column::Email, email));
        }
        if let Some(floor) = query.floor.as_deref() {
            condition = condition.add(contains_ci(entity::user::Column::Floor, floor));
        }
        if let Some(role_id) = query.role_id {
            condition = condition.add(entity::user::Column::RoleId.eq(role_id));
        }
        if let Some(range) = created {
            condition = condition.add(in_range(entity::user::Column::CreatedAt, range));
        }

        fetch_page(
            self.db,
            entity::prelude::User::find().filter(condition),
            query,
        )
        .await
    }

    pub async fn get(&self, user_id: i32) -> Result<Option<UserModel>, DbErr> {
        entity::prelude::User::find_by_id(user_id)
            .filter(entity::user::Column::IsDelete.eq(false))
            .one(self.db)
            .await
    }

    pub async fn get_by_number_id(&self, number_id: &str) -> Result<Option<UserModel>, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::NumberId.eq(number_id))
            .filter(entity::user::Column::IsDelete.eq(false))
            .one(self.db)
            .await
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<UserModel>, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email))
            .filter(entity::user::Column::IsDelete.eq(false))
            .one(self.db)
            .await
    }

    /// Users by id including deleted ones, for labelling authors of older records
    pub async fn find_by_ids(&self, ids: Vec<i32>) -> Result<Vec<UserModel>, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::Id.is_in(ids))
            .all(self.db)
            .await
    }

    /// Ids of every active admin
    pub async fn admin_ids(&self) -> Result<Vec<i32>, DbErr> {
        entity::prelude::User::find()
            .select_only()
            .column(entity::user::Column::Id)
            .filter(entity::user::Column::RoleId.eq(ROLE_ID_ADMIN))
            .filter(entity::user::Column::IsDelete.eq(false))
            .into_tuple()
            .all(self.db)
            .await
    }

    /// Creates a user that still has to register
    pub async fn create(
        &self,
        number_id: String,
        name: String,
        role_id: i32,
        floor: Option<String>,
    ) -> Result<UserModel, DbErr> {
        let user = entity::user::ActiveModel {
            number_id: ActiveValue::Set(number_id),
            name: ActiveValue::Set(name),
            email: ActiveValue::Set(None),
            password: ActiveValue::Set(None),
            role_id: ActiveValue::Set(role_id),
            is_delete: ActiveValue::Set(false),
            is_locked: ActiveValue::Set(false),
            profile: ActiveValue::Set(None),
            profile_name: ActiveValue::Set(None),
            floor: ActiveValue::Set(floor),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            updated_at: ActiveValue::Set(None),
            ..Default::default()
        };

        user.insert(self.db).await
    }

    pub async fn update(&self, user: UserModel, changes: UserChanges) -> Result<UserModel, DbErr> {
        let mut user_am = user.into_active_model();

        if let Some(number_id) = changes.number_id {
            user_am.number_id = ActiveValue::Set(number_id);
        }
        if let Some(name) = changes.name {
            user_am.name = ActiveValue::Set(name);
        }
        if let Some(email) = changes.email {
            user_am.email = ActiveValue::Set(Some(email));
        }
        if let Some(role_id) = changes.role_id {
            user_am.role_id = ActiveValue::Set(role_id);
        }
        if let Some(floor) = changes.floor {
            user_am.floor = ActiveValue::Set(Some(floor));
        }
        if let Some(profile) = changes.profile {
            let (profile, profile_name) = profile.unzip();
            user_am.profile = ActiveValue::Set(profile);
            user_am.profile_name = ActiveValue::Set(profile_name);
        }
        user_am.updated_at = ActiveValue::Set(Some(Utc::now().naive_utc()));

        user_am.update(self.db).await
    }

    /// Completes registration of a user created by an admin
    pub async fn register(
        &self,
        user: UserModel,
        email: String,
        password_hash: String,
        profile: Option<(String, String)>,
    ) -> Result<UserModel, DbErr> {
        let mut user_am = user.into_active_model();

        user_am.email = ActiveValue::Set(Some(email));
        user_am.password = ActiveValue::Set(Some(password_hash));
        if let Some((profile, profile_name)) = profile {
            user_am.profile = ActiveValue::Set(Some(profile));
            user_am.profile_name = ActiveValue::Set(Some(profile_name));
        }
        user_am.updated_at = ActiveValue::Set(Some(Utc::now().naive_utc()));

        user_am.update(self.db).await
    }

    pub async fn set_password(
        &self,
        user: UserModel,
        password_hash: String,
    ) -> Result<UserModel, DbErr> {
        let mut user_am = user.into_active_model();
        user_am.password = ActiveValue::Set(Some(password_hash));
        user_am.updated_at = ActiveValue::Set(Some(Utc::now().naive_utc()));

        user_am.update(self.db).await
    }

    pub async fn soft_delete(&self, user: UserModel) -> Result<UserModel, DbErr> {
        let mut user_am = user.into_active_model();
        user_am.is_delete = ActiveValue::Set(true);
        user_am.updated_at = ActiveValue::Set(Some(Utc::now().naive_utc()));

        user_am.update(self.db).await
    }
}
