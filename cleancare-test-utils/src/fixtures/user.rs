use chrono::Utc;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{
    constant::{ROLE_ID_ADMIN, ROLE_ID_STAFF},
    error::TestError,
    TestSetup,
};

impl TestSetup {
    pub fn user(&self) -> UserFixtures<'_> {
        UserFixtures { setup: self }
    }
}

pub struct UserFixtures<'a> {
    setup: &'a TestSetup,
}

impl<'a> UserFixtures<'a> {
    /// Insert the admin and staff roles with their fixed ids
    pub async fn insert_roles(&self) -> Result<(), TestError> {
        let roles = [(ROLE_ID_ADMIN, "Admin"), (ROLE_ID_STAFF, "Staff")].map(|(id, name)| {
            entity::role::ActiveModel {
                id: ActiveValue::Set(id),
                name: ActiveValue::Set(name.to_string()),
                description: ActiveValue::Set(None),
                is_delete: ActiveValue::Set(false),
            }
        });

        entity::prelude::Role::insert_many(roles)
            .exec(&self.setup.db)
            .await?;

        Ok(())
    }

    /// Insert a user that has not registered yet (no email, no password)
    pub async fn insert_user(
        &self,
        number_id: &str,
        role_id: i32,
    ) -> Result<entity::user::Model, TestError> {
        self.insert(number_id, role_id, None, None).await
    }

    /// Insert a registered user with an email and an already hashed password
    pub async fn insert_registered_user(
        &self,
        number_id: &str,
        role_id: i32,
        email: &str,
        password_hash: &str,
    ) -> Result<entity::user::Model, TestError> {
        self.insert(
            number_id,
            role_id,
            Some(email.to_string()),
            Some(password_hash.to_string()),
        )
        .await
    }

    async fn insert(
        &self,
        number_id: &str,
        role_id: i32,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<entity::user::Model, TestError> {
        Ok(
            entity::prelude::User::insert(entity::user::ActiveModel {
                number_id: ActiveValue::Set(number_id.to_string()),
                name: ActiveValue::Set(format!("User {}", number_id)),
                email: ActiveValue::Set(email),
                password: ActiveValue::Set(password),
                role_id: ActiveValue::Set(role_id),
                is_delete: ActiveValue::Set(false),
                is_locked: ActiveValue::Set(false),
                profile: ActiveValue::Set(None),
                profile_name: ActiveValue::Set(None),
                floor: ActiveValue::Set(None),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                updated_at: ActiveValue::Set(None),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }
}
