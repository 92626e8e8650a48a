//! Factory functions for in-memory database models.
//!
//! These build models with standard test values without touching the database.

use chrono::Utc;

/// Create a user model that has not registered yet.
pub fn mock_user_model(id: i32, role_id: i32) -> entity::user::Model {
    entity::user::Model {
        id,
        number_id: format!("NID{:04}", id),
        name: format!("User {}", id),
        email: None,
        password: None,
        role_id,
        is_delete: false,
        is_locked: false,
        profile: None,
        profile_name: None,
        floor: None,
        created_at: Utc::now().naive_utc(),
        updated_at: None,
    }
}

pub fn mock_role_model(id: i32, name: &str) -> entity::role::Model {
    entity::role::Model {
        id,
        name: name.to_string(),
        description: None,
        is_delete: false,
    }
}
