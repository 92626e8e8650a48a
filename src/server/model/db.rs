//! Database model type aliases and well-known row ids.

/// Role of a user; admins supervise, staff log work.
pub type RoleModel = entity::role::Model;

pub type TaskModel = entity::task::Model;

/// Sub-category of a [`TaskModel`]
pub type TaskTypeModel = entity::task_type::Model;

/// A user account.
///
/// Users are created by an admin with only a number id and name; `email` and `password` are
/// set when the user registers themselves.
pub type UserModel = entity::user::Model;

/// A logged cleaning task with optional before/after photos.
pub type WorkModel = entity::work::Model;

pub type CommentModel = entity::comment::Model;

/// Id of the seeded admin role
pub const ROLE_ID_ADMIN: i32 = 1;
/// Id of the seeded staff role
pub const ROLE_ID_STAFF: i32 = 2;

/// Id of the seeded daily task
pub const TASK_ID_DAILY: i32 = 1;
/// Id of the seeded service task
pub const TASK_ID_SERVICE: i32 = 2;
