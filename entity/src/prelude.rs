pub use super::comment::Entity as Comment;
pub use super::role::Entity as Role;
pub use super::task::Entity as Task;
pub use super::task_type::Entity as TaskType;
pub use super::user::Entity as User;
pub use super::work::Entity as Work;
