pub mod prelude;

pub mod comment;
pub mod role;
pub mod task;
pub mod task_type;
pub mod user;
pub mod work;
