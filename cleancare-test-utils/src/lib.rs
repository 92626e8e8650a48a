pub mod builder;
pub mod constant;
pub mod error;
pub mod fixtures;
pub mod redis;
pub mod setup;

pub use builder::TestBuilder;
pub use error::TestError;
pub use redis::RedisTest;
pub use setup::TestSetup;

pub mod prelude {
    pub use crate::{
        constant::{
            DRIVE_TOKEN_BODY, ROLE_ID_ADMIN, ROLE_ID_STAFF, TASK_ID_DAILY, TASK_ID_SERVICE,
        },
        fixtures::factory,
        test_setup_with_tables, test_setup_with_user_tables, test_setup_with_work_tables,
        TestBuilder, TestError, TestSetup,
    };
}
