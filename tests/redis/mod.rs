//! Flows that need a live Redis at `127.0.0.1:6379`.
//!
//! Every test works under the unique key prefix of its [`RedisTest`], which removes the keys
//! again when dropped.

mod comment;
mod rate_limit;
mod reset_password;
mod session;

use cleancare::server::model::{app::AppState, redis::RedisKeys};
use cleancare_test_utils::{RedisTest, TestSetup};

use crate::util::test_state;

pub fn redis_state(test: &TestSetup, redis: &RedisTest) -> AppState {
    test_state(test, redis.redis_pool.clone(), RedisKeys::new(redis.prefix()))
}
