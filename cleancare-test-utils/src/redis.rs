use fred::prelude::*;

use crate::{constant::TEST_REDIS_URL, TestError};

/// Redis test setup with automatic cleanup
///
/// Every instance owns a unique key prefix so tests running in parallel never share keys.
/// All keys under the prefix are deleted when the struct is dropped.
pub struct RedisTest {
    pub redis_pool: Pool,
    prefix: String,
}

impl RedisTest {
    pub async fn new() -> Result<Self, TestError> {
        let redis_config = Config::from_url(TEST_REDIS_URL)?;
        let redis_pool = Pool::new(redis_config, None, None, None, 5)?;
        redis_pool.init().await?;

        let prefix = Self::generate_unique_prefix();

        Ok(RedisTest { redis_pool, prefix })
    }

    /// Key prefix reserved for this test instance
    pub fn prefix(&self) -> String {
        self.prefix.clone()
    }

    /// Generate a unique prefix using timestamp and thread ID
    fn generate_unique_prefix() -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        use std::time::{SystemTime, UNIX_EPOCH};

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();

        let thread_id = std::thread::current().id();

        let mut hasher = DefaultHasher::new();
        timestamp.hash(&mut hasher);
        thread_id.hash(&mut hasher);
        let hash = hasher.finish();

        format!("test:{}:{:x}", timestamp, hash)
    }
}

static CLEANUP_SCRIPT: &str = r#"
local keys = redis.call('KEYS', ARGV[1])
for _, key in ipairs(keys) do
    redis.call('DEL', key)
end
return #keys
"#;

impl Drop for RedisTest {
    fn drop(&mut self) {
        // Spawn instead of blocking to avoid "runtime within runtime" errors
        let pool = self.redis_pool.clone();
        let pattern = format!("{}:*", self.prefix);

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _: Result<i64, fred::error::Error> =
                    pool.eval(CLEANUP_SCRIPT, Vec::<String>::new(), vec![pattern]).await;
            });
        }
    }
}
