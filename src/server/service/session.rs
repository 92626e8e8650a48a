//! Login session bookkeeping and revocation.
//!
//! Each token carries the uuid of the login it was issued for. Revoking a user moves every
//! uuid of the user into the auto-logout set, which the authentication extractors consult on
//! every request.

use fred::prelude::*;

use crate::server::{
    error::{auth::AuthError, Error},
    model::redis::RedisKeys,
};

/// How often a single login may refresh its token
pub const MAX_REFRESH_COUNT: i64 = 30;

pub struct SessionService<'a> {
    redis: &'a Pool,
    keys: &'a RedisKeys,
}

impl<'a> SessionService<'a> {
    /// Creates a new instance of [`SessionService`]
    pub fn new(redis: &'a Pool, keys: &'a RedisKeys) -> Self {
        Self { redis, keys }
    }

    pub async fn register_login(&self, user_id: i32, uuid: &str) -> Result<(), Error> {
        let _: i64 = self.redis.sadd(self.keys.login(user_id), uuid).await?;

        Ok(())
    }

    /// Revokes every login of a user
    pub async fn force_logout(&self, user_id: i32) -> Result<(), Error> {
        let login_key = self.keys.login(user_id);

        let uuids: Vec<String> = self.redis.smembers(&login_key).await?;
        if !uuids.is_empty() {
            let _: i64 = self.redis.sadd(self.keys.auto_logout(), uuids).await?;
        }
        let _: i64 = self.redis.del(&login_key).await?;

        Ok(())
    }

    /// Ends one login; the uuid is no longer tracked anywhere
    pub async fn logout(&self, user_id: i32, uuid: &str) -> Result<(), Error> {
        let _: i64 = self.redis.srem(self.keys.login(user_id), uuid).await?;
        let _: i64 = self.redis.srem(self.keys.auto_logout(), uuid).await?;
        let _: i64 = self.redis.del(self.keys.refresh_token(uuid)).await?;

        Ok(())
    }

    pub async fn is_revoked(&self, uuid: &str) -> Result<bool, Error> {
        Ok(self.redis.sismember(self.keys.auto_logout(), uuid).await?)
    }

    /// Counts a token refresh of a login.
    ///
    /// Once the limit is exceeded the counter is reset and the login has to sign in again.
    pub async fn increment_refresh(&self, uuid: &str) -> Result<i64, Error> {
        let key = self.keys.refresh_token(uuid);

        let count: i64 = self.redis.incr(&key).await?;
        if count > MAX_REFRESH_COUNT {
            let _: i64 = self.redis.del(&key).await?;

            return Err(AuthError::RefreshLimitReached.into());
        }

        Ok(count)
    }
}
