//! Per client address attempt counters for unauthenticated endpoints.

use fred::prelude::*;

use crate::server::{
    error::Error,
    model::redis::{RateLimitKind, RedisKeys},
};

/// Lifetime of an attempt counter, counted from the first attempt
pub const RATE_LIMIT_WINDOW_SECS: i64 = 4 * 60 * 60;

pub struct RateLimiter<'a> {
    redis: &'a Pool,
    keys: &'a RedisKeys,
}

impl<'a> RateLimiter<'a> {
    /// Creates a new instance of [`RateLimiter`]
    pub fn new(redis: &'a Pool, keys: &'a RedisKeys) -> Self {
        Self { redis, keys }
    }

    /// Records an attempt and fails once the address exceeds the limit of `kind`
    pub async fn check(&self, kind: RateLimitKind, ip: &str) -> Result<(), Error> {
        let key = self.keys.rate_limit(kind, &normalize_ip(ip));

        let attempts: i64 = self.redis.incr(&key).await?;
        if attempts == 1 {
            let _: () = self
                .redis
                .expire(&key, RATE_LIMIT_WINDOW_SECS, None)
                .await?;
        }

        if attempts > kind.max_attempts() {
            tracing::debug!("rate limit {:?} reached for {}", kind, ip);

            return Err(Error::TooManyAttempts);
        }

        Ok(())
    }
}

/// Loopback IPv6 is stored as `localhost`
pub fn normalize_ip(ip: &str) -> String {
    match ip {
        "::1" => "localhost".to_string(),
        ip => ip.to_string(),
    }
}
