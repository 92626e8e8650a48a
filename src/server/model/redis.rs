//! Redis key layout.
//!
//! Every key lives under a configurable prefix so several deployments, or parallel tests,
//! can share one Redis instance.

/// Builds the Redis keys used by the application
#[derive(Debug, Clone)]
pub struct RedisKeys {
    prefix: String,
}

/// Counter kinds used to limit unauthenticated endpoints per client address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitKind {
    ResetPassword,
    VerifyNumber,
    Register,
}

impl RateLimitKind {
    fn key_part(self) -> &'static str {
        match self {
            Self::ResetPassword => "reset-password",
            Self::VerifyNumber => "verify-number",
            Self::Register => "register",
        }
    }

    /// Attempts allowed within the counter's lifetime
    pub fn max_attempts(self) -> i64 {
        match self {
            Self::ResetPassword => 5,
            Self::VerifyNumber | Self::Register => 10,
        }
    }
}

impl RedisKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// SET of login uuids issued to a user
    pub fn login(&self, user_id: i32) -> String {
        format!("{}:login:{}", self.prefix, user_id)
    }

    /// SET of revoked login uuids
    pub fn auto_logout(&self) -> String {
        format!("{}:auto-logout", self.prefix)
    }

    /// Number of times the token of a login has been refreshed
    pub fn refresh_token(&self, uuid: &str) -> String {
        format!("{}:refresh-token:{}", self.prefix, uuid)
    }

    pub fn rate_limit(&self, kind: RateLimitKind, ip: &str) -> String {
        format!("{}:{}:ip:{}", self.prefix, kind.key_part(), ip)
    }

    /// Pending password reset token
    pub fn reset_token(&self, token: &str) -> String {
        format!("{}:reset-token:{}", self.prefix, token)
    }

    /// SET of user ids that have not read a comment
    pub fn unread_comment(&self, comment_id: i32) -> String {
        format!("{}:unread-comment:{}", self.prefix, comment_id)
    }

    /// SET of comment ids a user has not read
    pub fn unread_user(&self, user_id: i32) -> String {
        format!("{}:unread-user:{}", self.prefix, user_id)
    }

    pub fn notification_channel(&self, user_id: i32) -> String {
        format!("{}:notification:{}", self.prefix, user_id)
    }

    pub fn notification_pattern(&self) -> String {
        format!("{}:notification:*", self.prefix)
    }

    /// Extracts the user id from a notification channel name
    pub fn parse_notification_channel(&self, channel: &str) -> Option<i32> {
        channel
            .strip_prefix(&self.prefix)?
            .strip_prefix(":notification:")?
            .parse()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_prefixed_keys() {
        let keys = RedisKeys::new("cleancare");

        assert_eq!(keys.login(7), "cleancare:login:7");
        assert_eq!(keys.auto_logout(), "cleancare:auto-logout");
        assert_eq!(
            keys.rate_limit(RateLimitKind::ResetPassword, "localhost"),
            "cleancare:reset-password:ip:localhost"
        );
        assert_eq!(keys.unread_comment(3), "cleancare:unread-comment:3");
    }

    #[test]
    fn parses_notification_channel() {
        let keys = RedisKeys::new("test:1:abc");
        let channel = keys.notification_channel(12);

        assert_eq!(keys.parse_notification_channel(&channel), Some(12));
        assert_eq!(keys.parse_notification_channel("other:notification:12"), None);
    }
}
