use serde::{Deserialize, Serialize};

use crate::server::{
    error::auth::AuthError,
    model::db::{ROLE_ID_ADMIN, ROLE_ID_STAFF},
};

/// Claims of an access token.
///
/// `id` and `role_id` are encrypted, `email` and `uuid` are base64 encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: String,
    pub role_id: String,
    pub email: String,
    pub uuid: String,
    pub exp: i64,
}

/// Claims of a password reset token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetClaims {
    pub user_id: i32,
    pub exp: i64,
}

/// The authenticated caller, decoded from a valid access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub role_id: i32,
    pub email: String,
    /// Login session the token belongs to
    pub uuid: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role_id == ROLE_ID_ADMIN
    }

    pub fn is_staff(&self) -> bool {
        self.role_id == ROLE_ID_STAFF
    }

    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.is_admin() {
            return Ok(());
        }

        Err(AuthError::RoleNotPermitted)
    }

    pub fn require_staff(&self) -> Result<(), AuthError> {
        if self.is_staff() {
            return Ok(());
        }

        Err(AuthError::RoleNotPermitted)
    }
}

#[cfg(test)]
impl AuthUser {
    /// Caller with the given id and role for service tests
    pub fn mock(id: i32, role_id: i32) -> Self {
        Self {
            id,
            role_id,
            email: format!("user{}@example.com", id),
            uuid: format!("login-{}", id),
        }
    }
}
