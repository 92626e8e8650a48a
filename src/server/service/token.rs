//! Issuing and decoding of access and password reset tokens.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use crate::server::{
    error::{auth::AuthError, Error},
    model::{
        auth::{AuthUser, ResetClaims, TokenClaims},
        db::UserModel,
    },
    util::crypto::{decode_claim, decrypt, encode_claim, encrypt},
};

/// Lifetime of an access token
const ACCESS_TOKEN_TTL_HOURS: i64 = 24;
/// Lifetime of a password reset token
pub const RESET_TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Clone)]
pub struct TokenService {
    secret: Arc<str>,
}

impl TokenService {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issues an access token for a login session of `user`.
    ///
    /// The user and role ids are encrypted with the token secret, the email and login uuid are
    /// base64 encoded.
    pub fn issue(&self, user: &UserModel, uuid: &str) -> Result<String, Error> {
        self.sign(
            user.id,
            user.role_id,
            user.email.as_deref().unwrap_or_default(),
            uuid,
        )
    }

    /// Reissues a token for the same login session as `auth`
    pub fn reissue(&self, auth: &AuthUser) -> Result<String, Error> {
        self.sign(auth.id, auth.role_id, &auth.email, &auth.uuid)
    }

    fn sign(&self, id: i32, role_id: i32, email: &str, uuid: &str) -> Result<String, Error> {
        let claims = TokenClaims {
            id: encrypt(&self.secret, &id.to_string())?,
            role_id: encrypt(&self.secret, &role_id.to_string())?,
            email: encode_claim(email),
            uuid: encode_claim(uuid),
            exp: (Utc::now() + Duration::hours(ACCESS_TOKEN_TTL_HOURS)).timestamp(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?)
    }

    /// Decodes an access token into the caller it was issued to.
    ///
    /// With `validate_exp` false an expired token is still accepted, which logout and refresh
    /// rely on.
    pub fn decode(&self, token: &str, validate_exp: bool) -> Result<AuthUser, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = validate_exp;

        let claims = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })?
        .claims;

        Ok(AuthUser {
            id: self.decode_id(&claims.id)?,
            role_id: self.decode_id(&claims.role_id)?,
            email: decode_claim(&claims.email).map_err(|_| AuthError::InvalidToken)?,
            uuid: decode_claim(&claims.uuid).map_err(|_| AuthError::InvalidToken)?,
        })
    }

    /// Ids are accepted either as plain numbers or encrypted
    fn decode_id(&self, value: &str) -> Result<i32, AuthError> {
        if let Ok(id) = value.parse() {
            return Ok(id);
        }

        decrypt(&self.secret, value)
            .ok()
            .and_then(|id| id.parse().ok())
            .ok_or(AuthError::InvalidToken)
    }

    pub fn issue_reset(&self, user_id: i32) -> Result<String, Error> {
        let claims = ResetClaims {
            user_id,
            exp: (Utc::now() + Duration::seconds(RESET_TOKEN_TTL_SECS)).timestamp(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?)
    }

    pub fn decode_reset(&self, token: &str) -> Result<ResetClaims, AuthError> {
        decode::<ResetClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidResetToken)
    }
}
