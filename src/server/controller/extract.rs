//! Request extractors for the authenticated caller and the client address.

use std::{convert::Infallible, net::SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::server::{
    error::{auth::AuthError, Error},
    model::{app::AppState, auth::AuthUser},
    service::session::SessionService,
};

const BEARER_PREFIX: &str = "Bearer ";

/// Caller of a request that carries an expired token.
///
/// Only logout and refresh accept it so a session can still be closed or extended.
pub struct ExpiredAuthUser(pub AuthUser);

/// Address of the client, as reported by the proxy when there is one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

/// Decodes a token and rejects it when its login has been revoked
pub async fn authorize(
    state: &AppState,
    token: &str,
    validate_exp: bool,
) -> Result<AuthUser, Error> {
    let auth = state.tokens.decode(token, validate_exp)?;

    if SessionService::new(&state.redis, &state.keys)
        .is_revoked(&auth.uuid)
        .await?
    {
        return Err(AuthError::RevokedToken.into());
    }

    Ok(auth)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        authorize(state, token, true).await
    }
}

impl FromRequestParts<AppState> for ExpiredAuthUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        Ok(Self(authorize(state, token, false).await?))
    }
}

impl ClientIp {
    pub fn from_headers(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(',').next())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let ip = header("x-forwarded-for")
            .or_else(|| header("x-real-ip"))
            .or_else(|| peer.map(|addr| addr.ip().to_string()))
            .unwrap_or_else(|| "unknown".to_string());

        Self(ip)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(Self::from_headers(&parts.headers, peer))
    }
}
