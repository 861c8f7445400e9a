use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::services::auth_service::AuthError;

pub const SESSION_COOKIE: &str = "session";

#[derive(Clone)]
pub struct SessionKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl SessionKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub sub: String, // user id
    pub exp: usize,
    pub iat: usize,
}

impl SessionClaims {
    pub fn for_user(user_id: i32, ttl_secs: usize) -> Self {
        let iat = now_unix();
        Self {
            sub: user_id.to_string(),
            iat,
            exp: iat + ttl_secs,
        }
    }

    pub fn user_id(&self) -> Result<i32, AuthError> {
        self.sub.parse().map_err(|_| AuthError::Unauthenticated)
    }
}

pub fn now_unix() -> usize {
    chrono::Utc::now().timestamp().max(0) as usize
}

pub fn encode_session(keys: &SessionKeys, claims: &SessionClaims) -> Result<String, AuthError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
        .map_err(|err| AuthError::Internal(format!("session encoding failed: {err}")))
}

/// Any signature, format or expiry problem collapses into `Unauthenticated`.
pub fn decode_session(keys: &SessionKeys, token: &str) -> Result<SessionClaims, AuthError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<SessionClaims>(token, &keys.dec, &validation)
        .map(|data| data.claims)
        .map_err(|err| {
            tracing::debug!("rejected session token: {err}");
            AuthError::Unauthenticated
        })
}

/// Without `max_age` the cookie lives for the browser session only.
pub fn session_cookie(
    token: String,
    max_age: Option<time::Duration>,
    secure: bool,
) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure);
    if let Some(max_age) = max_age {
        builder = builder.max_age(max_age);
    }
    builder.build()
}

pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
