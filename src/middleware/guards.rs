use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    auth::SESSION_COOKIE, db::entities::user, error::AppError,
    services::auth_service::AuthError, state::AppState,
};

/// The authenticated user of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<user::Model> for SessionUser {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Session user when one is present; never rejects.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<SessionUser>);

/// Browsers are sent to the login page, API clients get a JSON 401.
#[derive(Debug)]
pub enum SessionRejection {
    Login(String),
    Api(AppError),
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        match self {
            SessionRejection::Login(message) => {
                Redirect::to(&format!("/login?error={}", urlencoding::encode(&message)))
                    .into_response()
            }
            SessionRejection::Api(err) => err.into_response(),
        }
    }
}

pub(crate) fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase().contains("text/html"))
        .unwrap_or(false)
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = CookieJar::from_headers(headers).get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

async fn resolve(parts: &mut Parts, state: &Arc<AppState>) -> Result<SessionUser, AuthError> {
    if let Some(user) = parts.extensions.get::<SessionUser>().cloned() {
        return Ok(user);
    }

    let token = session_token(&parts.headers).ok_or(AuthError::Unauthenticated)?;
    let user = SessionUser::from(state.services.auth().authenticate(&token).await?);
    parts.extensions.insert(user.clone());
    Ok(user)
}

impl FromRequestParts<Arc<AppState>> for SessionUser {
    type Rejection = SessionRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match resolve(parts, state).await {
            Ok(user) => Ok(user),
            Err(err) if err.is_internal() => {
                tracing::error!("session lookup failed: {err}");
                Err(SessionRejection::Api(AppError::bad_request(
                    "Could not complete the request",
                )))
            }
            Err(err) if accepts_html(&parts.headers) => {
                Err(SessionRejection::Login(err.to_string()))
            }
            Err(_) => Err(SessionRejection::Api(AppError::from(
                AuthError::Unauthenticated,
            ))),
        }
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match resolve(parts, state).await {
            Ok(user) => Ok(MaybeUser(Some(user))),
            Err(err) if err.is_internal() => {
                tracing::error!("session lookup failed: {err}");
                Ok(MaybeUser(None))
            }
            Err(_) => Ok(MaybeUser(None)),
        }
    }
}
