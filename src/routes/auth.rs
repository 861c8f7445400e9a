use std::sync::Arc;

use axum::{
    Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::{
    auth::session::{removal_cookie, session_cookie},
    middleware::MaybeUser,
    routes::views::{Flash, HtmlError, LoginTemplate, RegisterTemplate, redirect_with, render},
    services::user_service::Registration,
    state::AppState,
};

pub const REGISTERED_MESSAGE: &str = "Congratulations, you are now a registered user!";
const GENERIC_FAILURE: &str = "Could not complete the request";

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Checkbox: present ("y", "on", "true") when ticked.
    #[serde(default)]
    pub remember_me: Option<String>,
}

impl LoginForm {
    fn remember(&self) -> bool {
        self.remember_me
            .as_deref()
            .map(|value| value.trim().to_ascii_lowercase())
            .is_some_and(|value| !matches!(value.as_str(), "" | "false" | "0" | "off"))
    }
}

pub async fn login_form(
    MaybeUser(user): MaybeUser,
    Query(flash): Query<Flash>,
) -> Result<Response, HtmlError> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    let page: Html<String> = render(&LoginTemplate {
        title: "Sign In",
        current_user: None,
        flash,
    })?;
    Ok(page.into_response())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = state.services.auth();
    match auth.login(&form.email, &form.password).await {
        Ok(session) => {
            let max_age = form
                .remember()
                .then(|| time::Duration::seconds(auth.ttl_secs() as i64));
            let cookie = session_cookie(session.token, max_age, state.config.general.production);
            (jar.add(cookie), Redirect::to("/")).into_response()
        }
        Err(err) if err.is_internal() => {
            tracing::error!("login failed: {err}");
            Redirect::to(&redirect_with("/login", "error", GENERIC_FAILURE)).into_response()
        }
        Err(err) => {
            Redirect::to(&redirect_with("/login", "error", &err.to_string())).into_response()
        }
    }
}

pub async fn register_form(
    MaybeUser(user): MaybeUser,
    Query(flash): Query<Flash>,
) -> Result<Response, HtmlError> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    let page: Html<String> = render(&RegisterTemplate {
        title: "Register",
        current_user: None,
        flash,
    })?;
    Ok(page.into_response())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(form): Form<Registration>,
) -> Redirect {
    match state.services.user().register(&form).await {
        Ok(_) => Redirect::to(&redirect_with("/", "message", REGISTERED_MESSAGE)),
        Err(err) if err.is_internal() => {
            tracing::error!("registration failed: {err}");
            Redirect::to(&redirect_with("/register", "error", GENERIC_FAILURE))
        }
        Err(err) => Redirect::to(&redirect_with("/register", "error", &err.to_string())),
    }
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.remove(removal_cookie()), Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::LoginForm;

    #[test]
    fn remember_me_checkbox_values() {
        let form = |value: Option<&str>| LoginForm {
            remember_me: value.map(str::to_string),
            ..LoginForm::default()
        };

        assert!(form(Some("y")).remember());
        assert!(form(Some("on")).remember());
        assert!(!form(Some("false")).remember());
        assert!(!form(None).remember());
    }
}
