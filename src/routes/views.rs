use askama::Template;
use axum::{http::StatusCode, response::Html};
use serde::Deserialize;

use crate::{db::entities::activity, middleware::SessionUser, upstream::Category};

pub(crate) type HtmlError = (StatusCode, Html<String>);

/// One-shot messages carried on redirects as `?error=` / `?message=`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Flash {
    pub error: Option<String>,
    pub message: Option<String>,
}

pub(crate) fn redirect_with(path: &str, key: &str, text: &str) -> String {
    format!("{path}?{key}={}", urlencoding::encode(text))
}

#[derive(Template)]
#[template(path = "home.html")]
pub(crate) struct HomeTemplate {
    pub title: &'static str,
    pub current_user: Option<SessionUser>,
    pub flash: Flash,
    pub categories: Vec<(&'static str, &'static str)>,
    pub participants: u32,
}

impl HomeTemplate {
    pub fn new(current_user: Option<SessionUser>, flash: Flash) -> Self {
        let mut categories = vec![("", "All")];
        categories.extend(
            Category::ALL
                .iter()
                .map(|category| (category.as_str(), category.label())),
        );
        Self {
            title: "Home",
            current_user,
            flash,
            categories,
            participants: 1,
        }
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub(crate) struct LoginTemplate {
    pub title: &'static str,
    pub current_user: Option<SessionUser>,
    pub flash: Flash,
}

#[derive(Template)]
#[template(path = "register.html")]
pub(crate) struct RegisterTemplate {
    pub title: &'static str,
    pub current_user: Option<SessionUser>,
    pub flash: Flash,
}

#[derive(Template)]
#[template(path = "favorites.html")]
pub(crate) struct FavoritesTemplate {
    pub title: &'static str,
    pub current_user: Option<SessionUser>,
    pub flash: Flash,
    pub activities: Vec<activity::Model>,
}

pub(crate) fn render<T: Template>(template: &T) -> Result<Html<String>, HtmlError> {
    template.render().map(Html).map_err(|err| {
        tracing::error!("template rendering failed: {err}");
        html_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to render page")
    })
}

pub(crate) fn html_error(status: StatusCode, message: &'static str) -> HtmlError {
    (status, Html(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{Flash, HomeTemplate, redirect_with, render};

    #[test]
    fn redirect_encodes_the_message() {
        assert_eq!(
            redirect_with("/login", "error", "Invalid email or password"),
            "/login?error=Invalid%20email%20or%20password"
        );
    }

    #[test]
    fn home_lists_all_plus_every_category() {
        let template = HomeTemplate::new(None, Flash::default());
        assert_eq!(template.categories.len(), 10);
        assert_eq!(template.categories[0], ("", "All"));

        let html = render(&template).expect("renders").0;
        assert!(html.contains("value=\"busywork\""));
    }

    #[test]
    fn flash_error_is_escaped() {
        let template = HomeTemplate::new(
            None,
            Flash {
                error: Some("<b>bad</b>".to_string()),
                message: None,
            },
        );
        let html = render(&template).expect("renders").0;
        assert!(html.contains("bad"));
        assert!(!html.contains("<b>bad</b>"));
    }
}
