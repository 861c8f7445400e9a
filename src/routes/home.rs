use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Query, State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    middleware::MaybeUser,
    response::ErrorBody,
    routes::views::{Flash, HomeTemplate, HtmlError, render},
    services::aggregator::{AggregatorError, Suggestion},
    state::AppState,
    upstream::Category,
};

/// Filter form as posted by the home page. Blank fields mean "any".
#[derive(Debug, Default, Deserialize)]
pub struct FilterForm {
    #[serde(rename = "type", default)]
    pub activity_type: String,
    #[serde(default)]
    pub participants: String,
}

impl FilterForm {
    fn parse(&self) -> Result<(Option<Category>, Option<u32>), String> {
        let category = match self.activity_type.trim() {
            "" => None,
            raw if raw.eq_ignore_ascii_case("all") => None,
            raw => Some(raw.parse::<Category>()?),
        };

        let participants = match self.participants.trim() {
            "" => None,
            raw => match raw.parse::<u32>() {
                Ok(count) if count >= 1 => Some(count),
                _ => return Err("Participants must be a positive number".to_string()),
            },
        };

        Ok((category, participants))
    }
}

#[derive(Debug, Serialize)]
struct SuggestionResponse {
    activity: Suggestion,
    image_url: Option<String>,
}

pub async fn index(
    MaybeUser(user): MaybeUser,
    Query(flash): Query<Flash>,
) -> Result<Html<String>, HtmlError> {
    render(&HomeTemplate::new(user, flash))
}

pub async fn fetch_activity(
    State(state): State<Arc<AppState>>,
    form: Result<Form<FilterForm>, FormRejection>,
) -> Response {
    let Ok(Form(form)) = form else {
        return ErrorBody::response(StatusCode::BAD_REQUEST, "Invalid request format");
    };
    let (category, participants) = match form.parse() {
        Ok(filters) => filters,
        Err(message) => return ErrorBody::response(StatusCode::BAD_REQUEST, message),
    };

    match state
        .services
        .aggregator()
        .get_suggestion(category, participants)
        .await
    {
        Ok(suggestion) => {
            let image_url = suggestion.image_url.clone();
            Json(SuggestionResponse {
                activity: suggestion,
                image_url,
            })
            .into_response()
        }
        Err(err @ AggregatorError::NoMatchingActivity { .. }) => {
            ErrorBody::response(StatusCode::NOT_FOUND, err.to_string())
        }
        Err(err @ AggregatorError::Upstream(_)) => {
            ErrorBody::response(StatusCode::BAD_GATEWAY, err.to_string())
        }
    }
}
