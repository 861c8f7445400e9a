use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::Html,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    middleware::SessionUser,
    response::{StatusResponse, StatusResult},
    routes::views::{FavoritesTemplate, Flash, HtmlError, html_error, render},
    services::activity_service::{ActivityError, NewActivity},
    state::AppState,
};

const INVALID_FORMAT: &str = "Invalid request format";

#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub id: i64,
}

pub async fn favorites(
    user: SessionUser,
    State(state): State<Arc<AppState>>,
    Query(flash): Query<Flash>,
) -> Result<Html<String>, HtmlError> {
    let activities = state
        .services
        .activity()
        .list_for_user(user.id)
        .await
        .map_err(|err| {
            tracing::error!(user_id = user.id, "listing favorites failed: {err}");
            html_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to load favorites")
        })?;

    render(&FavoritesTemplate {
        title: "Favorites",
        current_user: Some(user),
        flash,
        activities,
    })
}

pub async fn save_activity(
    user: SessionUser,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewActivity>, JsonRejection>,
) -> StatusResult {
    let Json(input) = payload.map_err(|rejection| {
        tracing::debug!("rejected save payload: {rejection}");
        AppError::bad_request(INVALID_FORMAT)
    })?;

    state
        .services
        .activity()
        .save(user.id, &input)
        .await
        .map_err(log_store_error)?;
    Ok(Json(StatusResponse::success()))
}

pub async fn remove_activity(
    user: SessionUser,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RemoveRequest>, JsonRejection>,
) -> StatusResult {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("rejected remove payload: {rejection}");
        AppError::bad_request(INVALID_FORMAT)
    })?;

    let Ok(activity_id) = i32::try_from(request.id) else {
        return Err(ActivityError::NotFound.into());
    };
    state
        .services
        .activity()
        .remove(activity_id, user.id)
        .await
        .map_err(log_store_error)?;
    Ok(Json(StatusResponse::success()))
}

fn log_store_error(err: ActivityError) -> AppError {
    if let ActivityError::Store(inner) = &err {
        tracing::error!("activity store failed: {inner}");
    }
    err.into()
}
