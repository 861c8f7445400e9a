use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::response::StatusResponse;

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_to_500)
}

/// Favorites endpoints answer every failure with 400, panics included.
pub fn favorites_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_to_400)
}

fn panic_to_500(panic: Box<dyn Any + Send + 'static>) -> Response {
    panic_response(StatusCode::INTERNAL_SERVER_ERROR, panic)
}

fn panic_to_400(panic: Box<dyn Any + Send + 'static>) -> Response {
    panic_response(StatusCode::BAD_REQUEST, panic)
}

fn panic_response(status: StatusCode, panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic"
    };
    tracing::error!(status = status.as_u16(), "handler panicked: {details}");

    let client_message = if status.is_server_error() && cfg!(debug_assertions) {
        format!("internal server error: {details}")
    } else if status.is_server_error() {
        "internal server error".to_string()
    } else {
        "Could not complete the request".to_string()
    };

    (status, Json(StatusResponse::error(client_message))).into_response()
}
