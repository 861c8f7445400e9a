use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::{middleware::favorites_panic_layer, state::AppState};

use super::{auth, favorites, home};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home::index).post(home::fetch_activity))
        .route("/index", get(home::index).post(home::fetch_activity))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/logout", get(auth::logout))
        .route("/favorites", get(favorites::favorites))
        .route(
            "/save_activity",
            post(favorites::save_activity).layer(favorites_panic_layer()),
        )
        .route(
            "/remove_activity",
            post(favorites::remove_activity).layer(favorites_panic_layer()),
        )
        .with_state(state)
}
