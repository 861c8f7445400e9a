use std::sync::Arc;

use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode, header},
    response::Response,
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use tower::ServiceExt; // for `oneshot`

use activity_finder::{
    db::entities::prelude::User,
    routes::router,
    state::AppState,
    test_helpers::{StubActivitySource, StubImageSource, memory_db, test_state},
};

async fn app() -> (Router, Arc<AppState>, DatabaseConnection) {
    let db = memory_db().await;
    let state = test_state(
        db.clone(),
        Arc::new(StubActivitySource::with_candidates(Vec::new())),
        Arc::new(StubImageSource::empty()),
    );
    (router(Arc::clone(&state)), state, db)
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn location(res: &Response) -> String {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn set_cookie(res: &Response) -> String {
    res.headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn register(app: &Router, username: &str, email: &str) -> Response {
    let body = format!(
        "username={username}&email={email}&password=password123&password2=password123"
    );
    app.clone()
        .oneshot(form_post("/register", &body))
        .await
        .unwrap()
}

async fn login(app: &Router, email: &str, password: &str, remember: bool) -> Response {
    let mut body = format!("email={email}&password={password}");
    if remember {
        body.push_str("&remember_me=y");
    }
    app.clone()
        .oneshot(form_post("/login", &body))
        .await
        .unwrap()
}

#[tokio::test]
async fn register_then_login_records_last_login() {
    let (app, _state, db) = app().await;

    let res = register(&app, "alice", "alice%40example.com").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(
        location(&res).starts_with("/?message=Congratulations"),
        "unexpected redirect: {}",
        location(&res)
    );

    let users = User::find().all(&db).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "alice");
    assert_ne!(users[0].password_hash, "password123");
    assert!(users[0].last_login.is_none());

    let res = login(&app, "alice%40example.com", "password123", false).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
    let cookie = set_cookie(&res);
    assert!(cookie.starts_with("session="), "cookie: {cookie}");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(!cookie.contains("Max-Age"));

    let first_login = User::find()
        .one(&db)
        .await
        .unwrap()
        .and_then(|user| user.last_login)
        .expect("last login recorded");

    login(&app, "alice%40example.com", "password123", false).await;
    let second_login = User::find()
        .one(&db)
        .await
        .unwrap()
        .and_then(|user| user.last_login)
        .expect("last login recorded");
    assert!(second_login >= first_login);
}

#[tokio::test]
async fn remember_me_sets_persistent_cookie() {
    let (app, _state, _db) = app().await;
    register(&app, "bob", "bob%40example.com").await;

    let res = login(&app, "bob%40example.com", "password123", true).await;
    assert!(set_cookie(&res).contains("Max-Age="));
}

#[tokio::test]
async fn duplicate_identity_is_rejected() {
    let (app, _state, db) = app().await;
    register(&app, "carol", "carol%40example.com").await;

    let same_username = register(&app, "carol", "other%40example.com").await;
    let same_email = register(&app, "caroline", "carol%40example.com").await;

    for res in [&same_username, &same_email] {
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(res),
            "/register?error=Username%20or%20email%20is%20already%20registered"
        );
    }
    assert_eq!(User::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn mismatched_passwords_are_rejected() {
    let (app, _state, db) = app().await;

    let res = app
        .clone()
        .oneshot(form_post(
            "/register",
            "username=dave&email=dave%40example.com&password=password123&password2=password456",
        ))
        .await
        .unwrap();

    assert_eq!(location(&res), "/register?error=Passwords%20do%20not%20match");
    assert_eq!(User::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn invalid_credentials_look_the_same() {
    let (app, _state, db) = app().await;
    register(&app, "erin", "erin%40example.com").await;

    let unknown = login(&app, "nobody%40example.com", "password123", false).await;
    let wrong = login(&app, "erin%40example.com", "wrong-password", false).await;

    assert_eq!(location(&unknown), "/login?error=Invalid%20email%20or%20password");
    assert_eq!(location(&unknown), location(&wrong));
    assert!(set_cookie(&unknown).is_empty());
    assert!(set_cookie(&wrong).is_empty());

    let user = User::find().one(&db).await.unwrap().expect("user exists");
    assert!(user.last_login.is_none());
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let (app, _state, _db) = app().await;

    let res = app
        .oneshot(
            Request::builder()
                .uri("/logout")
                .header(header::COOKIE, "session=anything")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
    let cookie = set_cookie(&res);
    assert!(cookie.starts_with("session="), "cookie: {cookie}");
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn favorites_require_a_session() {
    let (app, _state, _db) = app().await;

    let html = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/favorites")
                .header(header::ACCEPT, "text/html")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(html.status(), StatusCode::SEE_OTHER);
    assert!(location(&html).starts_with("/login?error="));

    let api = app
        .oneshot(
            Request::builder()
                .uri("/favorites")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(api.status(), StatusCode::UNAUTHORIZED);
    let body = body::to_bytes(api.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "error");
}

#[tokio::test]
async fn login_page_redirects_authenticated_users() {
    let (app, state, _db) = app().await;
    register(&app, "frank", "frank%40example.com").await;
    let user = state
        .services
        .user()
        .find_by_email("frank@example.com")
        .await
        .unwrap()
        .expect("registered");
    let token = state.services.auth().issue_session(user.id).unwrap();

    let res = app
        .oneshot(
            Request::builder()
                .uri("/login")
                .header(header::COOKIE, format!("session={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
}

#[tokio::test]
async fn home_page_renders_for_anonymous_visitors() {
    let (app, _state, _db) = app().await;

    let res = app
        .oneshot(
            Request::builder()
                .uri("/?message=Welcome%20back")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Welcome back"));
    assert!(html.contains("href=\"/login\""));
}
