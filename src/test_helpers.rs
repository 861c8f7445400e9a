//! Fixtures shared by unit and integration tests.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::Router;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::{
    config::AppConfig,
    db::connection::sync_schema,
    routes::router,
    services::{ServiceContext, aggregator::ActivityAggregator},
    state::AppState,
    upstream::{ActivitySource, Candidate, Category, ImageSource, UpstreamError},
};

pub const TEST_SESSION_SECRET: &str = "test-session-secret";

pub fn candidate(activity: &str, category: &str, participants: u32) -> Candidate {
    Candidate {
        activity: activity.to_string(),
        category: category.to_string(),
        participants,
    }
}

type ActivityRequest = (Option<Category>, Option<u32>);

/// Activity source answering every call with the same canned result.
pub struct StubActivitySource {
    result: Result<Vec<Candidate>, UpstreamError>,
    requests: Mutex<Vec<ActivityRequest>>,
}

impl StubActivitySource {
    pub fn with_candidates(candidates: Vec<Candidate>) -> Self {
        Self {
            result: Ok(candidates),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: UpstreamError) -> Self {
        Self {
            result: Err(err),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ActivityRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl ActivitySource for StubActivitySource {
    async fn candidates(
        &self,
        category: Option<Category>,
        participants: Option<u32>,
    ) -> Result<Vec<Candidate>, UpstreamError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push((category, participants));
        self.result.clone()
    }
}

/// Image source that records the queries it receives.
pub struct StubImageSource {
    result: Result<Option<String>, UpstreamError>,
    queries: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl StubImageSource {
    pub fn with_url(url: &str) -> Self {
        Self::new(Ok(Some(url.to_string())))
    }

    pub fn empty() -> Self {
        Self::new(Ok(None))
    }

    pub fn failing(err: UpstreamError) -> Self {
        Self::new(Err(err))
    }

    fn new(result: Result<Option<String>, UpstreamError>) -> Self {
        Self {
            result,
            queries: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("queries lock").clone()
    }
}

#[async_trait]
impl ImageSource for StubImageSource {
    async fn find_image(&self, query: &str) -> Result<Option<String>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .expect("queries lock")
            .push(query.to_string());
        self.result.clone()
    }
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.session.secret = TEST_SESSION_SECRET.to_string();
    cfg
}

/// A single-connection in-memory SQLite database with the schema applied.
pub async fn memory_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("connect to in-memory sqlite");
    sync_schema(&db).await.expect("sync schema");
    db
}

pub fn test_state(
    db: DatabaseConnection,
    activities: Arc<dyn ActivitySource>,
    images: Arc<dyn ImageSource>,
) -> Arc<AppState> {
    let cfg = test_config();
    let aggregator = ActivityAggregator::new(activities, images);
    let services = ServiceContext::new(&db, &cfg.session, aggregator);
    AppState::new(cfg, db, services)
}

pub fn test_router(
    db: DatabaseConnection,
    activities: Arc<dyn ActivitySource>,
    images: Arc<dyn ImageSource>,
) -> Router {
    router(test_state(db, activities, images))
}
