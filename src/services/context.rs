use sea_orm::DatabaseConnection;

use crate::{
    auth::SessionKeys,
    config::SessionConfig,
    db::dao::DaoContext,
    services::{
        activity_service::ActivityService, aggregator::ActivityAggregator,
        auth_service::AuthService, user_service::UserService,
    },
};

/// Everything handlers need, built once at startup.
#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
    session_keys: SessionKeys,
    session_ttl_secs: usize,
    aggregator: ActivityAggregator,
}

impl ServiceContext {
    pub fn new(
        db: &DatabaseConnection,
        session: &SessionConfig,
        aggregator: ActivityAggregator,
    ) -> Self {
        let ttl_secs = usize::try_from(session.ttl_hours.saturating_mul(3_600)).unwrap_or(0);
        Self {
            daos: DaoContext::new(db),
            session_keys: SessionKeys::from_secret(session.secret.as_bytes()),
            session_ttl_secs: ttl_secs,
            aggregator,
        }
    }

    pub fn user(&self) -> UserService {
        UserService::new(self.daos.user())
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.user(), self.session_keys.clone(), self.session_ttl_secs)
    }

    pub fn activity(&self) -> ActivityService {
        ActivityService::new(self.daos.activity())
    }

    pub fn aggregator(&self) -> &ActivityAggregator {
        &self.aggregator
    }
}
