pub mod activity_service;
pub mod aggregator;
pub mod auth_service;
pub mod context;
pub mod user_service;

pub use context::ServiceContext;
