pub mod activity_dao;
pub mod base;
mod context;
pub mod error;
pub mod user_dao;

pub use activity_dao::{ActivityDao, OwnedDelete};
pub use base::DaoBase;
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use user_dao::UserDao;
