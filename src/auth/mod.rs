pub mod password;
pub mod session;

pub use session::{SESSION_COOKIE, SessionClaims, SessionKeys};
