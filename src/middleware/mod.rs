pub mod guards;
mod panic;

pub use guards::{MaybeUser, SessionRejection, SessionUser};
pub use panic::{catch_panic_layer, favorites_panic_layer};
