pub mod auth;
mod entry;
pub mod favorites;
pub mod home;
pub mod views;

pub use entry::router;
