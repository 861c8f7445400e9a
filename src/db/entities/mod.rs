#[allow(unused_imports)]
pub mod prelude {
    pub use super::activity::Entity as Activity;
    pub use super::user::Entity as User;
}

pub mod activity;
pub mod user;
