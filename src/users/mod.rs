//! User administration module

pub mod api;

pub use api::{UserApiState, user_api_router};
