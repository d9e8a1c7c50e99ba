//! Product catalog module

pub mod api;

pub use api::{ProductApiState, product_api_router};
