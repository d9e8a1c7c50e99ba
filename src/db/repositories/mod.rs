//! Database repositories
//!
//! Repositories encapsulate data access for the two persisted tables and
//! provide a clean API for business logic to interact with the database.

pub mod product;
pub mod user;

pub use product::{ProductRepository, ProductRepositoryError};
pub use user::{UserRepository, UserRepositoryError};
