//! Authentication module
//!
//! - Session token issuing and validation (`jwt`)
//! - Login business logic (`service`)
//! - Access guard for protected routes (`guard`)
//! - REST endpoints for login and the current user (`api`)

pub mod api;
pub mod guard;
pub mod jwt;
pub mod service;

pub use api::{AuthApiState, auth_api_router};
pub use guard::{AdminClaims, CurrentClaims, extract_bearer_token, require_admin, require_claims};
pub use jwt::{Claims, JwtError, TokenConfig, TokenService};
pub use service::{AuthError, AuthService, LoginRequest, LoginResponse};
