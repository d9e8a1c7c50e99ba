//! Authentication service
//!
//! Business logic for login: validate credentials against the credential
//! store, then issue a session token. Unknown email and wrong password are
//! indistinguishable to the caller.

use uuid::Uuid;

use crate::auth::jwt::{JwtError, TokenService};
use crate::db::models::UserResponse;
use crate::db::repositories::{UserRepository, UserRepositoryError};

/// Authentication service error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UserRepositoryError> for AuthError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::NotFound => AuthError::UserNotFound,
            other => AuthError::Internal(other.to_string()),
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        // Failing to sign a token is never a credentials problem
        AuthError::Internal(err.to_string())
    }
}

/// Login request data
#[derive(Debug, Clone, serde::Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Successful login response: the token and the user it identifies
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
    pub expires_at: i64,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    token_service: TokenService,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(user_repo: UserRepository, token_service: TokenService) -> Self {
        Self {
            user_repo,
            token_service,
        }
    }

    /// Login an existing user.
    ///
    /// Start → email found? → password matches? → issue token. Both failure
    /// branches collapse to `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let user = self
            .user_repo
            .authenticate(email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let (token, expires_at) = self.token_service.issue(&user)?;

        Ok(LoginResponse {
            token,
            user: user.into(),
            expires_at,
        })
    }

    /// Look up the current user for verified claims
    pub async fn current_user(&self, user_id: Uuid) -> Result<UserResponse, AuthError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user.into())
    }
}
