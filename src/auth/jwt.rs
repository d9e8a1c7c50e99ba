//! Session token issuing and verification
//!
//! Signed HS256 tokens carrying the user's identity and role. Tokens expire
//! 24 hours after issuance and are never revoked server-side; there is no
//! refresh mechanism, so an expired token means a fresh login.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::models::{Role, User};

/// Default session token lifetime
const TOKEN_EXPIRATION_HOURS: i64 = 24;

/// Token configuration
#[derive(Clone)]
pub struct TokenConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration in hours
    pub expiration_hours: i64,
    /// Token issuer
    pub issuer: String,
}

impl TokenConfig {
    /// Create a new token configuration
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours: TOKEN_EXPIRATION_HOURS,
            issuer: "tienda".to_string(),
        }
    }

    /// Create config from environment variables
    pub fn from_env() -> Result<Self, JwtError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| JwtError::MissingSecret)?;

        let expiration_hours = std::env::var("JWT_EXPIRATION_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(TOKEN_EXPIRATION_HOURS);

        let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| "tienda".to_string());

        Ok(Self {
            secret,
            expiration_hours,
            issuer,
        })
    }

    /// Set token expiration
    pub fn expiration_hours(mut self, hours: i64) -> Self {
        self.expiration_hours = hours;
        self
    }

    /// Set issuer
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }
}

/// Token errors
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT_SECRET environment variable not set")]
    MissingSecret,

    #[error("Token encoding failed: {0}")]
    Encoding(String),

    #[error("Token decoding failed: {0}")]
    Decoding(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidToken
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidIssuer => JwtError::InvalidSignature,
            _ => JwtError::Decoding(err.to_string()),
        }
    }
}

/// Claims embedded in a session token: the user's identity and role as they
/// were at login. They are trusted for the token's lifetime and not
/// re-checked against the store per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Display name
    pub name: String,
    /// User email
    pub email: String,
    /// Account role at issuance
    pub role: Role,
    /// Shipping address
    pub address: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Get user ID as UUID
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::InvalidSignature)
    }

    /// Check whether the claims carry the admin role
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Token service for issuing and verifying session tokens
#[derive(Clone)]
pub struct TokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// Create a new token service
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Create token service from environment variables
    pub fn from_env() -> Result<Self, JwtError> {
        let config = TokenConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Issue a signed session token for a user.
    /// Returns the token and its expiration as a Unix timestamp.
    pub fn issue(&self, user: &User) -> Result<(String, i64), JwtError> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            address: user.address.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Encoding(e.to_string()))?;

        Ok((token, exp.timestamp()))
    }

    /// Verify a token's signature and expiry, returning the embedded claims
    /// unchanged on success
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        // Strict expiration checking
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_test_service() -> TokenService {
        TokenService::new(TokenConfig::new("test_secret_key_for_testing_only_32bytes!"))
    }

    fn sample_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Admin".to_string(),
            email: "admin@tienda.com".to_string(),
            password_hash: "$2b$12$irrelevant".to_string(),
            role,
            address: "Calle Principal 1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    // ========================================================================
    // TokenConfig Tests
    // ========================================================================

    #[test]
    fn test_token_config_new() {
        let config = TokenConfig::new("my_secret");

        assert_eq!(config.secret, "my_secret");
        assert_eq!(config.expiration_hours, TOKEN_EXPIRATION_HOURS);
        assert_eq!(config.issuer, "tienda");
    }

    #[test]
    fn test_token_config_builder() {
        let config = TokenConfig::new("secret")
            .expiration_hours(48)
            .issuer("my_shop");

        assert_eq!(config.expiration_hours, 48);
        assert_eq!(config.issuer, "my_shop");
    }

    #[test]
    fn test_token_config_from_env_missing_secret() {
        let original = std::env::var("JWT_SECRET").ok();
        // SAFETY: test environment
        unsafe { std::env::remove_var("JWT_SECRET") };

        let result = TokenConfig::from_env();
        assert!(matches!(result, Err(JwtError::MissingSecret)));

        if let Some(val) = original {
            // SAFETY: test environment
            unsafe { std::env::set_var("JWT_SECRET", val) };
        }
    }

    // ========================================================================
    // Issue / Verify Tests
    // ========================================================================

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = create_test_service();
        let user = sample_user(Role::Admin);

        let (token, exp) = service.issue(&user).unwrap();
        assert!(!token.is_empty());
        assert!(exp > Utc::now().timestamp());

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.name, "Admin");
        assert_eq!(claims.email, "admin@tienda.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.address, "Calle Principal 1");
        assert_eq!(claims.iss, "tienda");
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn test_claims_role_matches_stored_user_role() {
        let service = create_test_service();

        for role in [Role::Admin, Role::Customer] {
            let user = sample_user(role);
            let (token, _) = service.issue(&user).unwrap();
            let claims = service.verify(&token).unwrap();
            assert_eq!(claims.role, role);
        }
    }

    #[test]
    fn test_claims_user_id() {
        let service = create_test_service();
        let user = sample_user(Role::Customer);

        let (token, _) = service.issue(&user).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user.id);
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_expired_token() {
        // Negative expiration makes the token already expired when issued
        let service = TokenService::new(TokenConfig::new("test_secret").expiration_hours(-1));
        let user = sample_user(Role::Customer);

        let (token, _) = service.issue(&user).unwrap();

        let result = service.verify(&token);
        assert!(
            matches!(result, Err(JwtError::Expired)),
            "Expected Expired error, got: {:?}",
            result
        );
    }

    #[test]
    fn test_verify_wrong_secret() {
        let service1 = TokenService::new(TokenConfig::new("secret_one"));
        let service2 = TokenService::new(TokenConfig::new("secret_two"));

        let (token, _) = service1.issue(&sample_user(Role::Admin)).unwrap();

        let result = service2.verify(&token);
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_verify_wrong_issuer() {
        let service1 = TokenService::new(TokenConfig::new("shared_secret").issuer("tienda"));
        let service2 = TokenService::new(TokenConfig::new("shared_secret").issuer("otra"));

        let (token, _) = service1.issue(&sample_user(Role::Admin)).unwrap();

        let result = service2.verify(&token);
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_verify_garbage_token() {
        let service = create_test_service();

        let result = service.verify("not.a.token");
        assert!(result.is_err());
    }

    #[test]
    fn test_claims_returned_unchanged() {
        // verify() must hand back exactly what was embedded, not re-derive it
        let service = create_test_service();
        let mut user = sample_user(Role::Customer);
        user.address = "Av. del Puerto 99".to_string();

        let (token, _) = service.issue(&user).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.address, "Av. del Puerto 99");
    }

    // ========================================================================
    // Error Tests
    // ========================================================================

    #[test]
    fn test_jwt_error_display() {
        assert_eq!(
            format!("{}", JwtError::MissingSecret),
            "JWT_SECRET environment variable not set"
        );
        assert_eq!(format!("{}", JwtError::Expired), "Token expired");
        assert_eq!(
            format!("{}", JwtError::InvalidSignature),
            "Invalid token signature"
        );
    }
}
