//! Access guard for protected routes
//!
//! Extracts the bearer token from the Authorization header, verifies it, and
//! hands the claims to the handler. A missing token is Unauthorized (401); a
//! token that fails verification, or a verified token without the required
//! role, is Forbidden (403).
//!
//! The `CurrentClaims`/`AdminClaims` extractors run before the request body
//! is touched, so an unauthenticated request is rejected regardless of its
//! payload.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};

use crate::auth::jwt::{Claims, TokenService};
use crate::error::AppError;

/// Extract the bearer token from the Authorization header.
/// Absent header, wrong scheme, or empty token all count as "no token".
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("token required".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("token required".to_string()))?;

    if token.is_empty() {
        return Err(AppError::Unauthorized("token required".to_string()));
    }

    Ok(token.to_string())
}

/// Require a valid token; returns the verified claims
pub fn require_claims(
    token_service: &TokenService,
    headers: &HeaderMap,
) -> Result<Claims, AppError> {
    let token = extract_bearer_token(headers)?;
    let claims = token_service.verify(&token)?;
    Ok(claims)
}

/// Require a valid token carrying the admin role
pub fn require_admin(
    token_service: &TokenService,
    headers: &HeaderMap,
) -> Result<Claims, AppError> {
    let claims = require_claims(token_service, headers)?;

    if !claims.is_admin() {
        return Err(AppError::Forbidden(
            "administrator role required".to_string(),
        ));
    }

    Ok(claims)
}

/// Extractor for routes that require any authenticated user
pub struct CurrentClaims(pub Claims);

impl<S> FromRequestParts<S> for CurrentClaims
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token_service = TokenService::from_ref(state);
        let claims = require_claims(&token_service, &parts.headers)?;
        Ok(Self(claims))
    }
}

/// Extractor for admin-only routes
pub struct AdminClaims(pub Claims);

impl<S> FromRequestParts<S> for AdminClaims
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token_service = TokenService::from_ref(state);
        let claims = require_admin(&token_service, &parts.headers)?;
        Ok(Self(claims))
    }
}
