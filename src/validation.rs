//! Input validation for the two persisted entities
//!
//! One consolidated validation layer shared by every handler, instead of
//! ad-hoc checks duplicated per route. Validators return the parsed value
//! where parsing is part of validation (e.g. the role string).

use rust_decimal::Decimal;

use crate::db::models::Role;

/// Maximum length for names and categories
pub const MAX_NAME_LENGTH: usize = 255;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A rejected input, carrying the user-facing message
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

fn fail(message: impl Into<String>) -> ValidationError {
    ValidationError(message.into())
}

/// Require a non-blank field
fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(fail(format!("{field} is required")));
    }
    Ok(())
}

fn validate_name(field: &str, value: &str) -> Result<(), ValidationError> {
    require(field, value)?;
    if value.len() > MAX_NAME_LENGTH {
        return Err(fail(format!(
            "{field} too long (max {MAX_NAME_LENGTH} characters)"
        )));
    }
    Ok(())
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(fail("invalid email format"));
    }

    // Check for valid structure: something@something.something
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(fail("invalid email format"));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(fail("invalid email format"));
    }

    if !domain.contains('.') {
        return Err(fail("invalid email format"));
    }

    // Check domain has something on each side of every dot
    let domain_parts: Vec<&str> = domain.split('.').collect();
    if domain_parts.iter().any(|p| p.is_empty()) {
        return Err(fail("invalid email format"));
    }

    Ok(())
}

/// Validate password length
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(fail(format!(
            "password too short (minimum {MIN_PASSWORD_LENGTH} characters)"
        )));
    }
    Ok(())
}

fn parse_role(role: &str) -> Result<Role, ValidationError> {
    Role::parse(role).ok_or_else(|| fail("role must be 'admin' or 'customer'"))
}

fn validate_price(price: Decimal) -> Result<(), ValidationError> {
    if price <= Decimal::ZERO {
        return Err(fail("price must be greater than zero"));
    }
    Ok(())
}

// ============================================================================
// Entity validators
// ============================================================================

/// Validate a user creation request; returns the parsed role
pub fn validate_new_user(
    name: &str,
    email: &str,
    password: &str,
    role: &str,
    address: &str,
) -> Result<Role, ValidationError> {
    validate_name("name", name)?;
    require("email", email)?;
    validate_email(email)?;
    require("password", password)?;
    validate_password(password)?;
    require("role", role)?;
    require("address", address)?;
    parse_role(role)
}

/// Validate a user update request; returns the parsed role when present
pub fn validate_user_update(
    name: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
    role: Option<&str>,
    address: Option<&str>,
) -> Result<Option<Role>, ValidationError> {
    if let Some(name) = name {
        validate_name("name", name)?;
    }
    if let Some(email) = email {
        validate_email(email)?;
    }
    if let Some(password) = password {
        validate_password(password)?;
    }
    if let Some(address) = address {
        require("address", address)?;
    }

    role.map(parse_role).transpose()
}

/// Validate a product creation request; returns the price
pub fn validate_new_product(
    name: &str,
    price: Option<Decimal>,
    category: &str,
) -> Result<Decimal, ValidationError> {
    validate_name("name", name)?;
    validate_name("category", category)?;

    let price = price.ok_or_else(|| fail("price is required"))?;
    validate_price(price)?;

    Ok(price)
}

/// Validate a product update request
pub fn validate_product_update(
    name: Option<&str>,
    price: Option<Decimal>,
    category: Option<&str>,
) -> Result<(), ValidationError> {
    if let Some(name) = name {
        validate_name("name", name)?;
    }
    if let Some(category) = category {
        validate_name("category", category)?;
    }
    if let Some(price) = price {
        validate_price(price)?;
    }
    Ok(())
}
