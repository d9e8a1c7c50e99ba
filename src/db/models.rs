//! Database models for the storefront
//!
//! This module defines the entity structs that map to the `usuarios` and
//! `productos` PostgreSQL tables.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Helper module for deserializing Option<Option<T>> where:
/// - Missing field -> None (don't update)
/// - Field with null -> Some(None) (set to null)
/// - Field with value -> Some(Some(value)) (set to value)
pub mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        // Only called when the field is present, so wrap the result in Some()
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

// ============================================================================
// Role
// ============================================================================

/// Account role; admins may mutate products and manage users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Customer,
}

impl Role {
    /// Parse a role from its wire representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "customer" => Some(Role::Customer),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Customer => write!(f, "customer"),
        }
    }
}

// ============================================================================
// User Model
// ============================================================================

/// User entity backing the credential store (`usuarios` table)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User data for updates; `None` fields are left unchanged.
/// A supplied `password` is hashed before persisting.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
}

/// User without the password hash (for API responses)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            address: user.address,
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Product Model
// ============================================================================

/// Product entity (`productos` table)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product data for creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Product data for updates
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option::deserialize")]
    pub image_url: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            role: Role::Customer,
            address: "Av. Siempre Viva 742".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    // ========================================================================
    // Role Tests
    // ========================================================================

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("customer"), Some(Role::Customer));
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("Admin"), None);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::Customer.to_string(), "customer");
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        assert_eq!(
            serde_json::to_string(&Role::Customer).unwrap(),
            r#""customer""#
        );
    }

    #[test]
    fn test_role_deserialization() {
        let role: Role = serde_json::from_str(r#""admin""#).unwrap();
        assert_eq!(role, Role::Admin);

        let result = serde_json::from_str::<Role>(r#""root""#);
        assert!(result.is_err());
    }

    // ========================================================================
    // User Tests
    // ========================================================================

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = sample_user();
        let json = serde_json::to_string(&user).unwrap();

        assert!(json.contains("ana@example.com"));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$2b$12$secret"));
    }

    #[test]
    fn test_user_response_from_user() {
        let user = sample_user();
        let id = user.id;
        let response: UserResponse = user.into();

        assert_eq!(response.id, id);
        assert_eq!(response.name, "Ana");
        assert_eq!(response.email, "ana@example.com");
        assert_eq!(response.role, Role::Customer);
    }

    // ========================================================================
    // Update DTO Tests
    // ========================================================================

    #[test]
    fn test_update_user_partial_deserialization() {
        let json = r#"{"email": "nueva@example.com"}"#;
        let update: UpdateUser = serde_json::from_str(json).unwrap();

        assert_eq!(update.email, Some("nueva@example.com".to_string()));
        assert!(update.name.is_none());
        assert!(update.role.is_none());
        assert!(update.password.is_none());
    }

    #[test]
    fn test_update_product_double_option() {
        // Missing field -> don't update
        let update: UpdateProduct = serde_json::from_str(r#"{"name": "Caja"}"#).unwrap();
        assert_eq!(update.name, Some("Caja".to_string()));
        assert_eq!(update.description, None);

        // Explicit null -> clear the column
        let update: UpdateProduct = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(update.description, Some(None));

        // Value -> set the column
        let update: UpdateProduct =
            serde_json::from_str(r#"{"description": "de madera"}"#).unwrap();
        assert_eq!(update.description, Some(Some("de madera".to_string())));
    }

    #[test]
    fn test_create_product_deserialization() {
        let json = r#"{
            "name": "Lampara",
            "price": "49.90",
            "category": "hogar"
        }"#;

        let create: CreateProduct = serde_json::from_str(json).unwrap();
        assert_eq!(create.name, "Lampara");
        assert_eq!(create.price, Decimal::new(4990, 2));
        assert_eq!(create.category, "hogar");
        assert!(create.description.is_none());
        assert!(create.image_url.is_none());
    }
}
