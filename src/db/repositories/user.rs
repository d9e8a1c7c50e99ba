//! User repository backing the credential store
//!
//! CRUD operations on the `usuarios` table with bcrypt password hashing.
//! Passwords are only ever compared through the salted one-way hash; plain
//! text never reaches the database.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{Role, UpdateUser, User};

/// Cost factor for bcrypt hashing (12 is recommended for production)
const BCRYPT_COST: u32 = 12;

/// User repository error types
#[derive(Debug, thiserror::Error)]
pub enum UserRepositoryError {
    #[error("User not found")]
    NotFound,

    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Hash a password using bcrypt with automatic salt generation
    pub fn hash_password(password: &str) -> Result<String, UserRepositoryError> {
        bcrypt::hash(password, BCRYPT_COST)
            .map_err(|e| UserRepositoryError::HashingError(e.to_string()))
    }

    /// Verify a password against a bcrypt hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, UserRepositoryError> {
        bcrypt::verify(password, hash).map_err(|e| UserRepositoryError::HashingError(e.to_string()))
    }

    /// Create a new user with a plain text password (will be hashed)
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
        address: &str,
    ) -> Result<User, UserRepositoryError> {
        if self.find_by_email(email).await?.is_some() {
            return Err(UserRepositoryError::EmailAlreadyExists);
        }

        let password_hash = Self::hash_password(password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO usuarios (name, email, password_hash, role, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, role, address, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .bind(role)
        .bind(address)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, address, created_at, updated_at
            FROM usuarios
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, address, created_at, updated_at
            FROM usuarios
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// List all users, newest first
    pub async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, address, created_at, updated_at
            FROM usuarios
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Update a user; `None` fields are left unchanged
    pub async fn update(
        &self,
        id: Uuid,
        updates: &UpdateUser,
    ) -> Result<User, UserRepositoryError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(UserRepositoryError::NotFound);
        }

        // Re-check email uniqueness if the email is changing
        if let Some(ref email) = updates.email
            && let Some(existing) = self.find_by_email(email).await?
            && existing.id != id
        {
            return Err(UserRepositoryError::EmailAlreadyExists);
        }

        // Hash new password if provided
        let password_hash = match &updates.password {
            Some(password) => Some(Self::hash_password(password)?),
            None => None,
        };

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE usuarios
            SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                address = COALESCE($4, address),
                role = COALESCE($5, role),
                password_hash = COALESCE($6, password_hash),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, password_hash, role, address, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&updates.name)
        .bind(&updates.email)
        .bind(&updates.address)
        .bind(updates.role)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Delete a user by ID
    pub async fn delete(&self, id: Uuid) -> Result<bool, UserRepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM usuarios
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Authenticate a user by email and password.
    /// Returns the user if credentials are valid, None otherwise
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let user = match self.find_by_email(email).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        let is_valid = Self::verify_password(password, &user.password_hash)?;

        if is_valid { Ok(Some(user)) } else { Ok(None) }
    }
}
