//! Product repository
//!
//! CRUD operations on the `productos` table. Every operation is a single
//! SQL statement; there are no multi-statement transactions to coordinate.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{CreateProduct, Product, UpdateProduct};

/// Product repository error types
#[derive(Debug, thiserror::Error)]
pub enum ProductRepositoryError {
    #[error("Product not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Product repository for database operations
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all products, newest first
    pub async fn list(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, category, description, image_url, created_at, updated_at
            FROM productos
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Find a product by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, ProductRepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, category, description, image_url, created_at, updated_at
            FROM productos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, dto: &CreateProduct) -> Result<Product, ProductRepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO productos (name, price, category, description, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, price, category, description, image_url, created_at, updated_at
            "#,
        )
        .bind(&dto.name)
        .bind(dto.price)
        .bind(&dto.category)
        .bind(&dto.description)
        .bind(&dto.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    /// Update a product; `None` fields are left unchanged, `Some(None)` on
    /// the nullable columns clears them
    pub async fn update(
        &self,
        id: Uuid,
        updates: &UpdateProduct,
    ) -> Result<Product, ProductRepositoryError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or(ProductRepositoryError::NotFound)?;

        // Resolve the nullable columns up front; COALESCE cannot express
        // "set to null"
        let description = match &updates.description {
            Some(value) => value.clone(),
            None => current.description.clone(),
        };
        let image_url = match &updates.image_url {
            Some(value) => value.clone(),
            None => current.image_url.clone(),
        };

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE productos
            SET
                name = COALESCE($2, name),
                price = COALESCE($3, price),
                category = COALESCE($4, category),
                description = $5,
                image_url = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, price, category, description, image_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&updates.name)
        .bind(updates.price)
        .bind(&updates.category)
        .bind(&description)
        .bind(&image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    /// Delete a product by ID
    pub async fn delete(&self, id: Uuid) -> Result<bool, ProductRepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM productos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
