//! # Category Repository
//!
//! Database operations for product categories.
//!
//! `name` and `slug` each carry their own UNIQUE index. Nothing here
//! derives a slug from a name; both are taken as given.

use std::sync::Arc;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use storefront_core::{Category, NewCategory, ObjectId, RegisteredModel};

use super::{new_document, parse_id};
use crate::error::{DbError, DbResult};

const ENTITY: &str = "Category";

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
    model: Arc<RegisteredModel>,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository bound to the registered Category
    /// model.
    pub fn new(pool: SqlitePool, model: Arc<RegisteredModel>) -> Self {
        CategoryRepository { pool, model }
    }

    /// Creates a category. A missing image becomes `""`.
    ///
    /// ## Returns
    /// * `Ok(Category)` - Persisted category
    /// * `Err(DbError::Validation)` - Empty name or slug
    /// * `Err(DbError::UniqueViolation)` - Name or slug already taken
    pub async fn create(&self, input: &NewCategory) -> DbResult<Category> {
        debug!(name = %input.name, slug = %input.slug, "Creating category");

        let doc = new_document(ENTITY, input, ObjectId::new(), None)?;
        let category: Category = self.model.hydrate(doc)?;

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, slug, image)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(category.id.to_string())
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.image)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_key(e, &category))?;

        Ok(category)
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: ObjectId) -> DbResult<Option<Category>> {
        let row = sqlx::query("SELECT id, name, slug, image FROM categories WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_category).transpose()
    }

    /// Gets a category by its slug.
    pub async fn get_by_slug(&self, slug: &str) -> DbResult<Option<Category>> {
        let row = sqlx::query("SELECT id, name, slug, image FROM categories WHERE slug = ?1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_category).transpose()
    }

    /// Lists all categories ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name, slug, image FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        let categories = rows
            .into_iter()
            .map(row_to_category)
            .collect::<DbResult<Vec<_>>>()?;

        debug!(count = categories.len(), "Listed categories");
        Ok(categories)
    }

    /// Updates an existing category.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Category doesn't exist
    pub async fn update(&self, category: &Category) -> DbResult<()> {
        debug!(id = %category.id, "Updating category");

        self.model.check(category)?;

        let result = sqlx::query(
            r#"
            UPDATE categories SET
                name = ?2,
                slug = ?3,
                image = ?4
            WHERE id = ?1
            "#,
        )
        .bind(category.id.to_string())
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.image)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_key(e, category))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, category.id));
        }

        Ok(())
    }

    /// Deletes a category.
    ///
    /// Products referencing it are not touched.
    pub async fn delete(&self, id: ObjectId) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, id));
        }

        Ok(())
    }

    /// Counts categories (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn duplicate_key(err: sqlx::Error, category: &Category) -> DbError {
    DbError::from(err).with_duplicate_value(|column| match column {
        "name" => Some(("name", category.name.clone())),
        "slug" => Some(("slug", category.slug.clone())),
        _ => None,
    })
}

fn row_to_category(row: SqliteRow) -> DbResult<Category> {
    let id: String = row.try_get("id")?;

    Ok(Category {
        id: parse_id(ENTITY, &id)?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        image: row.try_get("image")?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use storefront_core::{ModelRegistry, ValidationError};

    async fn setup() -> CategoryRepository {
        Database::new(DbConfig::in_memory(), Arc::new(ModelRegistry::new()))
            .await
            .unwrap()
            .categories()
    }

    #[tokio::test]
    async fn test_create_defaults_image() {
        let repo = setup().await;

        let category = repo.create(&NewCategory::new("Beverages", "beverages")).await.unwrap();
        assert_eq!(category.image, "");

        let stored = repo.get_by_slug("beverages").await.unwrap().unwrap();
        assert_eq!(stored, category);
    }

    #[tokio::test]
    async fn test_create_keeps_image() {
        let repo = setup().await;

        let category = repo
            .create(&NewCategory::new("Snacks", "snacks").with_image("/img/snacks.png"))
            .await
            .unwrap();
        assert_eq!(category.image, "/img/snacks.png");
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let repo = setup().await;
        repo.create(&NewCategory::new("Dairy", "dairy")).await.unwrap();

        let err = repo.create(&NewCategory::new("Dairy", "dairy-2")).await.unwrap_err();
        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "name");
                assert_eq!(value, "Dairy");
            }
            other => panic!("expected uniqueness error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_rejected() {
        let repo = setup().await;
        repo.create(&NewCategory::new("Dairy", "dairy")).await.unwrap();

        let err = repo.create(&NewCategory::new("Milk & Cheese", "dairy")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "slug"));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_required_fields() {
        let repo = setup().await;

        let err = repo.create(&NewCategory::new("", "empty")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Required { ref field }) if field == "name"
        ));

        let err = repo.create(&NewCategory::new("Empty", "")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Required { ref field }) if field == "slug"
        ));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let repo = setup().await;
        for (name, slug) in [("Frozen", "frozen"), ("Bakery", "bakery"), ("Dairy", "dairy")] {
            repo.create(&NewCategory::new(name, slug)).await.unwrap();
        }

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Bakery", "Dairy", "Frozen"]);
    }

    #[tokio::test]
    async fn test_update_and_conflicts() {
        let repo = setup().await;
        repo.create(&NewCategory::new("Bakery", "bakery")).await.unwrap();
        let mut category = repo.create(&NewCategory::new("Dairy", "dairy")).await.unwrap();

        category.image = "/img/dairy.png".to_string();
        repo.update(&category).await.unwrap();
        let stored = repo.get_by_id(category.id).await.unwrap().unwrap();
        assert_eq!(stored.image, "/img/dairy.png");

        category.slug = "bakery".to_string();
        let err = repo.update(&category).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "slug"));

        category.slug = String::new();
        let err = repo.update(&category).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = setup().await;
        let category = repo.create(&NewCategory::new("Bakery", "bakery")).await.unwrap();

        repo.delete(category.id).await.unwrap();
        assert!(repo.get_by_id(category.id).await.unwrap().is_none());

        let err = repo.delete(category.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
