//! # Cart Repository
//!
//! Database operations for carts.
//!
//! ## Invariants
//! - At most one cart per `userId` (UNIQUE index, not an application check)
//! - Every line has a `productId` and a `quantity` of at least 0.1
//! - `createdAt` is set once; `updatedAt` moves on every save
//!
//! Lines are stored as a JSON array in `carts.items`; they are owned by
//! the cart and never queried on their own.

use std::sync::Arc;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use storefront_core::{Cart, CartItem, NewCart, ObjectId, RegisteredModel};

use super::{new_document, now, parse_id};
use crate::error::{DbError, DbResult};

const ENTITY: &str = "Cart";

/// Repository for cart database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.carts();
///
/// let cart = repo.create(&NewCart::new(user_id, items)).await?;
/// let same = repo.get_by_user(user_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
    model: Arc<RegisteredModel>,
}

impl CartRepository {
    /// Creates a new CartRepository bound to the registered Cart model.
    pub fn new(pool: SqlitePool, model: Arc<RegisteredModel>) -> Self {
        CartRepository { pool, model }
    }

    /// Creates a cart for a user.
    ///
    /// ## Returns
    /// * `Ok(Cart)` - Persisted cart with id and timestamps populated
    /// * `Err(DbError::Validation)` - Missing field, or a quantity below 0.1
    ///   or not finite
    /// * `Err(DbError::UniqueViolation)` - User already has a cart
    pub async fn create(&self, input: &NewCart) -> DbResult<Cart> {
        debug!(user_id = %input.user_id, items = input.items.len(), "Creating cart");

        input.validate()?;

        let doc = new_document(ENTITY, input, ObjectId::new(), Some(now()))?;
        let cart: Cart = self.model.hydrate(doc)?;
        let items = encode_items(&cart.items)?;

        sqlx::query(
            r#"
            INSERT INTO carts (id, user_id, items, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(cart.id.to_string())
        .bind(cart.user_id.to_string())
        .bind(items)
        .bind(cart.created_at)
        .bind(cart.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_user(e, &cart))?;

        Ok(cart)
    }

    /// Gets a cart by its ID.
    pub async fn get_by_id(&self, id: ObjectId) -> DbResult<Option<Cart>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, items, created_at, updated_at
            FROM carts
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_cart).transpose()
    }

    /// Gets the cart owned by a user.
    pub async fn get_by_user(&self, user_id: ObjectId) -> DbResult<Option<Cart>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, items, created_at, updated_at
            FROM carts
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_cart).transpose()
    }

    /// Saves an edited cart and bumps `updatedAt`.
    ///
    /// `createdAt` is never rewritten, whatever the passed cart holds.
    ///
    /// ## Returns
    /// * `Ok(Cart)` - The cart as stored, with the new `updatedAt`
    /// * `Err(DbError::NotFound)` - No cart with this id
    pub async fn save(&self, cart: &Cart) -> DbResult<Cart> {
        debug!(id = %cart.id, items = cart.items.len(), "Saving cart");

        let mut updated = cart.clone();
        updated.updated_at = now();
        self.model.check(&updated)?;
        let items = encode_items(&updated.items)?;

        let result = sqlx::query(
            r#"
            UPDATE carts SET
                user_id = ?2,
                items = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(updated.id.to_string())
        .bind(updated.user_id.to_string())
        .bind(items)
        .bind(updated.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_user(e, &updated))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ENTITY, updated.id));
        }

        self.get_by_id(updated.id)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, updated.id))
    }

    /// Deletes a user's cart (checkout or explicit clear).
    ///
    /// ## Returns
    /// * `Ok(true)` - A cart was removed
    /// * `Ok(false)` - The user had no cart
    pub async fn delete_by_user(&self, user_id: ObjectId) -> DbResult<bool> {
        debug!(user_id = %user_id, "Deleting cart");

        let result = sqlx::query("DELETE FROM carts WHERE user_id = ?1")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts carts (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM carts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn encode_items(items: &[CartItem]) -> DbResult<String> {
    serde_json::to_string(items).map_err(|e| DbError::corrupt(ENTITY, e))
}

fn duplicate_user(err: sqlx::Error, cart: &Cart) -> DbError {
    DbError::from(err).with_duplicate_value(|column| {
        (column == "user_id").then(|| ("userId", cart.user_id.to_string()))
    })
}

fn row_to_cart(row: SqliteRow) -> DbResult<Cart> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let items: String = row.try_get("items")?;

    Ok(Cart {
        id: parse_id(ENTITY, &id)?,
        user_id: parse_id(ENTITY, &user_id)?,
        items: serde_json::from_str(&items).map_err(|e| DbError::corrupt(ENTITY, e))?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
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

    async fn setup() -> CartRepository {
        Database::new(DbConfig::in_memory(), Arc::new(ModelRegistry::new()))
            .await
            .unwrap()
            .carts()
    }

    #[tokio::test]
    async fn test_quantity_below_minimum_is_rejected() {
        let repo = setup().await;
        let input = NewCart::new(ObjectId::new(), vec![CartItem::new(ObjectId::new(), 0.05)]);

        let err = repo.create(&input).await.unwrap_err();
        match err {
            DbError::Validation(ValidationError::BelowMinimum { field, min, .. }) => {
                assert_eq!(field, "items.0.quantity");
                assert_eq!(min, 0.1);
            }
            other => panic!("expected quantity validation error, got {other:?}"),
        }
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_non_finite_quantities_are_rejected() {
        let repo = setup().await;

        let nan = NewCart::new(ObjectId::new(), vec![CartItem::new(ObjectId::new(), f64::NAN)]);
        let err = repo.create(&nan).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::BelowMinimum { ref field, .. })
                if field == "items.0.quantity"
        ));

        let inf = NewCart::new(ObjectId::new(), vec![CartItem::new(ObjectId::new(), f64::INFINITY)]);
        let err = repo.create(&inf).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::InvalidFormat { ref field, .. })
                if field == "items.0.quantity"
        ));
        assert_eq!(repo.count().await.unwrap(), 0);

        let mut cart = repo
            .create(&NewCart::new(ObjectId::new(), vec![CartItem::new(ObjectId::new(), 1.0)]))
            .await
            .unwrap();

        cart.items.push(CartItem::new(ObjectId::new(), f64::NAN));
        let err = repo.save(&cart).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::BelowMinimum { ref field, .. })
                if field == "items.1.quantity"
        ));

        cart.items[1].quantity = f64::INFINITY;
        let err = repo.save(&cart).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::InvalidFormat { ref field, .. })
                if field == "items.1.quantity"
        ));

        let stored = repo.get_by_id(cart.id).await.unwrap().unwrap();
        assert_eq!(stored.items.len(), 1);
    }

    #[tokio::test]
    async fn test_create_populates_timestamps() {
        let repo = setup().await;
        let user = ObjectId::new();
        let product = ObjectId::new();

        let before = now();
        let cart = repo
            .create(&NewCart::new(user, vec![CartItem::new(product, 2.0)]))
            .await
            .unwrap();

        assert_eq!(cart.user_id, user);
        assert_eq!(cart.items, vec![CartItem::new(product, 2.0)]);
        assert!(cart.created_at >= before);
        assert_eq!(cart.created_at, cart.updated_at);

        let stored = repo.get_by_id(cart.id).await.unwrap().unwrap();
        assert_eq!(stored, cart);
    }

    #[tokio::test]
    async fn test_second_cart_for_user_is_rejected() {
        let repo = setup().await;
        let user = ObjectId::new();
        let items = vec![CartItem::new(ObjectId::new(), 2.0)];

        repo.create(&NewCart::new(user, items.clone())).await.unwrap();
        let err = repo.create(&NewCart::new(user, items)).await.unwrap_err();

        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "userId");
                assert_eq!(value, user.to_string());
            }
            other => panic!("expected uniqueness error, got {other:?}"),
        }
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fractional_quantities_and_empty_carts() {
        let repo = setup().await;

        let cart = repo
            .create(&NewCart::new(ObjectId::new(), vec![CartItem::new(ObjectId::new(), 0.1)]))
            .await
            .unwrap();
        assert_eq!(cart.items[0].quantity, 0.1);

        let empty = repo.create(&NewCart::new(ObjectId::new(), vec![])).await.unwrap();
        assert!(empty.items.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_user() {
        let repo = setup().await;
        let user = ObjectId::new();

        assert!(repo.get_by_user(user).await.unwrap().is_none());

        let cart = repo.create(&NewCart::new(user, vec![])).await.unwrap();
        let found = repo.get_by_user(user).await.unwrap().unwrap();
        assert_eq!(found.id, cart.id);
    }

    #[tokio::test]
    async fn test_save_keeps_created_at_and_bumps_updated_at() {
        let repo = setup().await;
        let mut cart = repo.create(&NewCart::new(ObjectId::new(), vec![])).await.unwrap();
        let created_at = cart.created_at;

        cart.items.push(CartItem::new(ObjectId::new(), 1.5));
        cart.created_at = created_at + chrono::Duration::days(1);
        let saved = repo.save(&cart).await.unwrap();

        assert_eq!(saved.items.len(), 1);
        assert_eq!(saved.created_at, created_at);
        assert!(saved.updated_at >= created_at);
    }

    #[tokio::test]
    async fn test_save_validates_items() {
        let repo = setup().await;
        let mut cart = repo.create(&NewCart::new(ObjectId::new(), vec![])).await.unwrap();

        cart.items.push(CartItem::new(ObjectId::new(), 0.0));
        let err = repo.save(&cart).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::BelowMinimum { .. })));

        let stored = repo.get_by_id(cart.id).await.unwrap().unwrap();
        assert!(stored.items.is_empty());
    }

    #[tokio::test]
    async fn test_save_missing_cart() {
        let repo = setup().await;
        let at = now();
        let cart = Cart {
            id: ObjectId::new(),
            user_id: ObjectId::new(),
            items: vec![],
            created_at: at,
            updated_at: at,
        };

        let err = repo.save(&cart).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_reassigning_cart_to_owned_user_is_rejected() {
        let repo = setup().await;
        let taken = repo.create(&NewCart::new(ObjectId::new(), vec![])).await.unwrap();
        let mut other = repo.create(&NewCart::new(ObjectId::new(), vec![])).await.unwrap();

        other.user_id = taken.user_id;
        let err = repo.save(&other).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "userId"));
    }

    #[tokio::test]
    async fn test_delete_by_user_allows_new_cart() {
        let repo = setup().await;
        let user = ObjectId::new();

        repo.create(&NewCart::new(user, vec![])).await.unwrap();
        assert!(repo.delete_by_user(user).await.unwrap());
        assert!(!repo.delete_by_user(user).await.unwrap());

        repo.create(&NewCart::new(user, vec![])).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
