//! # Catalog Repository
//!
//! Database operations for products and their stock levels.
//!
//! ## Key Operations
//! - Full catalog scan in insertion order (builds the cart spec)
//! - Stock snapshot by id (the `StockReader` implementation)
//! - Inserts and stock adjustments (seeding, tests, order placement)
//!
//! ## Stock Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a Stock Snapshot Is Read                         │
//! │                                                                         │
//! │  ids: ["a", "b", "c"]                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT id, quantity FROM products WHERE id IN (?, ?, ?)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  rows: a → 5, c → 0          (row order not guaranteed)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  "b" missing → DbError::NotFound { entity: "Product", id: "b" }        │
//! │                                                                         │
//! │  A miss means the catalog changed under the cart: fatal, not a         │
//! │  field error.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use cartcheck_core::{Money, ProductLineItem, StockReader, StockSnapshot};

/// One `products` row as the cart sees it.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price_cents: Money,
    quantity: i64,
}

impl From<ProductRow> for ProductLineItem {
    fn from(row: ProductRow) -> Self {
        ProductLineItem::new(row.id, row.name, row.price_cents, row.quantity)
    }
}

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CatalogRepository::new(pool);
///
/// // Every product, in catalog order
/// let items = repo.list_all().await?;
///
/// // Fresh stock for the cart
/// let stock = repo.current_quantities(&ids).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Lists every product in catalog iteration order (insertion order).
    ///
    /// This is the source for building a cart spec: position N of the
    /// result is position N of the cart form.
    pub async fn list_all(&self) -> DbResult<Vec<ProductLineItem>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, price_cents, quantity
            FROM products
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded catalog");
        Ok(rows.into_iter().map(ProductLineItem::from).collect())
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(item))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ProductLineItem>> {
        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, price_cents, quantity
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProductLineItem::from))
    }

    /// Reads the current stock of every id in `ids`.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - at least one id is not in the catalog (the
    ///   first missing id, in input order, is reported)
    pub async fn current_quantities(&self, ids: &[String]) -> DbResult<StockSnapshot> {
        debug!(count = ids.len(), "Reading stock snapshot");

        if ids.is_empty() {
            return Ok(StockSnapshot::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new("SELECT id, quantity FROM products WHERE id IN (");
        push_id_list(&mut query, ids);

        let rows: Vec<(String, i64)> = query.build_query_as().fetch_all(&self.pool).await?;
        let snapshot: StockSnapshot = rows.into_iter().collect();

        ensure_all_present(ids, |id| snapshot.contains_key(id))?;

        Ok(snapshot)
    }

    /// Reads full line items (name, price and stock) for `ids`.
    ///
    /// Row order follows the store, not `ids`.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - at least one id is not in the catalog
    pub async fn snapshot(&self, ids: &[String]) -> DbResult<Vec<ProductLineItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT id, name, price_cents, quantity FROM products WHERE id IN (",
        );
        push_id_list(&mut query, ids);

        let rows: Vec<ProductRow> = query.build_query_as().fetch_all(&self.pool).await?;

        ensure_all_present(ids, |id| rows.iter().any(|row| row.id == id))?;

        Ok(rows.into_iter().map(ProductLineItem::from).collect())
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - id already exists
    /// * `Err(DbError::CheckViolation)` - negative price or stock
    pub async fn insert(&self, item: &ProductLineItem) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "Inserting product");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO products (id, name, price_cents, quantity, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.quantity)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &item.id),
            other => other,
        })?;

        Ok(())
    }

    /// Adjusts product stock by `delta`.
    ///
    /// Applied as `quantity = quantity + delta` in a single statement, so
    /// concurrent adjustments never overwrite each other. Stock cannot go
    /// below zero (CHECK constraint).
    ///
    /// ## Arguments
    /// * `id` - Product ID
    /// * `delta` - Change in stock (negative for sales, positive for restocking)
    pub async fn update_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Updating stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                quantity = quantity + ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product (admin tooling and tests).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

impl StockReader for CatalogRepository {
    type Error = DbError;

    async fn fetch_current_quantities(&self, ids: &[String]) -> DbResult<StockSnapshot> {
        self.current_quantities(ids).await
    }
}

/// Appends `?, ?, ...)` with one bound parameter per id.
fn push_id_list<'args>(query: &mut QueryBuilder<'args, Sqlite>, ids: &'args [String]) {
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(id.as_str());
    }
    separated.push_unseparated(")");
}

/// Fails with `NotFound` for the first id `present` rejects.
fn ensure_all_present(ids: &[String], present: impl Fn(&str) -> bool) -> DbResult<()> {
    match ids.iter().find(|id| !present(id.as_str())) {
        Some(missing) => Err(DbError::not_found("Product", missing)),
        None => Ok(()),
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn seeded() -> (Database, CatalogRepository) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.catalog();

        for (id, name, price, stock) in [
            ("c", "Cherries", 450, 7),
            ("a", "Apples", 120, 5),
            ("b", "Bread", 250, 0),
        ] {
            repo.insert(&ProductLineItem::new(id, name, Money::from_cents(price), stock))
                .await
                .unwrap();
        }

        (db, repo)
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_list_all_keeps_insertion_order() {
        let (_db, repo) = seeded().await;

        let items = repo.list_all().await.unwrap();

        let order: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
        assert_eq!(items[1].price, Money::from_cents(120));
        assert_eq!(items[2].quantity, 0);
    }

    #[tokio::test]
    async fn test_current_quantities() {
        let (_db, repo) = seeded().await;

        let stock = repo.current_quantities(&ids(&["a", "b"])).await.unwrap();

        assert_eq!(stock.len(), 2);
        assert_eq!(stock.get("a"), Some(&5));
        assert_eq!(stock.get("b"), Some(&0));
    }

    #[tokio::test]
    async fn test_current_quantities_missing_id_is_not_found() {
        let (_db, repo) = seeded().await;

        let err = repo
            .current_quantities(&ids(&["a", "ghost", "b"]))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { ref id, .. } if id == "ghost"));
    }

    #[tokio::test]
    async fn test_current_quantities_empty_ids() {
        let (_db, repo) = seeded().await;
        assert!(repo.current_quantities(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stock_reader_sees_updates() {
        let (_db, repo) = seeded().await;

        repo.update_stock("a", -3).await.unwrap();

        let stock = repo.fetch_current_quantities(&ids(&["a"])).await.unwrap();
        assert_eq!(stock.get("a"), Some(&2));
    }

    #[tokio::test]
    async fn test_update_stock_cannot_go_negative() {
        let (_db, repo) = seeded().await;

        let err = repo.update_stock("b", -1).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation(_)));

        let err = repo.update_stock("ghost", 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_snapshot_returns_full_items() {
        let (_db, repo) = seeded().await;

        let mut items = repo.snapshot(&ids(&["b", "c"])).await.unwrap();
        items.sort_by(|x, y| x.id.cmp(&y.id));

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Bread");
        assert_eq!(items[1].price, Money::from_cents(450));

        assert!(repo.snapshot(&ids(&["zzz"])).await.is_err());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id() {
        let (_db, repo) = seeded().await;

        let dup = ProductLineItem::new("a", "Other apples", Money::from_cents(1), 1);
        let err = repo.insert(&dup).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "a"));
    }

    #[tokio::test]
    async fn test_get_delete_and_count() {
        let (_db, repo) = seeded().await;

        assert_eq!(repo.count().await.unwrap(), 3);
        assert!(repo.get_by_id("a").await.unwrap().is_some());

        repo.delete("a").await.unwrap();

        assert!(repo.get_by_id("a").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[test]
    fn test_generate_product_id_is_uuid() {
        let id = generate_product_id();
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
