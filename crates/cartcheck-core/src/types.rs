//! # Domain Types
//!
//! Core domain types used throughout Cartcheck.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ProductLineItem │   │    CartSpec     │   │  AcceptedLine   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  items (ordered)│   │  item           │       │
//! │  │  name           │   │  unique ids     │   │  quantity       │       │
//! │  │  price (Money)  │   └─────────────────┘   │  line_total()   │       │
//! │  │  quantity       │                         └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  StockSnapshot = HashMap<product id, current stock>                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Position Matters
//! A `CartSpec` is ordered: the Nth submitted value is the requested
//! quantity for the Nth line item. The order is the catalog's iteration
//! order when the form was built.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// Current stock per product id, as read from the catalog store.
pub type StockSnapshot = HashMap<String, i64>;

// =============================================================================
// Product Line Item
// =============================================================================

/// One product with its stock level at the time it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductLineItem {
    /// Catalog identifier.
    pub id: String,

    /// Display name, used in error messages.
    pub name: String,

    /// Unit price.
    pub price: Money,

    /// Units currently in stock.
    pub quantity: i64,
}

impl ProductLineItem {
    /// Creates a line item.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money, quantity: i64) -> Self {
        ProductLineItem {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Checks if at least one unit is in stock.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    /// Returns a copy of this item with a different stock level.
    pub fn with_quantity(&self, quantity: i64) -> Self {
        ProductLineItem {
            quantity,
            ..self.clone()
        }
    }
}

// =============================================================================
// Cart Spec
// =============================================================================

/// The ordered list of products a cart form asks quantities for.
///
/// ## Invariants
/// - Ids are unique
/// - Stock levels are never negative
/// - Order is preserved exactly as given
///
/// ## Refreshing Stock
/// ```text
/// form spec (built once)          fresh StockSnapshot
///   A: 5, B: 3                      A: 5, B: 0
///        │                               │
///        └──────── with_stock() ◄────────┘
///                      │
///                      ▼
///             new CartSpec  A: 5, B: 0   (form spec untouched)
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ProductLineItem>", into = "Vec<ProductLineItem>")]
pub struct CartSpec {
    items: Vec<ProductLineItem>,
}

impl CartSpec {
    /// Builds a cart spec, rejecting duplicate ids and negative stock.
    ///
    /// ## Example
    /// ```rust
    /// use cartcheck_core::{CartSpec, Money, ProductLineItem};
    ///
    /// let item = ProductLineItem::new("a", "Apples", Money::from_cents(120), 5);
    /// assert!(CartSpec::new(vec![item.clone()]).is_ok());
    /// assert!(CartSpec::new(vec![item.clone(), item]).is_err());
    /// ```
    pub fn new(items: Vec<ProductLineItem>) -> CoreResult<Self> {
        let mut seen = HashSet::with_capacity(items.len());

        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(CoreError::DuplicateProduct(item.id.clone()));
            }
            if item.quantity < 0 {
                return Err(CoreError::NegativeStock {
                    id: item.id.clone(),
                    quantity: item.quantity,
                });
            }
        }

        Ok(CartSpec { items })
    }

    /// The line items, in cart order.
    pub fn items(&self) -> &[ProductLineItem] {
        &self.items
    }

    /// Number of line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The product ids, in cart order.
    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    /// Looks up a line item by id.
    pub fn get(&self, id: &str) -> Option<&ProductLineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// The values the cart widget shows before any submission: each
    /// product's stock level, as strings.
    ///
    /// This is the baseline passed to [`crate::change::has_changed`].
    pub fn initial_values(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|item| item.quantity.to_string())
            .collect()
    }

    /// Returns a new spec with every stock level taken from `snapshot`.
    ///
    /// ## Errors
    /// - `CoreError::ProductNotFound` if any id is missing from the snapshot
    /// - `CoreError::NegativeStock` if the snapshot reports negative stock
    pub fn with_stock(&self, snapshot: &StockSnapshot) -> CoreResult<CartSpec> {
        let items = self
            .items
            .iter()
            .map(|item| {
                let quantity = snapshot
                    .get(&item.id)
                    .copied()
                    .ok_or_else(|| CoreError::ProductNotFound(item.id.clone()))?;
                if quantity < 0 {
                    return Err(CoreError::NegativeStock {
                        id: item.id.clone(),
                        quantity,
                    });
                }
                Ok(item.with_quantity(quantity))
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(CartSpec { items })
    }
}

/// Deserialization goes through [`CartSpec::new`], so the invariants hold.
impl TryFrom<Vec<ProductLineItem>> for CartSpec {
    type Error = CoreError;

    fn try_from(items: Vec<ProductLineItem>) -> CoreResult<Self> {
        CartSpec::new(items)
    }
}

impl From<CartSpec> for Vec<ProductLineItem> {
    fn from(spec: CartSpec) -> Self {
        spec.items
    }
}

impl<'a> IntoIterator for &'a CartSpec {
    type Item = &'a ProductLineItem;
    type IntoIter = std::slice::Iter<'a, ProductLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// =============================================================================
// Accepted Line
// =============================================================================

/// A line that passed every stock rule, ready for order placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedLine {
    /// The line item, with the stock level it was validated against.
    pub item: ProductLineItem,

    /// Requested quantity (always in `1..=item.quantity`).
    pub quantity: i64,
}

impl AcceptedLine {
    /// Unit price × requested quantity.
    pub fn line_total(&self) -> Money {
        self.item.price.multiply_quantity(self.quantity)
    }
}

/// Sums the line totals of accepted lines.
///
/// ## Example
/// ```rust
/// use cartcheck_core::{subtotal, AcceptedLine, Money, ProductLineItem};
///
/// let lines = vec![AcceptedLine {
///     item: ProductLineItem::new("a", "Apples", Money::from_cents(120), 5),
///     quantity: 3,
/// }];
/// assert_eq!(subtotal(&lines).cents(), 360);
/// ```
pub fn subtotal(lines: &[AcceptedLine]) -> Money {
    lines.iter().map(AcceptedLine::line_total).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, quantity: i64) -> ProductLineItem {
        ProductLineItem::new(id, format!("Product {}", id), Money::from_cents(100), quantity)
    }

    #[test]
    fn test_spec_preserves_order() {
        let spec = CartSpec::new(vec![item("b", 1), item("a", 2), item("c", 3)]).unwrap();
        assert_eq!(spec.ids(), vec!["b", "a", "c"]);
        assert_eq!(spec.len(), 3);
        assert_eq!(spec.get("a").map(|i| i.quantity), Some(2));
    }

    #[test]
    fn test_spec_rejects_duplicates() {
        let err = CartSpec::new(vec![item("a", 1), item("a", 2)]).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateProduct(id) if id == "a"));
    }

    #[test]
    fn test_spec_rejects_negative_stock() {
        let err = CartSpec::new(vec![item("a", -1)]).unwrap_err();
        assert!(matches!(err, CoreError::NegativeStock { quantity: -1, .. }));
    }

    #[test]
    fn test_with_stock_returns_new_spec() {
        let spec = CartSpec::new(vec![item("a", 5), item("b", 3)]).unwrap();
        let snapshot = StockSnapshot::from([("a".to_string(), 5), ("b".to_string(), 0)]);

        let refreshed = spec.with_stock(&snapshot).unwrap();

        assert_eq!(refreshed.get("b").map(|i| i.quantity), Some(0));
        // Original untouched
        assert_eq!(spec.get("b").map(|i| i.quantity), Some(3));
        assert_eq!(refreshed.ids(), spec.ids());
    }

    #[test]
    fn test_with_stock_missing_id_is_fatal() {
        let spec = CartSpec::new(vec![item("a", 5), item("b", 3)]).unwrap();
        let snapshot = StockSnapshot::from([("a".to_string(), 5)]);

        let err = spec.with_stock(&snapshot).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(id) if id == "b"));
    }

    #[test]
    fn test_initial_values_are_stock_levels() {
        let spec = CartSpec::new(vec![item("a", 5), item("b", 0)]).unwrap();
        assert_eq!(spec.initial_values(), vec!["5", "0"]);
    }

    #[test]
    fn test_deserialize_enforces_invariants() {
        let spec = CartSpec::new(vec![item("b", 1), item("a", 2)]).unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.starts_with('['));

        let back: CartSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);

        let duplicate = r#"[
            {"id": "a", "name": "A", "price": 100, "quantity": 1},
            {"id": "a", "name": "A", "price": 100, "quantity": 2}
        ]"#;
        assert!(serde_json::from_str::<CartSpec>(duplicate).is_err());

        let negative = r#"[{"id": "a", "name": "A", "price": 100, "quantity": -1}]"#;
        assert!(serde_json::from_str::<CartSpec>(negative).is_err());
    }

    #[test]
    fn test_line_total_and_subtotal() {
        let lines = vec![
            AcceptedLine { item: item("a", 5), quantity: 2 },
            AcceptedLine { item: item("b", 5), quantity: 3 },
        ];
        assert_eq!(lines[0].line_total().cents(), 200);
        assert_eq!(subtotal(&lines).cents(), 500);

        let pricey = ProductLineItem::new("p", "Pricey", Money::from_cents(i64::MAX), 5);
        let huge = vec![AcceptedLine { item: pricey, quantity: 5 }, lines[0].clone()];
        assert_eq!(subtotal(&huge).cents(), i64::MAX);
        assert_eq!(subtotal(&[]), Money::zero());
    }
}
