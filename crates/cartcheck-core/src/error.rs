//! # Error Types
//!
//! Domain-specific error types for cartcheck-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cartcheck-core errors (this file)                                     │
//! │  ├── FieldError    - One user-facing cart violation (displayed)        │
//! │  ├── FieldErrors   - Non-empty, ordered aggregate of FieldError        │
//! │  └── CoreError     - Integrity faults (never displayed per-field)      │
//! │                                                                         │
//! │  cartcheck-db errors (separate crate)                                  │
//! │  └── DbError       - Catalog store failures                            │
//! │                                                                         │
//! │  app errors (apps/cartcheck)                                           │
//! │  └── AppError      - What the presentation layer sees (serialized)     │
//! │                                                                         │
//! │  Flow: CoreError → DbError → FormError → AppError → caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Tiers
//! User-input problems are *values* ([`FieldErrors`]) that the form shows
//! next to the cart. Integrity problems are *faults* ([`CoreError`]) that
//! abort the request.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use ts_rs::TS;

use crate::types::ProductLineItem;

// =============================================================================
// Error Kind
// =============================================================================

/// Classification of a user-facing cart error.
///
/// The serialized form (`out_of_stock`, `less_quantity`, ...) is the stable
/// code the presentation layer switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The product has no stock left at all.
    OutOfStock,
    /// The requested quantity is zero, negative, or not a whole number.
    IncorrectQuantity,
    /// More units were requested than are in stock.
    LessQuantity,
    /// The submission is not a list of values.
    InvalidList,
    /// The submission does not carry one value per product.
    IncompleteList,
}

impl ErrorKind {
    /// Returns the stable snake_case code for this kind.
    pub const fn code(&self) -> &'static str {
        match self {
            ErrorKind::OutOfStock => "out_of_stock",
            ErrorKind::IncorrectQuantity => "incorrect_quantity",
            ErrorKind::LessQuantity => "less_quantity",
            ErrorKind::InvalidList => "invalid_list",
            ErrorKind::IncompleteList => "incomplete_list",
        }
    }

    /// Whether this kind rejects the submission before any line is checked.
    pub const fn is_structural(&self) -> bool {
        matches!(self, ErrorKind::InvalidList | ErrorKind::IncompleteList)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Field Error
// =============================================================================

/// A single recoverable cart violation, ready for display.
///
/// ## User Workflow
/// ```text
/// Submit [5]  (Apples: 2 in stock)
///      │
///      ▼
/// FieldError { product_id: "a", kind: LessQuantity,
///              message: "I’m sorry but we only have 2 of Apples left" }
///      │
///      ▼
/// Cart page re-rendered with the message above the field
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct FieldError {
    /// The offending line item, or `None` for whole-submission errors.
    pub product_id: Option<String>,

    /// Machine-readable classification.
    pub kind: ErrorKind,

    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    /// The product has no stock.
    pub fn out_of_stock(item: &ProductLineItem) -> Self {
        FieldError {
            product_id: Some(item.id.clone()),
            kind: ErrorKind::OutOfStock,
            message: format!("I’m sorry but we are out of stock for {}", item.name),
        }
    }

    /// The requested quantity is zero or negative.
    pub fn incorrect_quantity(item: &ProductLineItem) -> Self {
        FieldError {
            product_id: Some(item.id.clone()),
            kind: ErrorKind::IncorrectQuantity,
            message: format!("Entered value for {} is <= 0.", item.name),
        }
    }

    /// The requested quantity could not be read as a whole number.
    pub fn not_a_number(item: &ProductLineItem) -> Self {
        FieldError {
            product_id: Some(item.id.clone()),
            kind: ErrorKind::IncorrectQuantity,
            message: format!("Entered value for {} is not a whole number.", item.name),
        }
    }

    /// More units requested than available.
    pub fn less_quantity(item: &ProductLineItem) -> Self {
        FieldError {
            product_id: Some(item.id.clone()),
            kind: ErrorKind::LessQuantity,
            message: format!(
                "I’m sorry but we only have {} of {} left",
                item.quantity, item.name
            ),
        }
    }

    /// The raw submission was not list-like.
    pub fn invalid_list() -> Self {
        FieldError {
            product_id: None,
            kind: ErrorKind::InvalidList,
            message: "Enter a list of values.".to_string(),
        }
    }

    /// The submission length does not match the cart.
    pub fn incomplete_list(expected: usize) -> Self {
        FieldError {
            product_id: None,
            kind: ErrorKind::IncompleteList,
            message: format!("Enter a quantity for each of the {} products.", expected),
        }
    }
}

// =============================================================================
// Field Errors (aggregate)
// =============================================================================

/// Every violation found in one submission, in cart order.
///
/// ## Invariant
/// Never empty. The only constructors are [`FieldErrors::from_vec`] (which
/// returns `None` for an empty list) and `From<FieldError>`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, TS)]
#[ts(export)]
#[error("{} cart error(s)", .0.len())]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Wraps a list of errors, returning `None` if there are none.
    pub fn from_vec(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(FieldErrors(errors))
        }
    }

    /// Number of errors (always at least one).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the errors in cart order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// The display messages, in cart order.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|e| e.message.clone()).collect()
    }

    /// The error kinds, in cart order.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.0.iter().map(|e| e.kind).collect()
    }
}

impl From<FieldError> for FieldErrors {
    fn from(err: FieldError) -> Self {
        FieldErrors(vec![err])
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Integrity faults in the cart data.
///
/// These never end up in the per-field error list. They mean the catalog
/// and the cart disagree, and the request should fail as a whole.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A product of the cart is missing from the stock snapshot.
    ///
    /// ## When This Occurs
    /// - Product deleted from the catalog after the form was built
    /// - Stock reader returned a partial result
    #[error("Product not found in stock snapshot: {0}")]
    ProductNotFound(String),

    /// The same product id appears twice in a cart spec.
    #[error("Duplicate product in cart: {0}")]
    DuplicateProduct(String),

    /// A line item carries a negative stock level.
    #[error("Negative stock for {id}: {quantity}")]
    NegativeStock { id: String, quantity: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
