//! # Cart Form
//!
//! The form object a presentation layer drives: it owns the cart spec,
//! refreshes stock on every submission, and keeps the last outcome.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      CartForm::is_valid(raw)                            │
//! │                                                                         │
//! │  raw JSON ──► normalize() ──► invalid_list? ──────────────┐             │
//! │                    │                                      │             │
//! │                    ▼                                      │             │
//! │  reader.fetch_current_quantities(spec ids)  ── Err ──► FormError        │
//! │                    │                                      │ (fatal)     │
//! │                    ▼                                      │             │
//! │  spec.with_stock(snapshot)  ── missing id ──► FormError   │             │
//! │                    │                                      │             │
//! │                    ▼                                      ▼             │
//! │  validate_cart(fresh, values) ─────────────────► outcome stored         │
//! │                                                  Ok(true) / Ok(false)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The form's own spec is never mutated: each submission validates against
//! a fresh copy carrying the stock read for that submission.

use serde_json::Value;
use tracing::{debug, info, warn};

use cartcheck_core::{
    has_changed, normalize, subtotal, validate_cart, AcceptedLine, CartSpec, FieldErrors,
    Money, StockReader, ValidationResult,
};
use cartcheck_db::{CatalogRepository, DbError};

use crate::error::FormError;

/// Cart quantity form bound to a stock reader.
#[derive(Debug)]
pub struct CartForm<R: StockReader> {
    reader: R,
    spec: CartSpec,
    disabled: bool,
    outcome: Option<ValidationResult>,
}

impl CartForm<CatalogRepository> {
    /// Builds a form over every product in the catalog, in catalog order.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let mut form = CartForm::from_catalog(db.catalog()).await?;
    /// if form.is_valid(Some(&json!(["2", "1"]))).await? {
    ///     println!("subtotal {}", form.subtotal().unwrap_or_default());
    /// }
    /// ```
    pub async fn from_catalog(catalog: CatalogRepository) -> Result<Self, FormError<DbError>> {
        let items = catalog.list_all().await.map_err(FormError::Catalog)?;
        let spec = CartSpec::new(items)?;

        info!(products = spec.len(), "Cart form built from catalog");

        Ok(CartForm::new(spec, catalog))
    }
}

impl<R: StockReader> CartForm<R> {
    /// Creates a form for `spec`, reading stock through `reader`.
    pub fn new(spec: CartSpec, reader: R) -> Self {
        CartForm {
            reader,
            spec,
            disabled: false,
            outcome: None,
        }
    }

    /// Marks the form disabled. A disabled form never reports a change.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Checks if the form is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The cart spec as built (stock as of construction).
    pub fn spec(&self) -> &CartSpec {
        &self.spec
    }

    /// Baseline widget values: each product's stock, as strings.
    pub fn initial_values(&self) -> Vec<String> {
        self.spec.initial_values()
    }

    /// Normalizes and validates `raw` against freshly read stock.
    ///
    /// The outer `Result` carries fatal faults; the inner one is the user's
    /// outcome. Does not store anything on the form.
    pub async fn clean(&self, raw: Option<&Value>) -> Result<ValidationResult, FormError<R::Error>> {
        let values = match normalize(raw) {
            Ok(values) => values,
            Err(err) => {
                debug!(error = %err, "Submission is not a list");
                return Ok(Err(err.into()));
            }
        };

        let ids = self.spec.ids();
        let snapshot = self
            .reader
            .fetch_current_quantities(&ids)
            .await
            .map_err(FormError::Catalog)?;

        let fresh = self.spec.with_stock(&snapshot)?;
        let result = validate_cart(&fresh, &values);

        match &result {
            Ok(lines) => debug!(lines = lines.len(), "Cart submission accepted"),
            Err(errors) => warn!(
                errors = errors.len(),
                kinds = ?errors.kinds(),
                "Cart submission rejected"
            ),
        }

        Ok(result)
    }

    /// Validates `raw` and stores the outcome on the form.
    ///
    /// `Ok(false)` means the user has something to fix; see
    /// [`CartForm::error_messages`].
    pub async fn is_valid(&mut self, raw: Option<&Value>) -> Result<bool, FormError<R::Error>> {
        let result = match self.clean(raw).await {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "Cart validation aborted");
                self.outcome = None;
                return Err(err);
            }
        };

        let valid = result.is_ok();
        self.outcome = Some(result);
        Ok(valid)
    }

    /// Accepted lines from the last successful [`CartForm::is_valid`].
    pub fn accepted_lines(&self) -> Option<&[AcceptedLine]> {
        match &self.outcome {
            Some(Ok(lines)) => Some(lines.as_slice()),
            _ => None,
        }
    }

    /// Subtotal of the accepted lines, if the last submission was accepted.
    pub fn subtotal(&self) -> Option<Money> {
        self.accepted_lines().map(subtotal)
    }

    /// Errors from the last rejected submission.
    pub fn errors(&self) -> Option<&FieldErrors> {
        match &self.outcome {
            Some(Err(errors)) => Some(errors),
            _ => None,
        }
    }

    /// Messages to re-display, in cart order. Empty when nothing failed.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors().map(FieldErrors::messages).unwrap_or_default()
    }

    /// Whether `data` differs from `initial`, order- and duplicate-insensitive.
    pub fn has_changed(&self, initial: Option<&[String]>, data: Option<&[String]>) -> bool {
        if self.disabled {
            return false;
        }
        has_changed(initial, data)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
