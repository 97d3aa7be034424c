//! # Catalog Port
//!
//! The one thing the cart validator needs from the outside world: current
//! stock levels for a set of product ids.
//!
//! ```text
//! cartcheck-core                    cartcheck-db
//! ──────────────                    ────────────
//! trait StockReader  ◄───────────── impl for CatalogRepository (SQLite)
//!        ▲
//!        │ generic over R: StockReader
//! apps/cartcheck CartForm<R>
//! ```
//!
//! The trait lives here so the form can be tested with an in-memory
//! reader. Nothing in this crate calls it.

use std::future::Future;

use crate::types::StockSnapshot;

/// Reads current stock for a set of product ids.
///
/// ## Contract
/// - Returns a value for **every** id passed in
/// - A missing id is an error (catalog out of sync with the cart), not an
///   empty entry
/// - No ordering guarantee on the returned map
pub trait StockReader {
    /// Store-specific failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches current stock for `ids`.
    fn fetch_current_quantities(
        &self,
        ids: &[String],
    ) -> impl Future<Output = Result<StockSnapshot, Self::Error>> + Send;
}
