//! # cartcheck-core: Pure Business Logic for Cartcheck
//!
//! This crate is the **heart** of Cartcheck. It contains the cart
//! quantity rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cartcheck Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Presentation layer (out of scope)                 │   │
//! │  │        Cart page ──► submit quantities ──► re-display errors    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/cartcheck (CartForm)                    │   │
//! │  │        normalize ──► fetch stock ──► validate ──► outcome       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ cartcheck-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ validation│  │  change   │  │   │
//! │  │   │ CartSpec  │  │   Money   │  │ normalize │  │has_changed│  │   │
//! │  │   │ LineItem  │  │ subtotal  │  │   rules   │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ StockReader (port)                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 cartcheck-db (Catalog Store)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Line items, the ordered cart spec, accepted lines
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Field errors and fatal domain errors
//! - [`validation`] - Submission normalization and the stock rules
//! - [`change`] - Resubmission change detection
//! - [`catalog`] - The stock reader port implemented by the catalog store
//!
//! ## Example Usage
//!
//! ```rust
//! use cartcheck_core::{validate_cart, CartSpec, Money, ProductLineItem};
//!
//! let spec = CartSpec::new(vec![
//!     ProductLineItem::new("a", "Apples", Money::from_cents(120), 5),
//!     ProductLineItem::new("b", "Bread", Money::from_cents(250), 0),
//! ])
//! .unwrap();
//!
//! let submitted = vec!["3".to_string(), "1".to_string()];
//! let errors = validate_cart(&spec, &submitted).unwrap_err();
//!
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors.messages(), vec!["I’m sorry but we are out of stock for Bread"]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod change;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::StockReader;
pub use change::has_changed;
pub use error::{CoreError, CoreResult, ErrorKind, FieldError, FieldErrors};
pub use money::Money;
pub use types::*;
pub use validation::{normalize, validate_cart, ValidationResult};
