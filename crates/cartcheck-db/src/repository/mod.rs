//! # Repository Module
//!
//! Database repository implementations for Cartcheck.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CartForm (apps/cartcheck)                                             │
//! │       │                                                                 │
//! │       │  reader.fetch_current_quantities(&ids)                         │
//! │       ▼                                                                 │
//! │  CatalogRepository                                                     │
//! │  ├── list_all()                  (build the cart spec)                 │
//! │  ├── current_quantities(ids)     (StockReader)                         │
//! │  ├── snapshot(ids)                                                     │
//! │  ├── insert(item) / update_stock(id, delta)                            │
//! │  └── count()                                                           │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - Products and stock

pub mod catalog;
