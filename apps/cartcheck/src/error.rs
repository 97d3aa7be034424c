//! # App Error Types
//!
//! Errors raised by the cart form, configuration loading, and the unified
//! error the presentation layer receives.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Cartcheck                              │
//! │                                                                         │
//! │  CartForm::is_valid(raw)                                               │
//! │         │                                                               │
//! │         ├── Ok(false) ── FieldErrors ──► re-display cart with messages  │
//! │         │                                                               │
//! │         └── Err(FormError) ── fatal ──┐                                 │
//! │                                       ▼                                 │
//! │  DbError / CoreError / ConfigError ─► AppError { code, message }        │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                         generic failure (500-equivalent)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! ```json
//! { "code": "INTEGRITY_ERROR", "message": "Product not found: 4f1c..." }
//! ```

use serde::Serialize;
use thiserror::Error;

use cartcheck_core::{CoreError, FieldError, FieldErrors};
use cartcheck_db::DbError;

// =============================================================================
// Form Error
// =============================================================================

/// Fatal failures while cleaning a cart submission.
///
/// Generic over the stock reader's error so the form can run against any
/// [`StockReader`](cartcheck_core::StockReader).
#[derive(Debug, Error)]
pub enum FormError<E>
where
    E: std::error::Error + 'static,
{
    /// The catalog store failed or is missing a product.
    #[error("Catalog lookup failed: {0}")]
    Catalog(#[source] E),

    /// The stock snapshot does not fit the cart.
    #[error(transparent)]
    Integrity(#[from] CoreError),
}

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// The config file is not valid TOML for [`crate::config::AppConfig`].
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is present but unusable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// App Error
// =============================================================================

/// Unified error returned to the caller of the app layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for app responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// The cart submission is invalid (recoverable by the user)
    ValidationError,

    /// Catalog and cart disagree (data integrity fault)
    IntegrityError,

    /// Database operation failed
    DatabaseError,

    /// Configuration is unusable
    ConfigError,
}

impl AppError {
    /// Creates a new app error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Whether the failure is the user's to fix (as opposed to a fault).
    pub fn is_user_error(&self) -> bool {
        self.code == ErrorCode::ValidationError
    }
}

/// Converts database errors to app errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => AppError::new(
                ErrorCode::DatabaseError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::CheckViolation(e) => {
                tracing::error!("Constraint violation: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Catalog constraint violated")
            }
            DbError::ConnectionFailed(_) => {
                AppError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to app errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        tracing::error!(error = %err, "Cart integrity fault");
        AppError::new(ErrorCode::IntegrityError, err.to_string())
    }
}

/// Converts fatal form errors over the SQLite catalog to app errors.
///
/// A product missing from the catalog mid-validation is an integrity
/// fault, not a plain 404.
impl From<FormError<DbError>> for AppError {
    fn from(err: FormError<DbError>) -> Self {
        match err {
            FormError::Catalog(DbError::NotFound { entity, id }) => {
                tracing::error!(%entity, %id, "Cart references a product the catalog lost");
                AppError::new(
                    ErrorCode::IntegrityError,
                    format!("{} not found: {}", entity, id),
                )
            }
            FormError::Catalog(db) => AppError::from(db),
            FormError::Integrity(core) => AppError::from(core),
        }
    }
}

/// Converts the aggregated field errors into a single validation error.
impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::validation(errors.messages().join("\n"))
    }
}

impl From<FieldError> for AppError {
    fn from(error: FieldError) -> Self {
        AppError::validation(error.message)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

/// Result type for app operations.
pub type AppResult<T> = Result<T, AppError>;
