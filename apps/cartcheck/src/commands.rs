//! # Commands
//!
//! The operations the `cartcheck` binary exposes, returning serializable
//! responses so any front end can render them.
//!
//! ```text
//! cartcheck products                  ──► list_products()
//! cartcheck validate '["2","0"]'      ──► validate_cart()
//! cartcheck changed '["5"]' '["2"]'   ──► changed()
//! ```

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use cartcheck_core::{has_changed, normalize, AcceptedLine, Money, ProductLineItem};
use cartcheck_db::Database;

use crate::error::{AppError, AppResult};
use crate::form::CartForm;

/// Outcome of validating one cart submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub valid: bool,
    pub lines: Vec<AcceptedLine>,
    pub subtotal: Money,
    pub errors: Vec<String>,
}

/// Lists every product in cart order with its current stock.
pub async fn list_products(db: &Database) -> AppResult<Vec<ProductLineItem>> {
    debug!("list_products command");
    Ok(db.catalog().list_all().await?)
}

/// Validates a JSON cart submission against the whole catalog.
///
/// User mistakes come back as `valid: false` with messages; only faults
/// are `Err`.
pub async fn validate_cart(db: &Database, submission: &str) -> AppResult<ValidateResponse> {
    debug!(submission, "validate_cart command");

    let raw = parse_json(submission)?;
    let mut form = CartForm::from_catalog(db.catalog()).await?;

    let valid = form.is_valid(raw.as_ref()).await?;

    Ok(ValidateResponse {
        valid,
        lines: form.accepted_lines().map(<[_]>::to_vec).unwrap_or_default(),
        subtotal: form.subtotal().unwrap_or_default(),
        errors: form.error_messages(),
    })
}

/// Reports whether `submitted` differs from `baseline`.
pub fn changed(baseline: &str, submitted: &str) -> AppResult<bool> {
    let baseline = normalize(parse_json(baseline)?.as_ref())?;
    let submitted = normalize(parse_json(submitted)?.as_ref())?;

    Ok(has_changed(Some(baseline.as_slice()), Some(submitted.as_slice())))
}

/// Parses command-line JSON; an empty argument means "nothing submitted".
fn parse_json(text: &str) -> AppResult<Option<Value>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| AppError::validation(format!("Not valid JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use cartcheck_db::DbConfig;

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();
        for (id, name, cents, stock) in [("a", "Apples", 120, 5), ("b", "Bread", 250, 0)] {
            catalog
                .insert(&ProductLineItem::new(id, name, Money::from_cents(cents), stock))
                .await
                .unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_list_products() {
        let db = seeded().await;
        let products = list_products(&db).await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Apples");
    }

    #[tokio::test]
    async fn test_validate_accepts() {
        let db = seeded().await;
        db.catalog().update_stock("b", 2).await.unwrap();

        let response = validate_cart(&db, r#"["2", 1]"#).await.unwrap();

        assert!(response.valid);
        assert_eq!(response.lines.len(), 2);
        assert_eq!(response.subtotal, Money::from_cents(490));
        assert!(response.errors.is_empty());
    }

    #[tokio::test]
    async fn test_validate_reports_messages() {
        let db = seeded().await;

        let response = validate_cart(&db, r#"["9", "1"]"#).await.unwrap();

        assert!(!response.valid);
        assert!(response.lines.is_empty());
        assert_eq!(
            response.errors,
            vec![
                "I’m sorry but we only have 5 of Apples left",
                "I’m sorry but we are out of stock for Bread",
            ]
        );
    }

    #[tokio::test]
    async fn test_validate_bad_json() {
        let db = seeded().await;
        let err = validate_cart(&db, "[1,").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_changed() {
        assert!(!changed("", "").unwrap());
        assert!(!changed(r#"["1","2"]"#, "[2, 1]").unwrap());
        assert!(changed(r#"["1"]"#, r#"["1","1"]"#).unwrap());

        let err = changed(r#"{"a":1}"#, "[]").unwrap_err();
        assert_eq!(err.message, "Enter a list of values.");
    }
}
