//! # Validation Module
//!
//! Normalization of raw cart submissions and the per-line stock rules.
//!
//! ## Validation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart Validation Pipeline                           │
//! │                                                                         │
//! │  raw JSON value                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  normalize() ── not a list? ──────────────► invalid_list (whole form)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<String> ── wrong length? ────────────► incomplete_list (whole form)│
//! │       │                                                                 │
//! │       ▼  (stock refreshed by the caller: CartSpec::with_stock)          │
//! │  check_line() for EVERY (line item, value) pair                        │
//! │       │                                                                 │
//! │       ├── stock == 0           → out_of_stock                          │
//! │       ├── not a whole number   → incorrect_quantity                    │
//! │       ├── requested <= 0       → incorrect_quantity                    │
//! │       ├── requested > stock    → less_quantity                         │
//! │       └── otherwise            → accepted                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  any error? → Err(all errors, cart order)  else Ok(accepted lines)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartcheck_core::validation::normalize;
//! use serde_json::json;
//!
//! assert_eq!(normalize(None).unwrap(), Vec::<String>::new());
//! assert_eq!(normalize(Some(&json!([3, "1"]))).unwrap(), vec!["3", "1"]);
//! assert!(normalize(Some(&json!("not-a-list"))).is_err());
//! ```

use serde_json::Value;
use std::num::{IntErrorKind, ParseIntError};

use crate::error::{FieldError, FieldErrors};
use crate::types::{AcceptedLine, CartSpec, ProductLineItem};

/// Result of validating one submission against a cart spec.
pub type ValidationResult = Result<Vec<AcceptedLine>, FieldErrors>;

// =============================================================================
// Normalization
// =============================================================================

/// Turns a raw submitted value into one string per cart position.
///
/// ## Rules
/// - Absent, `null`, or any blank value (`""`, `0`, `false`, `[]`, `{}`)
///   → empty list
/// - Array → each element as a string (strings verbatim, other JSON values
///   in their JSON text form)
/// - Anything else → `invalid_list`
pub fn normalize(raw: Option<&Value>) -> Result<Vec<String>, FieldError> {
    let value = match raw {
        Some(value) if !is_blank(value) => value,
        _ => return Ok(Vec::new()),
    };

    match value {
        Value::Array(values) => Ok(values.iter().map(value_to_string).collect()),
        _ => Err(FieldError::invalid_list()),
    }
}

/// Checks if a value counts as "nothing submitted".
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// String coercion shared with change detection.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Line Rules
// =============================================================================

/// Parses a submitted quantity as a whole number.
///
/// Surrounding whitespace is ignored and a leading `+`/`-` is allowed. A
/// well-formed integer outside the `i64` range is still a whole number: the
/// error keeps its [`IntErrorKind`] so the caller can classify it by sign.
pub fn parse_quantity(raw: &str) -> Result<i64, ParseIntError> {
    raw.trim().parse::<i64>()
}

/// Applies the stock rules to one line.
///
/// ## Rule Order
/// The first matching rule wins; later rules are not evaluated:
/// 1. No stock → `out_of_stock` (whatever was typed)
/// 2. Not a whole number → `incorrect_quantity` (integers beyond `i64` fall
///    through to rule 3 or 4 by sign)
/// 3. Zero or negative → `incorrect_quantity`
/// 4. More than in stock → `less_quantity`
///
/// ## Example
/// ```rust
/// use cartcheck_core::validation::check_line;
/// use cartcheck_core::{ErrorKind, Money, ProductLineItem};
///
/// let apples = ProductLineItem::new("a", "Apples", Money::from_cents(120), 2);
/// assert_eq!(check_line(&apples, "2"), Ok(2));
/// assert_eq!(check_line(&apples, "5").unwrap_err().kind, ErrorKind::LessQuantity);
/// ```
pub fn check_line(item: &ProductLineItem, raw: &str) -> Result<i64, FieldError> {
    if !item.in_stock() {
        return Err(FieldError::out_of_stock(item));
    }

    let requested = parse_quantity(raw).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => FieldError::less_quantity(item),
        IntErrorKind::NegOverflow => FieldError::incorrect_quantity(item),
        _ => FieldError::not_a_number(item),
    })?;

    if requested <= 0 {
        return Err(FieldError::incorrect_quantity(item));
    }

    if item.quantity < requested {
        return Err(FieldError::less_quantity(item));
    }

    Ok(requested)
}

// =============================================================================
// Cart Validation
// =============================================================================

/// Validates a normalized submission against a (freshly refreshed) spec.
///
/// ## Behavior
/// - The submission must carry exactly one value per line item, otherwise
///   the whole submission is rejected with `incomplete_list`
/// - Every line is checked; errors are collected in cart order
/// - One error anywhere rejects the submission (no partial success)
pub fn validate_cart(spec: &CartSpec, submitted: &[String]) -> ValidationResult {
    if submitted.len() != spec.len() {
        return Err(FieldError::incomplete_list(spec.len()).into());
    }

    let mut accepted = Vec::with_capacity(spec.len());
    let mut errors = Vec::new();

    for (item, raw) in spec.items().iter().zip(submitted) {
        match check_line(item, raw) {
            Ok(quantity) => accepted.push(AcceptedLine {
                item: item.clone(),
                quantity,
            }),
            Err(err) => errors.push(err),
        }
    }

    match FieldErrors::from_vec(errors) {
        Some(errors) => Err(errors),
        None => Ok(accepted),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::money::Money;
    use serde_json::json;

    fn item(id: &str, name: &str, stock: i64) -> ProductLineItem {
        ProductLineItem::new(id, name, Money::from_cents(100), stock)
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_normalize_blank_inputs() {
        assert!(normalize(None).unwrap().is_empty());
        assert!(normalize(Some(&Value::Null)).unwrap().is_empty());
        assert!(normalize(Some(&json!(""))).unwrap().is_empty());
        assert!(normalize(Some(&json!([]))).unwrap().is_empty());
        assert!(normalize(Some(&json!(0))).unwrap().is_empty());
        assert!(normalize(Some(&json!(false))).unwrap().is_empty());
    }

    #[test]
    fn test_normalize_coerces_elements() {
        let values = normalize(Some(&json!([3, "1", 2.5, " 4 "]))).unwrap();
        assert_eq!(values, strings(&["3", "1", "2.5", " 4 "]));
    }

    #[test]
    fn test_normalize_rejects_scalars() {
        for raw in [json!("not-a-list"), json!(7), json!(true), json!({"a": 1})] {
            let err = normalize(Some(&raw)).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidList);
            assert_eq!(err.message, "Enter a list of values.");
        }
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), Ok(3));
        assert_eq!(parse_quantity(" 3 "), Ok(3));
        assert_eq!(parse_quantity("+3"), Ok(3));
        assert_eq!(parse_quantity("-2"), Ok(-2));
        assert!(parse_quantity("2.5").is_err());
        assert!(parse_quantity("abc").is_err());
        assert!(parse_quantity("").is_err());
        assert_eq!(
            parse_quantity("99999999999999999999").unwrap_err().kind(),
            &IntErrorKind::PosOverflow
        );
    }

    #[test]
    fn test_all_valid_lines_accepted() {
        let spec = CartSpec::new(vec![item("a", "A", 5), item("b", "B", 2)]).unwrap();

        let accepted = validate_cart(&spec, &strings(&["5", "1"])).unwrap();

        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[0].quantity, 5);
        assert_eq!(accepted[1].item.id, "b");
        assert_eq!(accepted[1].quantity, 1);
    }

    #[test]
    fn test_out_of_stock_wins_over_other_checks() {
        let spec = CartSpec::new(vec![item("b", "B", 0)]).unwrap();

        for raw in ["1", "0", "-4", "99", "abc"] {
            let errors = validate_cart(&spec, &strings(&[raw])).unwrap_err();
            assert_eq!(errors.kinds(), vec![ErrorKind::OutOfStock]);
        }
    }

    #[test]
    fn test_non_positive_is_incorrect_quantity() {
        let spec = CartSpec::new(vec![item("a", "A", 5)]).unwrap();

        for raw in ["0", "-1"] {
            let errors = validate_cart(&spec, &strings(&[raw])).unwrap_err();
            assert_eq!(errors.kinds(), vec![ErrorKind::IncorrectQuantity]);
            assert_eq!(errors.messages(), vec!["Entered value for A is <= 0."]);
        }
    }

    #[test]
    fn test_non_numeric_is_recoverable() {
        let spec = CartSpec::new(vec![item("a", "A", 5)]).unwrap();

        let errors = validate_cart(&spec, &strings(&["three"])).unwrap_err();

        assert_eq!(errors.kinds(), vec![ErrorKind::IncorrectQuantity]);
        assert_eq!(
            errors.messages(),
            vec!["Entered value for A is not a whole number."]
        );
    }

    #[test]
    fn test_more_than_stock_is_less_quantity() {
        let spec = CartSpec::new(vec![item("a", "A", 2)]).unwrap();

        let errors = validate_cart(&spec, &strings(&["5"])).unwrap_err();

        assert_eq!(errors.kinds(), vec![ErrorKind::LessQuantity]);
        assert_eq!(
            errors.messages(),
            vec!["I’m sorry but we only have 2 of A left"]
        );
    }

    #[test]
    fn test_huge_quantity_is_classified_by_size() {
        let spec = CartSpec::new(vec![item("a", "A", 2)]).unwrap();

        let errors = validate_cart(&spec, &strings(&["99999999999999999999"])).unwrap_err();
        assert_eq!(errors.kinds(), vec![ErrorKind::LessQuantity]);
        assert_eq!(
            errors.messages(),
            vec!["I’m sorry but we only have 2 of A left"]
        );

        let errors = validate_cart(&spec, &strings(&["-99999999999999999999"])).unwrap_err();
        assert_eq!(errors.kinds(), vec![ErrorKind::IncorrectQuantity]);
        assert_eq!(errors.messages(), vec!["Entered value for A is <= 0."]);
    }

    #[test]
    fn test_one_bad_line_rejects_whole_cart() {
        let spec = CartSpec::new(vec![item("a", "A", 5), item("b", "B", 0)]).unwrap();

        let errors = validate_cart(&spec, &strings(&["3", "1"])).unwrap_err();

        assert_eq!(errors.len(), 1);
        let err = errors.iter().next().unwrap();
        assert_eq!(err.kind, ErrorKind::OutOfStock);
        assert_eq!(err.product_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_errors_collected_in_cart_order() {
        let spec = CartSpec::new(vec![
            item("a", "A", 0),
            item("b", "B", 5),
            item("c", "C", 1),
            item("d", "D", 3),
        ])
        .unwrap();

        let errors = validate_cart(&spec, &strings(&["1", "0", "2", "3"])).unwrap_err();

        assert_eq!(
            errors.kinds(),
            vec![
                ErrorKind::OutOfStock,
                ErrorKind::IncorrectQuantity,
                ErrorKind::LessQuantity,
            ]
        );
        let ids: Vec<_> = errors.iter().filter_map(|e| e.product_id.clone()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let spec = CartSpec::new(vec![item("a", "A", 5), item("b", "B", 5)]).unwrap();

        for submitted in [strings(&["1"]), strings(&["1", "1", "1"]), Vec::new()] {
            let errors = validate_cart(&spec, &submitted).unwrap_err();
            assert_eq!(errors.kinds(), vec![ErrorKind::IncompleteList]);
        }
    }

    #[test]
    fn test_empty_cart_empty_submission_is_ok() {
        let spec = CartSpec::default();
        assert!(validate_cart(&spec, &[]).unwrap().is_empty());
    }
}
