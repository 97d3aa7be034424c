//! # Change Detection
//!
//! Decides whether a resubmitted cart differs from a baseline, so the
//! caller can skip revalidating an identical submission.
//!
//! ## Comparison Rules
//! ```text
//! absent ≡ []
//! len(baseline) != len(submitted)         → changed
//! {str(v) for v in baseline}
//!     != {str(v) for v in submitted}      → changed
//! otherwise                               → unchanged
//! ```
//!
//! The set comparison ignores order and duplicates, so `["1", "2"]` and
//! `["2", "1"]` are the same submission.

use std::collections::HashSet;

/// Checks whether `data` differs from `initial`.
///
/// ## Example
/// ```rust
/// use cartcheck_core::has_changed;
///
/// let none: Option<&[String]> = None;
/// let empty: &[String] = &[];
/// assert!(!has_changed(Some(empty), none));
/// assert!(!has_changed(Some(&["1", "2"][..]), Some(&["2", "1"][..])));
/// assert!(has_changed(Some(&["1"][..]), Some(&["1", "1"][..])));
/// ```
pub fn has_changed<A, B>(initial: Option<&[A]>, data: Option<&[B]>) -> bool
where
    A: ToString,
    B: ToString,
{
    let initial = initial.unwrap_or(&[]);
    let data = data.unwrap_or(&[]);

    if initial.len() != data.len() {
        return true;
    }

    let initial_set: HashSet<String> = initial.iter().map(ToString::to_string).collect();
    let data_set: HashSet<String> = data.iter().map(ToString::to_string).collect();

    initial_set != data_set
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: Option<&[&str]> = None;

    #[test]
    fn test_absent_equals_empty() {
        assert!(!has_changed(NONE, NONE));
        assert!(!has_changed(Some(&[] as &[&str]), NONE));
        assert!(!has_changed(NONE, Some(&[] as &[&str])));
    }

    #[test]
    fn test_order_insensitive() {
        assert!(!has_changed(Some(&["1", "2"][..]), Some(&["2", "1"][..])));
    }

    #[test]
    fn test_length_difference_is_change() {
        assert!(has_changed(Some(&["1"][..]), Some(&["1", "1"][..])));
        assert!(has_changed(NONE, Some(&["1"][..])));
    }

    #[test]
    fn test_duplicate_insensitive_at_equal_length() {
        // Same length, same set of values
        assert!(!has_changed(Some(&["1", "1", "2"][..]), Some(&["1", "2", "2"][..])));
    }

    #[test]
    fn test_compares_string_forms() {
        let baseline: &[i64] = &[5, 0];
        assert!(!has_changed(Some(baseline), Some(&["0", "5"][..])));
        assert!(has_changed(Some(baseline), Some(&["5", "1"][..])));
    }
}
