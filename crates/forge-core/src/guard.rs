//! Reusable precondition checks.
//!
//! Every guard either returns the (possibly normalized) value or fails with a
//! [`DomainError`] naming the parameter. One error kind covers every rule;
//! callers tell failures apart by `field` and `message` only.

use crate::error::{DomainError, DomainResult};
use crate::fixed::Fixed64;
use crate::id::{Id, IdKind};
use std::fmt::Display;

/// Required text: must not be blank; trimmed length must not exceed `max_len`
/// characters. Returns the trimmed text.
pub fn required(value: &str, field: &str, max_len: usize) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::new(field, "is required."));
    }
    check_len(trimmed, field, max_len)?;
    Ok(trimmed.to_string())
}

/// Optional text: `None` stays `None`, blank collapses to `None`, anything
/// else is trimmed and length checked like [`required`].
pub fn optional(value: Option<&str>, field: &str, max_len: usize) -> DomainResult<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    check_len(trimmed, field, max_len)?;
    Ok(Some(trimmed.to_string()))
}

fn check_len(value: &str, field: &str, max_len: usize) -> DomainResult<()> {
    if value.chars().count() > max_len {
        return Err(DomainError::new(
            field,
            format!("must be at most {max_len} characters."),
        ));
    }
    Ok(())
}

/// Strictly positive amount.
pub fn positive(value: Fixed64, field: &str) -> DomainResult<Fixed64> {
    if value <= Fixed64::ZERO {
        return Err(DomainError::new(field, "must be a positive number."));
    }
    Ok(value)
}

/// Inclusive range check.
pub fn in_range<T: PartialOrd + Display>(value: T, field: &str, min: T, max: T) -> DomainResult<T> {
    if value < min || value > max {
        return Err(DomainError::new(
            field,
            format!("must be between {min} and {max}."),
        ));
    }
    Ok(value)
}

/// Rejects the sentinel all-zero identifier.
pub fn not_default<K: IdKind>(id: Id<K>, field: &str) -> DomainResult<Id<K>> {
    if id.is_empty() {
        return Err(DomainError::new(field, "must not be the default value."));
    }
    Ok(id)
}

/// Rejects an absent value; returns the present one.
pub fn not_null<T>(value: Option<T>, field: &str) -> DomainResult<T> {
    value.ok_or_else(|| DomainError::new(field, "is required."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::f64_to_fixed64;
    use crate::id::ItemId;

    #[test]
    fn required_rejects_empty_and_blank() {
        assert!(required("", "name", 10).is_err());
        assert!(required("   ", "name", 10).is_err());
        assert!(required("\t\n", "name", 10).is_err());
    }

    #[test]
    fn required_rejects_too_long() {
        let err = required("abcdefghijk", "name", 10).unwrap_err();
        assert_eq!(err.field, "name");
        assert!(err.message.contains("at most 10"), "got: {err}");
    }

    #[test]
    fn required_trims() {
        assert_eq!(required("  hi  ", "name", 10).unwrap(), "hi");
    }

    #[test]
    fn required_length_applies_after_trim() {
        assert_eq!(required("  abcdefghij  ", "name", 10).unwrap(), "abcdefghij");
    }

    #[test]
    fn required_counts_characters_not_bytes() {
        assert_eq!(required("ééééé", "name", 5).unwrap(), "ééééé");
    }

    #[test]
    fn optional_collapses_blank_to_none() {
        assert_eq!(optional(None, "description", 5).unwrap(), None);
        assert_eq!(optional(Some("   "), "description", 5).unwrap(), None);
        assert_eq!(
            optional(Some(" ok "), "description", 5).unwrap(),
            Some("ok".to_string())
        );
        assert!(optional(Some("toolong"), "description", 5).is_err());
    }

    #[test]
    fn positive_rejects_zero_and_negative() {
        assert!(positive(Fixed64::ZERO, "amount").is_err());
        assert!(positive(f64_to_fixed64(-1.0), "amount").is_err());
        assert!(positive(Fixed64::DELTA, "amount").is_ok());
    }

    #[test]
    fn in_range_is_inclusive() {
        assert_eq!(in_range(1, "x", 1, 3).unwrap(), 1);
        assert_eq!(in_range(3, "x", 1, 3).unwrap(), 3);
        assert!(in_range(0, "x", 1, 3).is_err());
        assert!(in_range(4, "x", 1, 3).is_err());
    }

    #[test]
    fn not_default_rejects_sentinel() {
        let err = not_default(ItemId::EMPTY, "item_id").unwrap_err();
        assert_eq!(err.field, "item_id");
        assert!(not_default(ItemId::new(), "item_id").is_ok());
    }

    #[test]
    fn not_null_unwraps_present() {
        assert_eq!(not_null(Some(3), "x").unwrap(), 3);
        assert_eq!(not_null::<u8>(None, "x").unwrap_err().field, "x");
    }
}
