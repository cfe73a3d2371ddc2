//! # Validation Module
//!
//! Normalization of raw filter input and validation of catalog records.
//!
//! ## Two Kinds of Input
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Input Handling                                     │
//! │                                                                         │
//! │  Query-string parameters (untrusted, user-editable URL)                │
//! │  ├── normalize_* functions                                             │
//! │  └── NEVER fail: malformed → "no constraint" / default                 │
//! │                                                                         │
//! │  Catalog records (categories, vendors, items being stored)             │
//! │  ├── validate_* functions                                              │
//! │  └── Return ValidationError before anything reaches SQLite             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::{MAX_SEARCH_LEN, SENTINEL_ALL};

// =============================================================================
// Filter Normalizers
// =============================================================================

/// Normalizes a dimension value that may carry the `all` sentinel.
///
/// Empty, whitespace-only and `all` (any case) all mean "no constraint".
///
/// ```rust
/// use salvage_core::validation::normalize_dimension;
///
/// assert_eq!(normalize_dimension(" hinges "), Some("hinges".to_string()));
/// assert_eq!(normalize_dimension("ALL"), None);
/// assert_eq!(normalize_dimension(""), None);
/// ```
pub fn normalize_dimension(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(SENTINEL_ALL) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Normalizes free-text search input.
///
/// ## Rules
/// - Leading/trailing whitespace is removed, inner whitespace kept
/// - Empty → no search
/// - Truncated to [`MAX_SEARCH_LEN`] characters (on a char boundary)
pub fn normalize_search(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let truncated: String = trimmed.chars().take(MAX_SEARCH_LEN).collect();
    // Truncation can expose trailing whitespace
    let truncated = truncated.trim_end();
    Some(truncated.to_string())
}

/// Parses a 1-based page number; anything unusable becomes page 1.
pub fn normalize_page(raw: &str) -> u32 {
    raw.trim().parse::<u32>().ok().filter(|p| *p >= 1).unwrap_or(1)
}

/// Returns the canonical id a search string denotes, if the *whole* string
/// is a base-10 integer of any length.
///
/// `"11"`, `"+11"` and `"011"` give `Some("11")`; `"11 tiles"`, `"1.5"` and
/// `""` give `None`.
pub fn parse_integer_search(search: &str) -> Option<String> {
    let s = search.trim();
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = digits.trim_start_matches('0');
    Some(match (digits.is_empty(), negative) {
        (true, _) => "0".to_string(),
        (false, true) => format!("-{}", digits),
        (false, false) => digits.to_string(),
    })
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a category slug.
///
/// ## Rules
/// - Must not be empty
/// - Lowercase ASCII letters, digits and hyphens only (URL-safe)
/// - Must not be the reserved sentinel `all`
/// - At most 80 characters
///
/// ```rust
/// use salvage_core::validation::validate_slug;
///
/// assert!(validate_slug("door-furniture").is_ok());
/// assert!(validate_slug("Door Furniture").is_err());
/// assert!(validate_slug("all").is_err());
/// ```
pub fn validate_slug(slug: &str) -> ValidationResult<()> {
    if slug.is_empty() {
        return Err(ValidationError::Required {
            field: "slug".to_string(),
        });
    }

    if slug.len() > 80 {
        return Err(ValidationError::TooLong {
            field: "slug".to_string(),
            max: 80,
        });
    }

    if slug == SENTINEL_ALL {
        return Err(ValidationError::InvalidFormat {
            field: "slug".to_string(),
            reason: "'all' is reserved".to_string(),
        });
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "slug".to_string(),
            reason: "must contain only lowercase letters, digits, and hyphens".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (item, category or shop name).
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an item price in minor units. `None` (POA) is always valid.
pub fn validate_price(price_minor: Option<i64>) -> ValidationResult<()> {
    match price_minor {
        Some(p) if p < 0 => Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "must not be negative".to_string(),
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dimension() {
        assert_eq!(normalize_dimension("hardware"), Some("hardware".to_string()));
        assert_eq!(normalize_dimension("all"), None);
        assert_eq!(normalize_dimension("All"), None);
        assert_eq!(normalize_dimension("   "), None);
    }

    #[test]
    fn test_normalize_search() {
        assert_eq!(normalize_search("  iron gate "), Some("iron gate".to_string()));
        assert_eq!(normalize_search(""), None);
        assert_eq!(normalize_search("\t\n"), None);

        let long = "a".repeat(MAX_SEARCH_LEN + 20);
        assert_eq!(normalize_search(&long).unwrap().len(), MAX_SEARCH_LEN);
    }

    #[test]
    fn test_normalize_search_truncates_on_char_boundary() {
        let long = "é".repeat(MAX_SEARCH_LEN + 1);
        let normalized = normalize_search(&long).unwrap();
        assert_eq!(normalized.chars().count(), MAX_SEARCH_LEN);
    }

    #[test]
    fn test_normalize_page() {
        assert_eq!(normalize_page("3"), 3);
        assert_eq!(normalize_page("0"), 1);
        assert_eq!(normalize_page("-2"), 1);
        assert_eq!(normalize_page("two"), 1);
        assert_eq!(normalize_page(""), 1);
    }

    #[test]
    fn test_parse_integer_search() {
        assert_eq!(parse_integer_search("11").as_deref(), Some("11"));
        assert_eq!(parse_integer_search(" 011 ").as_deref(), Some("11"));
        assert_eq!(parse_integer_search("+11").as_deref(), Some("11"));
        assert_eq!(parse_integer_search("000").as_deref(), Some("0"));
        assert_eq!(parse_integer_search("-0").as_deref(), Some("0"));
        assert_eq!(parse_integer_search("11 tiles"), None);
        assert_eq!(parse_integer_search("1.5"), None);
        assert_eq!(parse_integer_search("oak"), None);
        assert_eq!(parse_integer_search("-"), None);
        assert_eq!(parse_integer_search(""), None);
    }

    #[test]
    fn test_parse_integer_search_beyond_i64() {
        assert_eq!(
            parse_integer_search("0099999999999999999999").as_deref(),
            Some("99999999999999999999")
        );
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("hinges").is_ok());
        assert!(validate_slug("door-knobs-2").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Hinges").is_err());
        assert!(validate_slug("door knobs").is_err());
        assert!(validate_slug(&"a".repeat(81)).is_err());
    }

    #[test]
    fn test_validate_name_and_price() {
        assert!(validate_name("name", "Reclaimed Oak Beam").is_ok());
        assert!(validate_name("name", "  ").is_err());
        assert!(validate_price(None).is_ok());
        assert!(validate_price(Some(0)).is_ok());
        assert!(validate_price(Some(-1)).is_err());
    }
}
