//! # Error Types
//!
//! Domain error types for salvage-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  salvage-core errors (this file)                                       │
//! │  └── ValidationError  - Enumerated value / slug parse failures         │
//! │                                                                         │
//! │  salvage-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  salvage-catalog errors                                                │
//! │  └── CatalogError     - Backend unavailable, timeout, config           │
//! │                                                                         │
//! │  Flow: ValidationError ─► (codec: replaced by default value)           │
//! │        DbError ─► CatalogError ─► empty-but-intentional page           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Filter Input Never Fails a Request
//! The query-string codec calls the `FromStr` impls that produce these
//! errors, then swaps any failure for the dimension's default. A
//! `ValidationError` only surfaces to callers that parse values directly
//! (config loading, inserts into the database).

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., slug with spaces, non-numeric page).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Builds a `NotAllowed` error from a static list of accepted values.
    pub fn not_allowed(field: &str, allowed: &[&str]) -> Self {
        ValidationError::NotAllowed {
            field: field.to_string(),
            allowed: allowed.iter().map(|v| v.to_string()).collect(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
