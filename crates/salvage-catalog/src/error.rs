//! # Catalog Error Types
//!
//! Failures of a catalog request. Malformed filter input never reaches here:
//! the codec normalizes it to defaults. What remains is the backend being
//! unreachable, the request running out of time, and configuration loading.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Catalog Error Categories                           │
//! │                                                                         │
//! │  ┌──────────────────────┐  ┌──────────────────┐  ┌──────────────────┐  │
//! │  │  Request-scoped      │  │  Configuration   │  │  Filesystem      │  │
//! │  │                      │  │                  │  │                  │  │
//! │  │  Backend             │  │  Config          │  │  Io              │  │
//! │  │  Timeout             │  │                  │  │                  │  │
//! │  └──────────────────────┘  └──────────────────┘  └──────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    // =========================================================================
    // Request Errors
    // =========================================================================
    /// A data source read failed.
    #[error("Catalog backend unavailable: {0}")]
    Backend(String),

    /// The concurrent fetch did not finish within the request budget.
    #[error("Catalog request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid catalog configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<salvage_db::DbError> for CatalogError {
    fn from(err: salvage_db::DbError) -> Self {
        CatalogError::Backend(err.to_string())
    }
}

impl From<toml::de::Error> for CatalogError {
    fn from(err: toml::de::Error) -> Self {
        CatalogError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CatalogError {
    fn from(err: toml::ser::Error) -> Self {
        CatalogError::Config(err.to_string())
    }
}

impl CatalogError {
    /// True for failures that should render the empty-but-intentional state
    /// rather than an error page.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CatalogError::Backend(_) | CatalogError::Timeout { .. })
    }

    pub fn is_config_error(&self) -> bool {
        matches!(self, CatalogError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use salvage_db::DbError;

    #[test]
    fn test_db_error_becomes_backend() {
        let err: CatalogError = DbError::PoolExhausted.into();
        assert!(matches!(err, CatalogError::Backend(_)));
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_error_display() {
        let err = CatalogError::Timeout { after_ms: 5000 };
        assert_eq!(err.to_string(), "Catalog request timed out after 5000ms");
        assert!(err.is_unavailable());

        let err = CatalogError::Config("default_limit must be one of 12, 25, 50, 100".into());
        assert!(err.is_config_error());
        assert!(!err.is_unavailable());
    }
}
