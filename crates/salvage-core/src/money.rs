//! # Money Module
//!
//! Prices are stored as integer minor units (pence). A missing price means
//! "price on application" and is modelled as `Option<Money>` on the item,
//! never as zero.
//!
//! ```rust
//! use salvage_core::money::Money;
//!
//! let price = Money::from_minor(125_000);
//! assert_eq!(price.to_string(), "£1,250.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Label shown instead of a price when the seller has not published one.
pub const PRICE_ON_APPLICATION: &str = "POA";

/// A monetary value in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a value from minor units.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a value from whole pounds and pence.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        Money(major * 100 + minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Formats as `£1,250.00`, grouping thousands.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = (abs / 100).to_string();
        let minor = abs % 100;

        let mut grouped = String::with_capacity(major.len() + major.len() / 3);
        for (i, ch) in major.chars().enumerate() {
            if i > 0 && (major.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{}£{}.{:02}", sign, grouped, minor)
    }
}

/// Renders an optional price for display, using [`PRICE_ON_APPLICATION`]
/// when absent.
pub fn price_label(price: Option<Money>) -> String {
    match price {
        Some(money) => money.to_string(),
        None => PRICE_ON_APPLICATION.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
