//! # Predicate → SQL
//!
//! Renders a [`Predicate`] into a `WHERE` clause on a [`QueryBuilder`].
//! Every value is a bound parameter; only column names and operators are
//! pushed as text.
//!
//! ## Item Source
//! ```text
//! items i
//!   LEFT JOIN categories c ON c.id = i.category_id          own category
//!   LEFT JOIN categories p ON p.id = c.parent_id            its parent
//!                          AND p.id <> c.id                 (self-parent ≠ parent)
//! ```
//!
//! ```text
//! And[Equals(status,"published"), Or[Contains(name,"11"), Equals(id,"11")]]
//!   ──► (i.status = ? AND (i.name LIKE ? ESCAPE '\' OR i.id = ?))
//! ```

use salvage_core::{Field, GroupField, Predicate, SortField, SortKey};
use sqlx::{QueryBuilder, Sqlite};

/// Item columns in `Item` field order.
pub const ITEM_COLUMNS: &str = "i.id, i.name, i.price_minor, i.status, i.availability, \
     i.classification, i.category_id, i.vendor_id, i.thumbnail, i.featured, \
     i.created_at, i.updated_at";

/// `FROM` clause joining each item to its category and that category's parent.
pub const ITEM_SOURCE: &str = " FROM items i \
     LEFT JOIN categories c ON c.id = i.category_id \
     LEFT JOIN categories p ON p.id = c.parent_id AND p.id <> c.id";

/// Column holding a predicate field.
pub fn column(field: Field) -> &'static str {
    match field {
        Field::Id => "i.id",
        Field::Name => "i.name",
        Field::Status => "i.status",
        Field::Availability => "i.availability",
        Field::Classification => "i.classification",
        Field::VendorId => "i.vendor_id",
        Field::CategorySlug => "c.slug",
        Field::ParentCategorySlug => "p.slug",
    }
}

/// Column a grouped count is keyed by.
pub fn group_column(group: GroupField) -> &'static str {
    match group {
        GroupField::CategoryId => "i.category_id",
        GroupField::Classification => "i.classification",
        GroupField::Vendor => "i.vendor_id",
    }
}

/// Escapes `%`, `_` and the escape character itself for a `LIKE … ESCAPE '\'`.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Pushes `predicate` as a boolean SQL expression.
///
/// An empty `Or` renders as `0`, an empty `And` as `1`.
pub fn push_predicate(qb: &mut QueryBuilder<'_, Sqlite>, predicate: &Predicate) {
    match predicate {
        Predicate::Equals { field, value } => {
            qb.push(column(*field)).push(" = ").push_bind(value.clone());
        }
        Predicate::Contains { field, value } => {
            qb.push(column(*field))
                .push(" LIKE ")
                .push_bind(format!("%{}%", escape_like(value)))
                .push(" ESCAPE '\\'");
        }
        Predicate::Or(clauses) => push_group(qb, clauses, " OR ", "0"),
        Predicate::And(clauses) => push_group(qb, clauses, " AND ", "1"),
    }
}

fn push_group(
    qb: &mut QueryBuilder<'_, Sqlite>,
    clauses: &[Predicate],
    separator: &str,
    empty: &str,
) {
    if clauses.is_empty() {
        qb.push(empty);
        return;
    }

    qb.push("(");
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        push_predicate(qb, clause);
    }
    qb.push(")");
}

/// Pushes `WHERE <predicate>`.
pub fn push_where(qb: &mut QueryBuilder<'_, Sqlite>, predicate: &Predicate) {
    qb.push(" WHERE ");
    push_predicate(qb, predicate);
}

/// `ORDER BY` matching [`SortKey::compare`]: POA prices last, id ascending
/// as the final tie-break. A primary id sort orders by length first so
/// numeric ids sort numerically.
pub fn order_by(sort: &SortKey) -> String {
    let dir = if sort.is_descending() { "DESC" } else { "ASC" };
    match sort.field {
        SortField::Price => format!(
            " ORDER BY (i.price_minor IS NULL) ASC, i.price_minor {}, i.id ASC",
            dir
        ),
        SortField::CreatedAt => format!(" ORDER BY i.created_at {}, i.id ASC", dir),
        SortField::UpdatedAt => format!(" ORDER BY i.updated_at {}, i.id ASC", dir),
        SortField::Name => format!(" ORDER BY i.name COLLATE NOCASE {}, i.id ASC", dir),
        SortField::Id => format!(" ORDER BY length(i.id) {0}, i.id {0}", dir),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
