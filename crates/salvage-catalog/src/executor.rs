//! # Paginated Query Executor
//!
//! Runs the full predicate (category included) as a page read and an
//! aggregate count over the same predicate. The two reads are concurrent.

use serde::Serialize;
use tokio::try_join;

use salvage_core::{Item, PageMeta, PageSize, Predicate, SortKey};

use crate::error::CatalogResult;
use crate::source::CatalogSource;

/// One page of items with its pagination figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub meta: PageMeta,
}

/// Fetches page `page` of the items matching `predicate`.
///
/// A page past the last page yields no items and no error.
pub async fn fetch_page(
    source: &dyn CatalogSource,
    predicate: &Predicate,
    sort: &SortKey,
    page: u32,
    limit: PageSize,
) -> CatalogResult<ItemPage> {
    let page = page.max(1);

    let (mut items, total) = try_join!(
        source.list_items(predicate, sort, page, limit),
        source.count_items(predicate),
    )?;

    let meta = PageMeta::new(total, page, limit);
    if meta.is_beyond_end() {
        items.clear();
    }

    Ok(ItemPage { items, meta })
}
