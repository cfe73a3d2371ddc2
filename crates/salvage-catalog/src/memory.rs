//! # In-Memory Catalog Source
//!
//! Evaluates predicates in process over fixed vectors. Used for tests and
//! demos; latency and failures can be injected per operation to exercise
//! the service's timeout and all-or-nothing behavior.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use salvage_core::{
    Category, CategoryLookup, GroupCount, GroupField, Item, PageSize, Predicate, SortKey, Vendor,
};

use crate::error::{CatalogError, CatalogResult};
use crate::source::CatalogSource;

/// Names a [`CatalogSource`] read for fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceOp {
    ListCategories,
    ListVendors,
    GroupedCount,
    ListItems,
    CountItems,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    categories: Vec<Category>,
    vendors: Vec<Vendor>,
    items: Vec<Item>,
    latency: Option<Duration>,
    failing: HashSet<SourceOp>,
}

impl MemorySource {
    pub fn new(categories: Vec<Category>, vendors: Vec<Vendor>, items: Vec<Item>) -> Self {
        MemorySource {
            categories,
            vendors,
            items,
            ..Default::default()
        }
    }

    /// Delays every read by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes `op` fail with a backend error.
    pub fn failing_on(mut self, op: SourceOp) -> Self {
        self.failing.insert(op);
        self
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    async fn enter(&self, op: SourceOp) -> CatalogResult<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.contains(&op) {
            return Err(CatalogError::Backend(format!("{:?} unavailable", op)));
        }
        Ok(())
    }

    fn matching<'a>(&'a self, predicate: &'a Predicate) -> impl Iterator<Item = &'a Item> + 'a {
        let lookup = CategoryLookup::new(&self.categories);
        self.items
            .iter()
            .filter(move |item| predicate.matches(item, &lookup))
    }
}

fn group_value(item: &Item, group: GroupField) -> Option<String> {
    match group {
        GroupField::CategoryId => item.category_id.as_ref().map(|id| id.as_str().to_string()),
        GroupField::Classification => item.classification.map(|c| c.as_str().to_string()),
        GroupField::Vendor => Some(item.vendor_id.as_str().to_string()),
    }
}

#[async_trait]
impl CatalogSource for MemorySource {
    async fn list_categories(&self) -> CatalogResult<Vec<Category>> {
        self.enter(SourceOp::ListCategories).await?;
        Ok(self.categories.clone())
    }

    async fn list_vendors(&self) -> CatalogResult<Vec<Vendor>> {
        self.enter(SourceOp::ListVendors).await?;
        let mut vendors = self.vendors.clone();
        vendors.sort_by(|a, b| {
            a.shop_name
                .to_ascii_lowercase()
                .cmp(&b.shop_name.to_ascii_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(vendors)
    }

    async fn grouped_count(
        &self,
        predicate: &Predicate,
        group: GroupField,
    ) -> CatalogResult<Vec<GroupCount>> {
        self.enter(SourceOp::GroupedCount).await?;

        // Ordered like SQL `ORDER BY column`: the NULL group first
        let mut groups: BTreeMap<Option<String>, u64> = BTreeMap::new();
        for item in self.matching(predicate) {
            *groups.entry(group_value(item, group)).or_default() += 1;
        }

        Ok(groups
            .into_iter()
            .map(|(group_value, count)| GroupCount { group_value, count })
            .collect())
    }

    async fn list_items(
        &self,
        predicate: &Predicate,
        sort: &SortKey,
        page: u32,
        limit: PageSize,
    ) -> CatalogResult<Vec<Item>> {
        self.enter(SourceOp::ListItems).await?;

        let mut items: Vec<Item> = self.matching(predicate).cloned().collect();
        items.sort_by(|a, b| sort.compare(a, b));

        let size = limit.get() as usize;
        let offset = (page.max(1) as usize - 1).saturating_mul(size);
        Ok(items.into_iter().skip(offset).take(size).collect())
    }

    async fn count_items(&self, predicate: &Predicate) -> CatalogResult<u64> {
        self.enter(SourceOp::CountItems).await?;
        Ok(self.matching(predicate).count() as u64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use salvage_core::predicate::Field;
    use salvage_core::{Availability, Classification, ItemStatus, VendorId};

    fn item(id: i64, name: &str, category: Option<&str>) -> Item {
        let at = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        Item {
            id: id.into(),
            name: name.to_string(),
            price_minor: Some(id * 500),
            status: ItemStatus::Published,
            availability: Availability::Available,
            classification: None,
            category_id: category.map(Into::into),
            vendor_id: VendorId::from("v-1"),
            thumbnail: None,
            featured: false,
            created_at: at,
            updated_at: at,
        }
    }

    fn source() -> MemorySource {
        let doors = Category::top_level("1", "Doors", "doors");
        let internal = Category::child_of(&doors, "2", "Internal Doors", "internal-doors");

        let mut panelled = item(3, "Victorian Panelled Door", Some("2"));
        panelled.classification = Some(Classification::Antique);

        MemorySource::new(
            vec![doors, internal],
            vec![
                Vendor {
                    id: VendorId::from("v-2"),
                    shop_name: "yard & beam".into(),
                },
                Vendor {
                    id: VendorId::from("v-1"),
                    shop_name: "Architectural Finds".into(),
                },
            ],
            vec![panelled, item(1, "Ledged Door", Some("1")), item(2, "Door Stop", None)],
        )
    }

    #[tokio::test]
    async fn test_grouped_count_puts_missing_group_first() {
        let groups = source()
            .grouped_count(&Predicate::And(vec![]), GroupField::Classification)
            .await
            .unwrap();

        assert_eq!(
            groups,
            vec![
                GroupCount {
                    group_value: None,
                    count: 2
                },
                GroupCount::new("antique", 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_child_slug_resolves_through_categories() {
        let source = source();
        let predicate = Predicate::equals(Field::CategorySlug, "internal-doors");

        assert_eq!(source.count_items(&predicate).await.unwrap(), 1);
        let items = source
            .list_items(&predicate, &SortKey::default(), 1, PageSize::default())
            .await
            .unwrap();
        assert_eq!(items[0].id.as_str(), "3");
    }

    #[tokio::test]
    async fn test_vendors_sorted_by_shop_name() {
        let vendors = source().list_vendors().await.unwrap();
        let names: Vec<&str> = vendors.iter().map(|v| v.shop_name.as_str()).collect();
        assert_eq!(names, vec!["Architectural Finds", "yard & beam"]);
    }

    #[tokio::test]
    async fn test_failing_op_only_breaks_that_read() {
        let source = source().failing_on(SourceOp::CountItems);

        let err = source.count_items(&Predicate::And(vec![])).await.unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(source.list_categories().await.unwrap().len(), 2);
    }
}
