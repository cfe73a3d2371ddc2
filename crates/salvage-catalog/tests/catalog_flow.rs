//! End-to-end catalog requests against a migrated in-memory SQLite database,
//! plus the facet/total reconciliation property over the in-memory source.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

use salvage_catalog::{
    CatalogError, CatalogService, CatalogSettings, CatalogSource, MemorySource, SqliteSource,
};
use salvage_core::codec;
use salvage_core::presentation::{SidebarState, VisibleNode};
use salvage_core::{
    Availability, Category, CategoryId, Classification, FilterState, Item, ItemStatus, Vendor,
    VendorId,
};
use salvage_db::{Database, DbConfig};

// =============================================================================
// Fixtures
// =============================================================================

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

fn item(id: i64, name: &str, category: Option<&str>) -> Item {
    Item {
        id: id.into(),
        name: name.to_string(),
        price_minor: Some(id * 1000),
        status: ItemStatus::Published,
        availability: Availability::Available,
        classification: None,
        category_id: category.map(CategoryId::from),
        vendor_id: VendorId::from("v-1"),
        thumbnail: None,
        featured: false,
        created_at: at(id),
        updated_at: at(id),
    }
}

fn taxonomy() -> Vec<Category> {
    let hardware = Category::top_level("1", "Hardware", "hardware");
    let hinges = Category::child_of(&hardware, "2", "Hinges", "hinges");
    let doors = Category::top_level("3", "Doors", "doors");
    vec![hardware, hinges, doors]
}

async fn database(items: &[Item]) -> Database {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    db.vendors()
        .insert(&Vendor {
            id: VendorId::from("v-1"),
            shop_name: "Yard & Beam".into(),
        })
        .await
        .unwrap();
    for category in taxonomy() {
        db.categories().insert(&category).await.unwrap();
    }
    for it in items {
        db.items().insert(it).await.unwrap();
    }
    db
}

/// Hardware(1) ⊃ Hinges(2): item 10 in Hinges, item 11 (sold) in Hardware.
async fn hardware_service() -> CatalogService {
    let mut gate = item(11, "Iron Gate", Some("1"));
    gate.availability = Availability::Sold;
    let mut draft = item(12, "Pine Door", Some("3"));
    draft.status = ItemStatus::Draft;

    let db = database(&[item(10, "Brass Butt Hinge", Some("2")), gate, draft]).await;
    CatalogService::new(Arc::new(SqliteSource::new(db)), CatalogSettings::default())
}

fn ids(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_unfiltered_tree_counts_both_levels() {
    let service = hardware_service().await;
    let page = service.browse_query("category=all").await.unwrap();

    let tree = serde_json::to_value(&page.category_tree).unwrap();
    assert_eq!(tree["1"]["totalCount"], json!(2));
    assert_eq!(tree["1"]["children"]["2"]["count"], json!(1));
    assert_eq!(tree["3"]["totalCount"], json!(0));
    assert_eq!(page.total_count(), 2);
}

#[tokio::test]
async fn test_parent_category_includes_children() {
    let service = hardware_service().await;
    let page = service.browse_query("category=hardware").await.unwrap();

    let mut found = ids(&page.items);
    found.sort();
    assert_eq!(found, vec!["10", "11"]);

    // Sold items stay listed
    assert!(page.items.iter().any(|i| i.is_sold()));
}

#[tokio::test]
async fn test_child_category_is_exact() {
    let service = hardware_service().await;
    let page = service.browse_query("category=hinges").await.unwrap();

    assert_eq!(ids(&page.items), vec!["10"]);
    // The tree still counts every category
    assert_eq!(page.category_tree.total(), 2);
}

#[tokio::test]
async fn test_numeric_search_matches_id_or_name() {
    let db = database(&[
        item(11, "Iron Gate", Some("1")),
        item(3, "Set of 11 Tiles", Some("3")),
        item(4, "Oak Bench", Some("3")),
    ])
    .await;
    let service = CatalogService::new(Arc::new(SqliteSource::new(db)), CatalogSettings::default());

    let page = service.browse_query("search=11").await.unwrap();
    let mut found = ids(&page.items);
    found.sort();
    assert_eq!(found, vec!["11", "3"]);

    let page = service.browse_query("search=gate").await.unwrap();
    assert_eq!(ids(&page.items), vec!["11"]);
}

#[tokio::test]
async fn test_thirty_items_paginate() {
    let items: Vec<Item> = (1..=30)
        .map(|n| item(n, &format!("Cast Iron Radiator {}", n), Some("3")))
        .collect();
    let db = database(&items).await;
    let service = CatalogService::new(Arc::new(SqliteSource::new(db)), CatalogSettings::default());

    let first = service.browse_query("").await.unwrap();
    assert_eq!(first.items.len(), 25);
    assert_eq!(first.total_count(), 30);
    assert_eq!(first.total_pages(), 2);

    let second = service.browse_query("page=2").await.unwrap();
    assert_eq!(second.items.len(), 5);

    let third = service.browse_query("page=3").await.unwrap();
    assert!(third.items.is_empty());
    assert_eq!(third.total_pages(), 2);

    // Pages do not overlap
    let mut seen = ids(&first.items);
    seen.extend(ids(&second.items));
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 30);
}

#[tokio::test]
async fn test_price_sort_puts_poa_last() {
    let mut poa = item(5, "Marble Fire Surround", Some("3"));
    poa.price_minor = None;
    let db = database(&[item(1, "Door Knob", Some("3")), poa, item(9, "Oak Door", Some("3"))]).await;
    let service = CatalogService::new(Arc::new(SqliteSource::new(db)), CatalogSettings::default());

    let asc = service.browse_query("sort=price").await.unwrap();
    assert_eq!(ids(&asc.items), vec!["1", "9", "5"]);

    let desc = service.browse_query("sort=-price").await.unwrap();
    assert_eq!(ids(&desc.items), vec!["9", "1", "5"]);
}

#[tokio::test]
async fn test_malformed_input_falls_back_to_defaults() {
    let service = hardware_service().await;
    let page = service
        .browse_query("page=-4&limit=7&sort=colour&view=carousel&classification=ancient")
        .await
        .unwrap();

    assert_eq!(page.active_filters, FilterState::default());
    assert_eq!(page.query, "");
    assert_eq!(page.total_count(), 2);
}

#[tokio::test]
async fn test_sidebar_toggles_without_querying() {
    let service = hardware_service().await;
    let page = service.browse_query("category=hinges").await.unwrap();

    let mut sidebar = SidebarState::new(&page.category_tree, page.active_filters.category());
    assert!(sidebar.is_expanded(&CategoryId::from("1")));
    assert_eq!(sidebar.visible_nodes().len(), 2);

    sidebar.toggle(&CategoryId::from("1"));
    let rows = sidebar.visible_nodes();
    assert_eq!(rows.len(), 1);
    assert!(matches!(rows[0], VisibleNode::Parent { expanded: false, .. }));
}

#[tokio::test]
async fn test_chips_remove_one_constraint() {
    let service = hardware_service().await;
    let page = service
        .browse_query("category=hardware&classification=antique&page=2")
        .await
        .unwrap();

    let removals: Vec<(&str, &str)> = page
        .chips
        .iter()
        .map(|c| (c.key.as_str(), c.remove_query.as_str()))
        .collect();
    assert_eq!(
        removals,
        vec![
            ("category", "classification=antique"),
            ("classification", "category=hardware"),
        ]
    );
}

#[tokio::test]
async fn test_closed_pool_fails_request_and_renders_empty_state() {
    let db = database(&[item(10, "Brass Butt Hinge", Some("2"))]).await;
    let source = SqliteSource::new(db.clone());
    let service = CatalogService::new(Arc::new(source), CatalogSettings::default());
    db.close().await;

    let err = service.browse_query("").await.unwrap_err();
    assert!(matches!(err, CatalogError::Backend(_)));

    let state = codec::from_query_string("category=hinges");
    let page = service.browse_or_empty(&state).await;
    assert!(page.unavailable);
    assert_eq!(page.query, "category=hinges");
}

// =============================================================================
// Reconciliation Property
// =============================================================================

fn arb_item() -> impl Strategy<Value = Item> {
    (
        1..500_i64,
        prop::sample::select(vec!["1", "2", "3"]),
        prop::option::of(prop::sample::select(Classification::ALL.to_vec())),
        prop::sample::select(vec!["v-1", "v-2"]),
        prop::bool::ANY,
        prop::bool::ANY,
        prop::bool::ANY,
    )
        .prop_map(|(id, category, classification, vendor, published, sold, brass)| {
            let name = if brass { "Brass Hinge" } else { "Oak Door" };
            let mut it = item(id, name, Some(category));
            it.classification = classification;
            it.vendor_id = VendorId::from(vendor);
            it.status = if published {
                ItemStatus::Published
            } else {
                ItemStatus::Draft
            };
            it.availability = if sold {
                Availability::Sold
            } else {
                Availability::Available
            };
            it
        })
}

fn arb_query() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["", "classification=antique", "classification=modern"]),
        prop::sample::select(vec!["", "vendor=v-1", "vendor=v-2"]),
        prop::sample::select(vec!["", "search=brass", "search=7"]),
    )
        .prop_map(|(a, b, c)| {
            [a, b, c]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join("&")
        })
}

proptest! {
    #[test]
    fn test_tree_counts_reconcile_with_total(
        items in prop::collection::vec(arb_item(), 0..40),
        query in arb_query(),
    ) {
        let mut items = items;
        items.sort_by_key(|i| i.id.clone());
        items.dedup_by_key(|i| i.id.clone());

        let source: Arc<dyn CatalogSource> = Arc::new(MemorySource::new(taxonomy(), vec![], items));
        let service = CatalogService::new(source, CatalogSettings::default());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let page = runtime.block_on(service.browse_query(&query)).unwrap();

        // Every generated item resolves to a category, so the tree accounts
        // for all of them
        let children: u64 = page
            .category_tree
            .iter()
            .flat_map(|(_, node)| node.children.values().map(|c| c.count))
            .sum();
        let direct: u64 = page.category_tree.iter().map(|(_, node)| node.direct_count()).sum();
        prop_assert_eq!(children + direct, page.total_count());
        prop_assert_eq!(page.category_tree.total(), page.total_count());

        for node in &page.sidebar {
            prop_assert!(node.total_count > 0);
        }
    }
}
