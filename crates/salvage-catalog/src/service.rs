//! # Catalog Service
//!
//! One browse request end to end.
//!
//! ```text
//! FilterState ──► criteria ──┬─► list_categories ───────────┐
//!                            ├─► list_vendors (opt) ────────┤
//!                            ├─► counts by category ────────┤  try_join!
//!                            ├─► counts by classification ──┤  under one
//!                            ├─► counts by vendor ──────────┤  timeout
//!                            └─► page + total ──────────────┘
//!                                                            │
//!                   tree, sidebar, facets, chips ◄───────────┘
//! ```
//!
//! Any read failing, or the budget expiring, fails the whole request.
//! Nothing is retried and nothing is kept between requests.

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use salvage_core::codec::{FilterChip, QueryCodec};
use salvage_core::presentation::{derive_sidebar, SidebarNode};
use salvage_core::{
    compose, Category, CategoryTree, FacetEntry, FilterState, GroupCount, GroupField, Item,
    PageMeta, Vendor,
};

use crate::config::CatalogSettings;
use crate::error::{CatalogError, CatalogResult};
use crate::executor::{self, ItemPage};
use crate::facets;
use crate::source::CatalogSource;

// =============================================================================
// Catalog Page
// =============================================================================

/// Everything the presentation layer needs to render one catalog view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub items: Vec<Item>,

    /// `page`, `limit`, `totalCount`, `totalPages`, `hasPrevious`, `hasNext`.
    #[serde(flatten)]
    pub meta: PageMeta,

    pub category_tree: CategoryTree,

    /// Visible sidebar derived from `category_tree` and the active category.
    pub sidebar: Vec<SidebarNode>,

    pub classification_facets: Vec<FacetEntry>,

    pub vendor_facets: Vec<FacetEntry>,

    pub active_filters: FilterState,

    pub chips: Vec<FilterChip>,

    /// Canonical query string of `active_filters`.
    pub query: String,

    /// Set when the backend could not serve the request.
    pub unavailable: bool,
}

impl CatalogPage {
    /// The empty-but-intentional page rendered when the backend fails.
    pub fn unavailable(filters: FilterState) -> Self {
        Self::unavailable_with(filters, &QueryCodec::default())
    }

    /// [`unavailable`](Self::unavailable), with chips and query encoded by
    /// `codec`.
    pub fn unavailable_with(filters: FilterState, codec: &QueryCodec) -> Self {
        CatalogPage {
            items: Vec::new(),
            meta: PageMeta::new(0, filters.page(), filters.limit()),
            category_tree: CategoryTree::default(),
            sidebar: Vec::new(),
            classification_facets: Vec::new(),
            vendor_facets: Vec::new(),
            chips: codec.active_chips(&filters),
            query: codec.to_query_string(&filters),
            active_filters: filters,
            unavailable: true,
        }
    }

    pub fn total_count(&self) -> u64 {
        self.meta.total_count
    }

    pub fn total_pages(&self) -> u32 {
        self.meta.total_pages
    }
}

// =============================================================================
// Service
// =============================================================================

/// Stateless catalog request handler over a shared data source.
#[derive(Clone)]
pub struct CatalogService {
    source: Arc<dyn CatalogSource>,
    settings: CatalogSettings,
    codec: QueryCodec,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Raw results of the concurrent fetch.
struct Fetched {
    categories: Vec<Category>,
    vendors: Vec<Vendor>,
    category_counts: Vec<GroupCount>,
    classification_counts: Vec<GroupCount>,
    vendor_counts: Vec<GroupCount>,
    page: ItemPage,
}

impl CatalogService {
    pub fn new(source: Arc<dyn CatalogSource>, settings: CatalogSettings) -> Self {
        let codec = QueryCodec::new(settings.default_page_size());
        CatalogService {
            source,
            settings,
            codec,
        }
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// Query codec bound to the configured default page size. Links built
    /// for this service must be encoded with it.
    pub fn codec(&self) -> &QueryCodec {
        &self.codec
    }

    /// Serves one catalog view for `state`.
    ///
    /// ## Returns
    /// * `Err(CatalogError::Backend)` - any read failed
    /// * `Err(CatalogError::Timeout)` - the fetch exceeded the request budget
    pub async fn browse(&self, state: &FilterState) -> CatalogResult<CatalogPage> {
        let started = Instant::now();
        let budget = self.settings.request_timeout();

        debug!(query = %self.codec.to_query_string(state), "Browsing catalog");

        let fetched = tokio::time::timeout(budget, self.fetch(state))
            .await
            .map_err(|_| CatalogError::Timeout {
                after_ms: self.settings.request_timeout_ms,
            })??;

        let category_tree = facets::category_tree(&fetched.categories, &fetched.category_counts);
        let sidebar = derive_sidebar(&category_tree, state.category());
        let classification_facets =
            facets::classification_entries(&fetched.classification_counts, state.classification());
        let vendor_facets =
            facets::vendor_entries(&fetched.vendor_counts, &fetched.vendors, state.vendor());

        info!(
            total = fetched.page.meta.total_count,
            page = fetched.page.meta.page,
            returned = fetched.page.items.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Catalog page served"
        );

        Ok(CatalogPage {
            items: fetched.page.items,
            meta: fetched.page.meta,
            category_tree,
            sidebar,
            classification_facets,
            vendor_facets,
            active_filters: state.clone(),
            chips: self.codec.active_chips(state),
            query: self.codec.to_query_string(state),
            unavailable: false,
        })
    }

    /// Decodes `query` and serves it. A request naming no page size gets the
    /// configured default.
    pub async fn browse_query(&self, query: &str) -> CatalogResult<CatalogPage> {
        self.browse(&self.decode(query)).await
    }

    /// Like [`browse`](Self::browse), but renders a failure as the
    /// unavailable page.
    pub async fn browse_or_empty(&self, state: &FilterState) -> CatalogPage {
        match self.browse(state).await {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "Catalog unavailable, rendering empty state");
                CatalogPage::unavailable_with(state.clone(), &self.codec)
            }
        }
    }

    /// Decodes a query string, applying the configured default page size.
    pub fn decode(&self, query: &str) -> FilterState {
        self.codec.from_query_string(query)
    }

    async fn fetch(&self, state: &FilterState) -> CatalogResult<Fetched> {
        let source = self.source.as_ref();
        let criteria = state.criteria();
        let predicate = compose(&criteria);
        let sort = state.sort();

        let vendors = async {
            if self.settings.facet_vendor {
                source.list_vendors().await
            } else {
                Ok(Vec::new())
            }
        };
        let classification_counts = async {
            if self.settings.facet_classification {
                facets::dimension_counts(source, &criteria, GroupField::Classification).await
            } else {
                Ok(Vec::new())
            }
        };
        let vendor_counts = async {
            if self.settings.facet_vendor {
                facets::dimension_counts(source, &criteria, GroupField::Vendor).await
            } else {
                Ok(Vec::new())
            }
        };

        let (categories, vendors, category_counts, classification_counts, vendor_counts, page) = tokio::try_join!(
            source.list_categories(),
            vendors,
            facets::dimension_counts(source, &criteria, GroupField::CategoryId),
            classification_counts,
            vendor_counts,
            executor::fetch_page(source, &predicate, &sort, state.page(), state.limit()),
        )?;

        Ok(Fetched {
            categories,
            vendors,
            category_counts,
            classification_counts,
            vendor_counts,
            page,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemorySource, SourceOp};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use salvage_core::{Availability, CategoryId, Classification, ItemStatus, PageSize, VendorId};
    use std::time::Duration;

    fn item(id: i64, name: &str, category: &str, availability: Availability) -> Item {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + chrono::Duration::minutes(id);
        Item {
            id: id.into(),
            name: name.to_string(),
            price_minor: Some(id * 1000),
            status: ItemStatus::Published,
            availability,
            classification: Some(Classification::Antique),
            category_id: Some(CategoryId::from(category)),
            vendor_id: VendorId::from("v-1"),
            thumbnail: None,
            featured: false,
            created_at: at,
            updated_at: at,
        }
    }

    fn hardware_source() -> MemorySource {
        let hardware = Category::top_level("1", "Hardware", "hardware");
        let hinges = Category::child_of(&hardware, "2", "Hinges", "hinges");
        let doors = Category::top_level("3", "Doors", "doors");
        let vendors = vec![Vendor {
            id: VendorId::from("v-1"),
            shop_name: "Yard & Beam".into(),
        }];
        let mut draft = item(12, "Pine Door", "3", Availability::Available);
        draft.status = ItemStatus::Draft;

        MemorySource::new(
            vec![hardware, hinges, doors],
            vendors,
            vec![
                item(10, "Brass Butt Hinge", "2", Availability::Available),
                item(11, "Iron Gate", "1", Availability::Sold),
                draft,
            ],
        )
    }

    fn service(source: MemorySource) -> CatalogService {
        CatalogService::new(Arc::new(source), CatalogSettings::default())
    }

    #[tokio::test]
    async fn test_browse_all_builds_counted_tree() {
        let page = service(hardware_source())
            .browse(&FilterState::default())
            .await
            .unwrap();

        assert_eq!(page.total_count(), 2);
        assert_eq!(page.total_pages(), 1);

        let node = page.category_tree.get(&CategoryId::from("1")).unwrap();
        assert_eq!(node.total_count, 2);
        assert_eq!(node.children[&CategoryId::from("2")].count, 1);

        // Doors only holds a draft
        assert_eq!(page.category_tree.get(&CategoryId::from("3")).unwrap().total_count, 0);
        let visible: Vec<&str> = page.sidebar.iter().map(|n| n.slug.as_str()).collect();
        assert_eq!(visible, vec!["hardware"]);
        assert!(!page.unavailable);
    }

    #[tokio::test]
    async fn test_category_filter_keeps_tree_counts() {
        let state = FilterState::default().with_category(Some("hinges"));
        let page = service(hardware_source()).browse(&state).await.unwrap();

        let ids: Vec<&str> = page.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["10"]);

        // The tree ignores the category filter
        assert_eq!(page.category_tree.total(), 2);
        assert!(page.sidebar[0].initially_expanded);
        assert_eq!(page.chips.len(), 1);
    }

    #[tokio::test]
    async fn test_facets_follow_other_filters() {
        let state = FilterState::default().with_classification(Some(Classification::Vintage));
        let page = service(hardware_source()).browse(&state).await.unwrap();

        assert_eq!(page.total_count(), 0);
        let eras: Vec<(&str, u64, bool)> = page
            .classification_facets
            .iter()
            .map(|e| (e.value.as_str(), e.count, e.active))
            .collect();
        assert_eq!(eras, vec![("antique", 2, false), ("vintage", 0, true)]);

        // Vendor and category counts honor the classification filter
        assert!(page.vendor_facets.is_empty());
        assert_eq!(page.category_tree.total(), 0);
    }

    #[tokio::test]
    async fn test_disabled_facets_are_empty() {
        let settings = CatalogSettings {
            facet_classification: false,
            facet_vendor: false,
            ..Default::default()
        };
        let service = CatalogService::new(Arc::new(hardware_source()), settings);
        let page = service.browse(&FilterState::default()).await.unwrap();

        assert!(page.classification_facets.is_empty());
        assert!(page.vendor_facets.is_empty());
        assert_eq!(page.total_count(), 2);
    }

    #[tokio::test]
    async fn test_any_failed_read_fails_request() {
        for op in [
            SourceOp::ListCategories,
            SourceOp::ListVendors,
            SourceOp::GroupedCount,
            SourceOp::ListItems,
            SourceOp::CountItems,
        ] {
            let result = service(hardware_source().failing_on(op))
                .browse(&FilterState::default())
                .await;
            assert!(matches!(result, Err(CatalogError::Backend(_))), "{:?}", op);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_backend_times_out() {
        let settings = CatalogSettings {
            request_timeout_ms: 50,
            ..Default::default()
        };
        let source = hardware_source().with_latency(Duration::from_millis(200));
        let service = CatalogService::new(Arc::new(source), settings);

        let err = service.browse(&FilterState::default()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Timeout { after_ms: 50 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reads_run_concurrently() {
        let settings = CatalogSettings {
            request_timeout_ms: 300,
            ..Default::default()
        };
        // Seven reads at 100ms each only fit in 300ms when overlapped
        let source = hardware_source().with_latency(Duration::from_millis(100));
        let service = CatalogService::new(Arc::new(source), settings);

        assert!(service.browse(&FilterState::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_browse_or_empty_renders_unavailable() {
        let state = FilterState::default().with_search("gate");
        let page = service(hardware_source().failing_on(SourceOp::CountItems))
            .browse_or_empty(&state)
            .await;

        assert!(page.unavailable);
        assert!(page.items.is_empty());
        assert!(page.category_tree.is_empty());
        assert_eq!(page.active_filters, state);
        assert_eq!(page.query, "search=gate");
    }

    #[tokio::test]
    async fn test_browse_query_applies_default_limit() {
        let settings = CatalogSettings {
            default_limit: 12,
            ..Default::default()
        };
        let service = CatalogService::new(Arc::new(hardware_source()), settings);

        assert_eq!(service.decode("?category=hardware").limit(), PageSize::new(12).unwrap());
        assert_eq!(service.decode("limit=50").limit(), PageSize::new(50).unwrap());

        let page = service.browse_query("category=hardware&page=2").await.unwrap();
        assert_eq!(page.meta.limit, 12);
        assert_eq!(page.meta.page, 2);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_configured_limit_survives_round_trip() {
        let settings = CatalogSettings {
            default_limit: 12,
            ..Default::default()
        };
        let service = CatalogService::new(Arc::new(hardware_source()), settings);

        let state = service.decode("limit=25&category=hardware");
        assert_eq!(state.limit(), PageSize::new(25).unwrap());

        let page = service.browse(&state).await.unwrap();
        assert_eq!(page.query, "category=hardware&limit=25");
        assert_eq!(service.decode(&page.query), state);

        // Dropping the category chip keeps the chosen page size
        assert_eq!(page.chips[0].remove_query, "limit=25");
        assert_eq!(service.decode(&page.chips[0].remove_query).limit(), state.limit());

        let empty = service
            .decode("category=hardware")
            .with_limit(PageSize::new(25).unwrap());
        let page = CatalogPage::unavailable_with(empty, service.codec());
        assert_eq!(page.query, "category=hardware&limit=25");
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page = CatalogPage::unavailable(FilterState::default());
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["totalCount"], 0);
        assert_eq!(json["totalPages"], 1);
        assert!(json["categoryTree"].as_object().unwrap().is_empty());
        assert!(json["activeFilters"].is_object());
        assert_eq!(json["unavailable"], true);
    }
}
