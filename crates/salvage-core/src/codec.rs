//! # Filter State Codec
//!
//! [`FilterState`] ⇄ flat string-keyed parameter map (the query string).
//!
//! ## Parameters
//! ```text
//! ┌──────────────────┬──────────────────────────────┬────────────────────┐
//! │ key              │ value                        │ missing / invalid  │
//! ├──────────────────┼──────────────────────────────┼────────────────────┤
//! │ category         │ category slug | all          │ all                │
//! │ classification   │ antique|vintage|modern | all │ all                │
//! │ vendor           │ vendor id | all              │ all                │
//! │ search           │ free text                    │ none               │
//! │ sort             │ [-]createdAt|updatedAt|...   │ -createdAt         │
//! │ view             │ grid | list                  │ grid               │
//! │ limit            │ 12 | 25 | 50 | 100           │ codec default (25) │
//! │ page             │ 1-based integer              │ 1                  │
//! └──────────────────┴──────────────────────────────┴────────────────────┘
//! ```
//!
//! Decoding never fails. [`encode`] writes only non-default values, so a
//! missing key and an explicit `all` decode to the same state and
//! `decode(encode(s)) == s` for every state. A deployment with another
//! default page size uses a [`QueryCodec`] built for it on both sides.
//!
//! ## Changing One Dimension
//! [`apply_change`] edits a parameter map in place of re-encoding a state,
//! so keys this codec does not own (campaign tags and the like) survive.
//! Changing category, classification, vendor, search or limit drops `page`.

use indexmap::IndexMap;
use serde::Serialize;
use ts_rs::TS;
use url::form_urlencoded;

use crate::error::{ValidationError, ValidationResult};
use crate::filter::{FilterState, ViewMode};
use crate::pagination::PageSize;
use crate::sort::SortKey;
use crate::types::{Classification, VendorId};
use crate::validation::{normalize_dimension, normalize_page, normalize_search};

/// Flat parameter map in query-string order.
pub type ParamMap = IndexMap<String, String>;

/// Parameter names.
pub mod keys {
    pub const CATEGORY: &str = "category";
    pub const CLASSIFICATION: &str = "classification";
    pub const VENDOR: &str = "vendor";
    pub const SEARCH: &str = "search";
    pub const SORT: &str = "sort";
    pub const VIEW: &str = "view";
    pub const LIMIT: &str = "limit";
    pub const PAGE: &str = "page";

    pub const ALL: [&str; 8] = [
        CATEGORY,
        CLASSIFICATION,
        VENDOR,
        SEARCH,
        SORT,
        VIEW,
        LIMIT,
        PAGE,
    ];
}

// =============================================================================
// Codec
// =============================================================================

/// Codec bound to a deployment's default page size.
///
/// A `limit` equal to that default is left out when encoding and restored
/// when decoding, so every query a deployment emits decodes back to the same
/// state under the same codec. The free functions in this module use
/// [`QueryCodec::default`], whose default page size is 25.
///
/// ```rust
/// use salvage_core::codec::QueryCodec;
/// use salvage_core::PageSize;
///
/// let codec = QueryCodec::new(PageSize::new(12).unwrap());
/// let state = codec.from_query_string("limit=25&category=doors");
/// assert_eq!(codec.to_query_string(&state), "category=doors&limit=25");
/// assert_eq!(codec.from_query_string("category=doors").limit().get(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryCodec {
    default_limit: PageSize,
}

impl QueryCodec {
    pub const fn new(default_limit: PageSize) -> Self {
        QueryCodec { default_limit }
    }

    pub fn default_limit(&self) -> PageSize {
        self.default_limit
    }

    /// Serializes a state, omitting every value equal to its default.
    pub fn encode(&self, state: &FilterState) -> ParamMap {
        let mut params = ParamMap::new();

        if let Some(category) = state.category() {
            params.insert(keys::CATEGORY.to_string(), category.to_string());
        }
        if let Some(classification) = state.classification() {
            params.insert(
                keys::CLASSIFICATION.to_string(),
                classification.as_str().to_string(),
            );
        }
        if let Some(vendor) = state.vendor() {
            params.insert(keys::VENDOR.to_string(), vendor.to_string());
        }
        if let Some(search) = state.search() {
            params.insert(keys::SEARCH.to_string(), search.to_string());
        }
        if state.sort() != SortKey::default() {
            params.insert(keys::SORT.to_string(), state.sort().to_string());
        }
        if state.view() != ViewMode::default() {
            params.insert(keys::VIEW.to_string(), state.view().to_string());
        }
        if state.limit() != self.default_limit {
            params.insert(keys::LIMIT.to_string(), state.limit().to_string());
        }
        if state.page() > 1 {
            params.insert(keys::PAGE.to_string(), state.page().to_string());
        }

        params
    }

    /// Parses a parameter map. Unknown keys are ignored; malformed values
    /// fall back to their defaults.
    pub fn decode(&self, params: &ParamMap) -> FilterState {
        let get = |key: &str| params.get(key).map(String::as_str);

        let classification = get(keys::CLASSIFICATION)
            .and_then(normalize_dimension)
            .and_then(|v| v.parse::<Classification>().ok());
        let limit = get(keys::LIMIT)
            .and_then(|v| v.parse::<PageSize>().ok())
            .unwrap_or(self.default_limit);
        let sort = get(keys::SORT)
            .and_then(|v| v.parse::<SortKey>().ok())
            .unwrap_or_default();
        let view = get(keys::VIEW)
            .and_then(|v| v.parse::<ViewMode>().ok())
            .unwrap_or_default();

        // Page last: the narrowing setters reset it
        FilterState::default()
            .with_category(get(keys::CATEGORY))
            .with_classification(classification)
            .with_vendor(get(keys::VENDOR).map(VendorId::from))
            .with_search(get(keys::SEARCH).unwrap_or_default())
            .with_limit(limit)
            .with_sort(sort)
            .with_view(view)
            .with_page(get(keys::PAGE).map(normalize_page).unwrap_or(1))
    }

    pub fn from_query_string(&self, query: &str) -> FilterState {
        self.decode(&parse_query(query))
    }

    pub fn to_query_string(&self, state: &FilterState) -> String {
        format_query(&self.encode(state))
    }

    /// Builds a change from a parameter name and raw value, as typed on a
    /// command line. A missing value, `""` or `all` clears the dimension;
    /// a cleared `limit` is this codec's default.
    pub fn parse_change(&self, key: &str, value: Option<&str>) -> ValidationResult<FilterChange> {
        let value = value.unwrap_or_default();
        let change = match key {
            keys::CATEGORY => FilterChange::Category(normalize_dimension(value)),
            keys::CLASSIFICATION => FilterChange::Classification(
                normalize_dimension(value)
                    .map(|v| v.parse::<Classification>())
                    .transpose()?,
            ),
            keys::VENDOR => FilterChange::Vendor(normalize_dimension(value).map(VendorId::from)),
            keys::SEARCH => FilterChange::Search(value.to_string()),
            keys::PAGE => FilterChange::Page(normalize_page(value)),
            keys::LIMIT if value.trim().is_empty() => FilterChange::Limit(self.default_limit),
            keys::LIMIT => FilterChange::Limit(value.parse()?),
            keys::SORT if value.trim().is_empty() => FilterChange::Sort(SortKey::default()),
            keys::SORT => FilterChange::Sort(value.parse()?),
            keys::VIEW if value.trim().is_empty() => FilterChange::View(ViewMode::default()),
            keys::VIEW => FilterChange::View(value.parse()?),
            _ => return Err(ValidationError::not_allowed("key", &keys::ALL)),
        };
        Ok(change)
    }

    /// Returns a copy of `params` with one dimension changed.
    ///
    /// Every other key, including keys unknown to the codec, keeps its value
    /// and position.
    ///
    /// ```rust
    /// use salvage_core::codec::{apply_change, format_query, parse_query, FilterChange};
    ///
    /// let params = parse_query("utm_source=news&category=doors&page=3");
    /// let next = apply_change(&params, &FilterChange::Search("oak".into()));
    /// assert_eq!(format_query(&next), "utm_source=news&category=doors&search=oak");
    /// ```
    pub fn apply_change(&self, params: &ParamMap, change: &FilterChange) -> ParamMap {
        let mut next = params.clone();
        let key = change.key();

        match change.encoded_value(self.default_limit) {
            Some(value) => {
                next.insert(key.to_string(), value);
            }
            None => {
                next.shift_remove(key);
            }
        }

        if change.resets_page() {
            next.shift_remove(keys::PAGE);
        }

        next
    }

    /// Lists the active narrowing constraints of a state.
    pub fn active_chips(&self, state: &FilterState) -> Vec<FilterChip> {
        let mut chips = Vec::new();
        let mut push = |change: FilterChange, label: String| {
            chips.push(FilterChip {
                key: change.key().to_string(),
                label,
                remove_query: self.to_query_string(&state.clone().apply(&change)),
            });
        };

        if let Some(category) = state.category() {
            push(FilterChange::Category(None), format!("Category: {}", category));
        }
        if let Some(classification) = state.classification() {
            push(
                FilterChange::Classification(None),
                format!("Era: {}", classification.label()),
            );
        }
        if let Some(vendor) = state.vendor() {
            push(FilterChange::Vendor(None), format!("Vendor: {}", vendor));
        }
        if let Some(search) = state.search() {
            push(FilterChange::Search(String::new()), format!("Search: \"{}\"", search));
        }

        chips
    }
}

// =============================================================================
// Default Codec
// =============================================================================

pub fn encode(state: &FilterState) -> ParamMap {
    QueryCodec::default().encode(state)
}

pub fn decode(params: &ParamMap) -> FilterState {
    QueryCodec::default().decode(params)
}

/// Parses a raw query string (with or without the leading `?`). A repeated
/// key keeps its last value.
pub fn parse_query(query: &str) -> ParamMap {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Formats a parameter map as a query string without the leading `?`.
pub fn format_query(params: &ParamMap) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}

pub fn from_query_string(query: &str) -> FilterState {
    QueryCodec::default().from_query_string(query)
}

pub fn to_query_string(state: &FilterState) -> String {
    QueryCodec::default().to_query_string(state)
}

pub fn apply_change(params: &ParamMap, change: &FilterChange) -> ParamMap {
    QueryCodec::default().apply_change(params, change)
}

pub fn active_chips(state: &FilterState) -> Vec<FilterChip> {
    QueryCodec::default().active_chips(state)
}

// =============================================================================
// Filter Changes
// =============================================================================

/// A single user action on the filter controls. `None` clears a dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Category(Option<String>),
    Classification(Option<Classification>),
    Vendor(Option<VendorId>),
    Search(String),
    Page(u32),
    Limit(PageSize),
    Sort(SortKey),
    View(ViewMode),
}

impl FilterChange {
    /// Parses a change under the default codec. See
    /// [`QueryCodec::parse_change`].
    pub fn parse(key: &str, value: Option<&str>) -> ValidationResult<Self> {
        QueryCodec::default().parse_change(key, value)
    }

    pub fn key(&self) -> &'static str {
        match self {
            FilterChange::Category(_) => keys::CATEGORY,
            FilterChange::Classification(_) => keys::CLASSIFICATION,
            FilterChange::Vendor(_) => keys::VENDOR,
            FilterChange::Search(_) => keys::SEARCH,
            FilterChange::Page(_) => keys::PAGE,
            FilterChange::Limit(_) => keys::LIMIT,
            FilterChange::Sort(_) => keys::SORT,
            FilterChange::View(_) => keys::VIEW,
        }
    }

    /// True when the change alters which items match (or how many fit on a
    /// page), invalidating the current page number.
    pub fn resets_page(&self) -> bool {
        !matches!(
            self,
            FilterChange::Page(_) | FilterChange::Sort(_) | FilterChange::View(_)
        )
    }

    /// Encoded value, or `None` when the change returns the key to its
    /// default (the key is then removed).
    fn encoded_value(&self, default_limit: PageSize) -> Option<String> {
        match self {
            FilterChange::Category(slug) => slug.as_deref().and_then(normalize_dimension),
            FilterChange::Classification(c) => c.map(|c| c.as_str().to_string()),
            FilterChange::Vendor(v) => v.as_ref().and_then(|v| normalize_dimension(v.as_str())),
            FilterChange::Search(text) => normalize_search(text),
            FilterChange::Page(page) => (*page > 1).then(|| page.to_string()),
            FilterChange::Limit(limit) => (*limit != default_limit).then(|| limit.to_string()),
            FilterChange::Sort(sort) => (*sort != SortKey::default()).then(|| sort.to_string()),
            FilterChange::View(view) => (*view != ViewMode::default()).then(|| view.to_string()),
        }
    }
}

impl FilterState {
    /// Applies one change to a state.
    pub fn apply(self, change: &FilterChange) -> FilterState {
        match change {
            FilterChange::Category(slug) => self.with_category(slug.as_deref()),
            FilterChange::Classification(c) => self.with_classification(*c),
            FilterChange::Vendor(v) => self.with_vendor(v.clone()),
            FilterChange::Search(text) => self.with_search(text),
            FilterChange::Page(page) => self.with_page(*page),
            FilterChange::Limit(limit) => self.with_limit(*limit),
            FilterChange::Sort(sort) => self.with_sort(*sort),
            FilterChange::View(view) => self.with_view(*view),
        }
    }
}

// =============================================================================
// Filter Chips
// =============================================================================

/// A removable chip describing one active constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FilterChip {
    /// Parameter the chip stands for.
    pub key: String,
    pub label: String,
    /// Query string of the same state with this constraint removed.
    pub remove_query: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
