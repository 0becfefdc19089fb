//! The declarative list request.
//!
//! A [`ListState`] is built once per request (usually by a
//! [`ListStateProvider`](crate::ListStateProvider)) and read by the pipeline.
//! It cannot be changed after construction.

use serde::{Deserialize, Serialize};

use crate::error::{ListableError, Result};
use crate::filter::{FilterSpec, Filters};
use crate::ordering::{Dir, Sorter};

/// Requested page, page size, filters and sort keys.
///
/// # Example
///
/// ```
/// use listable::{Dir, FilterSpec, ListState};
///
/// let state = ListState::builder()
///     .page(2)
///     .limit(25)
///     .filter("name", "urgent")
///     .filter("size", FilterSpec::between(10, 20))
///     .sort("name", Dir::Desc)
///     .build()
///     .unwrap();
///
/// assert_eq!(state.offset(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawListState")]
pub struct ListState {
    page: usize,
    limit: usize,
    filters: Filters,
    sorter: Sorter,
}

impl ListState {
    /// Creates a state with no filters and no sorter.
    ///
    /// Fails if `limit` is zero.
    pub fn new(page: usize, limit: usize) -> Result<Self> {
        ListState::builder().page(page).limit(limit).build()
    }

    /// Starts building a state. Defaults to page 0 with a limit of 1.
    pub fn builder() -> ListStateBuilder {
        ListStateBuilder::default()
    }

    /// Zero-based page index.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Maximum rows per page, always at least 1.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Filters keyed by field name.
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Sort directions keyed by field name, in precedence order.
    pub fn sorter(&self) -> &Sorter {
        &self.sorter
    }

    /// Index of the first row of the requested page.
    ///
    /// Saturates instead of overflowing for absurd page numbers.
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.limit)
    }
}

/// Builder for [`ListState`].
#[derive(Debug, Clone)]
pub struct ListStateBuilder {
    page: usize,
    limit: usize,
    filters: Filters,
    sorter: Sorter,
}

impl Default for ListStateBuilder {
    fn default() -> Self {
        Self {
            page: 0,
            limit: 1,
            filters: Filters::new(),
            sorter: Sorter::new(),
        }
    }
}

impl ListStateBuilder {
    /// Sets the zero-based page index.
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Sets the page size.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Adds (or replaces) the filter for a field.
    pub fn filter(mut self, field: impl Into<String>, spec: impl Into<FilterSpec>) -> Self {
        self.filters.insert(field.into(), Some(spec.into()));
        self
    }

    /// Replaces all filters.
    pub fn filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// Appends a sort key. Keys added first take precedence.
    pub fn sort(mut self, field: impl Into<String>, dir: Dir) -> Self {
        self.sorter.insert(field.into(), dir);
        self
    }

    /// Replaces the sorter.
    pub fn sorter(mut self, sorter: Sorter) -> Self {
        self.sorter = sorter;
        self
    }

    /// Validates and builds the state.
    pub fn build(self) -> Result<ListState> {
        if self.limit == 0 {
            return Err(ListableError::InvalidLimit(self.limit));
        }
        Ok(ListState {
            page: self.page,
            limit: self.limit,
            filters: self.filters,
            sorter: self.sorter,
        })
    }
}

#[derive(Deserialize)]
struct RawListState {
    #[serde(default)]
    page: usize,
    limit: usize,
    #[serde(default)]
    filters: Filters,
    #[serde(default)]
    sorter: Sorter,
}

impl TryFrom<RawListState> for ListState {
    type Error = ListableError;

    fn try_from(raw: RawListState) -> Result<Self> {
        ListState::builder()
            .page(raw.page)
            .limit(raw.limit)
            .filters(raw.filters)
            .sorter(raw.sorter)
            .build()
    }
}
