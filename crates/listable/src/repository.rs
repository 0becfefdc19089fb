//! Result assembly: filter, count, sort, page.
//!
//! [`Repository`] is the backend-neutral entry point. [`ArrayRepository`]
//! serves an in-memory dataset:
//!
//! ```text
//! rows   = filter override(data, state)    | data matching state.filters
//! total  = len(rows)
//! rows   = sort override(rows, state)      | stable sort by state.sorter
//! page   = rows[page * limit .. page * limit + limit]   (clipped)
//! ```
//!
//! An override fully replaces its phase; the built-in matcher or comparator
//! is not consulted when one is configured.

use std::fmt;
use std::sync::Arc;

use crate::error::{BoxError, ListableError, Result};
use crate::filter::PreparedFilters;
use crate::ordering;
use crate::record::Record;
use crate::result::ListResult;
use crate::state::ListState;

/// Replacement for the built-in filter phase.
///
/// Receives the whole dataset and returns the rows to keep, in order.
pub type FilterOverride<T> = Arc<
    dyn for<'a> Fn(&'a [T], &ListState) -> std::result::Result<Vec<&'a T>, BoxError>
        + Send
        + Sync,
>;

/// Replacement for the built-in sort phase.
///
/// Receives the filtered rows and returns them in display order.
pub type SortOverride<T> = Arc<
    dyn for<'a> Fn(Vec<&'a T>, &ListState) -> std::result::Result<Vec<&'a T>, BoxError>
        + Send
        + Sync,
>;

/// A source of list results.
pub trait Repository {
    /// The row type returned in results.
    type Row;

    /// Produces the page of rows described by `state`, plus the total
    /// number of rows matching its filters.
    fn get_result(&self, state: &ListState) -> Result<ListResult<Self::Row>>;
}

/// Repository over an in-memory dataset.
///
/// Built once with [`ArrayRepository::builder`] and immutable afterwards.
/// The dataset is held behind an `Arc`, so cloning the repository or
/// sharing it across threads does not copy rows.
///
/// # Example
///
/// ```
/// use listable::{ArrayRepository, Dir, ListState, Repository, Row, Scalar};
///
/// let data: Vec<Row> = (0..10)
///     .map(|i| Row::from([("n".to_string(), Scalar::from(i))]))
///     .collect();
///
/// let repository = ArrayRepository::builder().data(data).build().unwrap();
/// let state = ListState::builder()
///     .limit(3)
///     .sort("n", Dir::Desc)
///     .build()
///     .unwrap();
///
/// let result = repository.get_result(&state).unwrap();
/// assert_eq!(result.total_count(), 10);
/// assert_eq!(result.rows()[0]["n"], Scalar::from(9));
/// ```
pub struct ArrayRepository<T> {
    data: Arc<[T]>,
    filter: Option<FilterOverride<T>>,
    sort: Option<SortOverride<T>>,
}

impl<T> ArrayRepository<T> {
    /// Creates a repository with built-in filtering and sorting.
    pub fn new(data: Vec<T>) -> Self {
        ArrayRepository {
            data: data.into(),
            filter: None,
            sort: None,
        }
    }

    /// Starts configuring a repository.
    pub fn builder() -> ArrayRepositoryBuilder<T> {
        ArrayRepositoryBuilder::default()
    }

    /// The dataset being listed.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns `true` if a filter override is configured.
    pub fn has_filter_override(&self) -> bool {
        self.filter.is_some()
    }

    /// Returns `true` if a sort override is configured.
    pub fn has_sort_override(&self) -> bool {
        self.sort.is_some()
    }
}

impl<T: Record> ArrayRepository<T> {
    /// Runs the filter phase: the override when set, the matcher otherwise.
    fn filter_rows(&self, state: &ListState) -> Result<Vec<&T>> {
        match &self.filter {
            Some(filter) => filter(&*self.data, state).map_err(ListableError::Override),
            None => {
                let filters = PreparedFilters::new(state.filters());
                Ok(self.data.iter().filter(|row| filters.matches(*row)).collect())
            }
        }
    }

    /// Runs the sort phase: the override when set, a stable sort otherwise.
    fn sort_rows<'a>(&self, mut rows: Vec<&'a T>, state: &ListState) -> Result<Vec<&'a T>> {
        match &self.sort {
            Some(sort) => sort(rows, state).map_err(ListableError::Override),
            None => {
                ordering::sort(&mut rows, state.sorter());
                Ok(rows)
            }
        }
    }
}

impl<T: Record + Clone> Repository for ArrayRepository<T> {
    type Row = T;

    fn get_result(&self, state: &ListState) -> Result<ListResult<T>> {
        let span = tracing::trace_span!(
            "listable_get_result",
            page = state.page(),
            limit = state.limit(),
            rows = self.data.len()
        );
        let _guard = span.enter();

        let filtered = self.filter_rows(state)?;
        let total_count = filtered.len();
        let sorted = self.sort_rows(filtered, state)?;

        let rows: Vec<T> = sorted
            .into_iter()
            .skip(state.offset())
            .take(state.limit())
            .cloned()
            .collect();

        tracing::debug!(
            total_count,
            page = state.page(),
            limit = state.limit(),
            returned = rows.len(),
            filter_override = self.filter.is_some(),
            sort_override = self.sort.is_some(),
            "assembled list result"
        );

        Ok(ListResult::new(rows, total_count))
    }
}

impl<T> Clone for ArrayRepository<T> {
    fn clone(&self) -> Self {
        ArrayRepository {
            data: Arc::clone(&self.data),
            filter: self.filter.clone(),
            sort: self.sort.clone(),
        }
    }
}

impl<T> fmt::Debug for ArrayRepository<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayRepository")
            .field("rows", &self.data.len())
            .field("filter_override", &self.filter.is_some())
            .field("sort_override", &self.sort.is_some())
            .finish()
    }
}

/// Builder for [`ArrayRepository`].
///
/// `data` is required; `filter` and `sort` overrides are optional.
pub struct ArrayRepositoryBuilder<T> {
    data: Option<Arc<[T]>>,
    filter: Option<FilterOverride<T>>,
    sort: Option<SortOverride<T>>,
}

impl<T> Default for ArrayRepositoryBuilder<T> {
    fn default() -> Self {
        Self {
            data: None,
            filter: None,
            sort: None,
        }
    }
}

impl<T> ArrayRepositoryBuilder<T> {
    /// Sets the dataset.
    pub fn data(mut self, data: Vec<T>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Sets a dataset that is shared with other owners.
    pub fn shared_data(mut self, data: Arc<[T]>) -> Self {
        self.data = Some(data);
        self
    }

    /// Replaces built-in filtering with `filter`.
    ///
    /// The override receives the full dataset. Its output is what gets
    /// counted, sorted and paged.
    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: for<'a> Fn(&'a [T], &ListState) -> std::result::Result<Vec<&'a T>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Replaces built-in sorting with `sort`.
    ///
    /// The override receives the filtered rows; its output is paged as-is.
    pub fn sort<F>(mut self, sort: F) -> Self
    where
        F: for<'a> Fn(Vec<&'a T>, &ListState) -> std::result::Result<Vec<&'a T>, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.sort = Some(Arc::new(sort));
        self
    }

    /// Builds the repository.
    ///
    /// Fails with [`ListableError::MissingData`] if no dataset was given.
    pub fn build(self) -> Result<ArrayRepository<T>> {
        let data = self.data.ok_or(ListableError::MissingData)?;
        Ok(ArrayRepository {
            data,
            filter: self.filter,
            sort: self.sort,
        })
    }
}

impl<T> fmt::Debug for ArrayRepositoryBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayRepositoryBuilder")
            .field("rows", &self.data.as_ref().map(|data| data.len()))
            .field("filter_override", &self.filter.is_some())
            .field("sort_override", &self.sort.is_some())
            .finish()
    }
}
