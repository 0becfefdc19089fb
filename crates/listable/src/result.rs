//! The output of one pipeline run.

use serde::Serialize;

/// Rows of the requested page plus the number of rows that matched.
///
/// `total_count` is taken after filtering and before paging, so it can
/// drive pagination controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResult<T> {
    rows: Vec<T>,
    total_count: usize,
}

impl<T> ListResult<T> {
    /// Creates a result from page rows and the filtered count.
    pub fn new(rows: Vec<T>, total_count: usize) -> Self {
        Self { rows, total_count }
    }

    /// Rows of the current page, in final order.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Consumes the result, returning the page rows.
    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }

    /// Number of rows that survived filtering.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns true if the page holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows on the page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Number of pages of size `limit` needed to show every matching row.
    ///
    /// A zero `limit` yields zero pages.
    pub fn page_count(&self, limit: usize) -> usize {
        if limit == 0 {
            return 0;
        }
        self.total_count.div_ceil(limit)
    }
}

impl<T> Default for ListResult<T> {
    fn default() -> Self {
        Self::new(Vec::new(), 0)
    }
}
