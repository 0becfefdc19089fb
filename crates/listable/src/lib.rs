//! Listable - filtered, sorted and paginated listings over in-memory data.
//!
//! Listable is the data side of a UI grid: given a dataset and a
//! [`ListState`] (page, page size, per-field filters, per-field sort
//! directions), it returns the rows of the requested page together with the
//! number of rows matching the filters.
//!
//! # Quick Start
//!
//! ```rust
//! use listable::{ArrayRepository, Dir, FilterSpec, ListState, Repository, Row, Scalar};
//!
//! let data: Vec<Row> = (0..100)
//!     .map(|i| {
//!         Row::from([
//!             ("a".to_string(), Scalar::from(format!("Test {i}"))),
//!             ("b".to_string(), Scalar::from(i + 1)),
//!         ])
//!     })
//!     .collect();
//!
//! let repository = ArrayRepository::builder().data(data).build().unwrap();
//!
//! let state = ListState::builder()
//!     .limit(2)
//!     .filter("a", "test")
//!     .filter("b", FilterSpec::between(97, 99))
//!     .build()
//!     .unwrap();
//!
//! let result = repository.get_result(&state).unwrap();
//! assert_eq!(result.total_count(), 3);
//! assert_eq!(result.rows()[0]["a"], Scalar::from("Test 96"));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! filter  -> rows matching every filter (or the filter override's output)
//! count   -> total_count = number of filtered rows
//! sort    -> stable sort by the sorter keys (or the sort override's output)
//! page    -> rows[page * limit ..][..limit]
//! ```
//!
//! # Matching Rules
//!
//! | Field value | Scalar filter                      | Range filter         |
//! |-------------|------------------------------------|----------------------|
//! | String      | case-insensitive substring         | parsed as a number   |
//! | Number      | numeric equality                   | `from <= v <= to`    |
//! | Missing     | no match                           | no match             |
//!
//! A row that cannot be compared is excluded, never reported as an error.

mod config;
mod error;
mod filter;
mod ordering;
mod provider;
mod record;
mod repository;
mod result;
mod state;
mod value;

// Re-export public API
pub use config::ListConfig;
pub use error::{BoxError, ListableError, Result};
pub use filter::{matches, FilterSpec, Filters, PreparedFilters};
pub use ordering::{compare, compare_values, sort, Dir, Sorter};
pub use provider::{ListStateProvider, ParamsStateProvider};
pub use record::{Record, Row};
pub use repository::{
    ArrayRepository, ArrayRepositoryBuilder, FilterOverride, Repository, SortOverride,
};
pub use result::ListResult;
pub use state::{ListState, ListStateBuilder};
pub use value::{Number, Scalar, Value};
