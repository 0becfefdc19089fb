//! List configuration.
//!
//! A [`ListConfig`] holds the defaults a [`ListStateProvider`] falls back on
//! and the names of the request parameters it reads. It is usually loaded
//! from a YAML or JSON file alongside the rest of an application's config:
//!
//! ```yaml
//! name: products
//! limit: 25
//! max_limit: 100
//! sorter:
//!   name: asc
//! ```
//!
//! [`ListStateProvider`]: crate::ListStateProvider

use serde::{Deserialize, Serialize};

use crate::error::{ListableError, Result};
use crate::ordering::{Dir, Sorter};

/// Defaults and parameter names for one list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Identifier of the list, used in logs.
    pub name: String,
    /// Page size used when the request does not give one.
    pub limit: usize,
    /// Largest page size a request may ask for.
    pub max_limit: Option<usize>,
    /// Sorter used when the request does not give one.
    pub sorter: Sorter,
    /// Request parameter holding the zero-based page index.
    pub page_param: String,
    /// Request parameter holding the page size.
    pub limit_param: String,
    /// Prefix of `filters[field]` request parameters.
    pub filters_param: String,
    /// Prefix of `sorter[field]` request parameters.
    pub sorter_param: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            name: "list".to_string(),
            limit: 20,
            max_limit: None,
            sorter: Sorter::new(),
            page_param: "page".to_string(),
            limit_param: "limit".to_string(),
            filters_param: "filters".to_string(),
            sorter_param: "sorter".to_string(),
        }
    }
}

impl ListConfig {
    /// Creates a config with default settings and the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the default page size.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the largest page size a request may ask for.
    pub fn with_max_limit(mut self, max_limit: usize) -> Self {
        self.max_limit = Some(max_limit);
        self
    }

    /// Appends a default sort key.
    pub fn with_sort(mut self, field: impl Into<String>, dir: Dir) -> Self {
        self.sorter.insert(field.into(), dir);
        self
    }

    /// Parses and validates a YAML config.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: ListConfig = serde_yaml::from_str(text)?;
        config.validate()
    }

    /// Parses and validates a JSON config.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: ListConfig = serde_json::from_str(text)?;
        config.validate()
    }

    /// Checks that the default page size is usable.
    pub fn validate(self) -> Result<Self> {
        if self.limit == 0 {
            return Err(ListableError::InvalidLimit(self.limit));
        }
        if let Some(max) = self.max_limit {
            if self.limit > max {
                return Err(ListableError::LimitTooLarge {
                    limit: self.limit,
                    max,
                });
            }
        }
        Ok(self)
    }
}
