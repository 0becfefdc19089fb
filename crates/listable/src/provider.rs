//! Building a [`ListState`] from request input.
//!
//! [`ListStateProvider`] is the seam between a host application's request
//! handling and the pipeline. [`ParamsStateProvider`] covers the common case
//! of flat, already-decoded query parameters:
//!
//! ```text
//! page=2                      zero-based page index
//! limit=50                    page size (config default when absent)
//! filters[name]=acme          scalar filter
//! filters[price][from]=10     range lower bound
//! filters[price][to]=99       range upper bound
//! sorter[name]=desc           sort key, in parameter order
//! ```

use crate::config::ListConfig;
use crate::error::{ListableError, Result};
use crate::filter::{FilterSpec, Filters};
use crate::ordering::{Dir, Sorter};
use crate::state::ListState;
use crate::value::Scalar;

/// Builds the state for one request of a configured list.
pub trait ListStateProvider {
    /// Creates a validated state, falling back on `config` defaults.
    fn get_state(&self, config: &ListConfig) -> Result<ListState>;
}

/// Provider reading flat key/value request parameters.
///
/// # Example
///
/// ```
/// use listable::{Dir, ListConfig, ListStateProvider, ParamsStateProvider};
///
/// let provider = ParamsStateProvider::new([
///     ("page", "1"),
///     ("filters[name]", "acme"),
///     ("sorter[price]", "desc"),
/// ]);
/// let state = provider.get_state(&ListConfig::default().with_limit(10)).unwrap();
///
/// assert_eq!(state.page(), 1);
/// assert_eq!(state.limit(), 10);
/// assert_eq!(state.sorter()["price"], Dir::Desc);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParamsStateProvider {
    params: Vec<(String, String)>,
}

impl ParamsStateProvider {
    /// Creates a provider over decoded request parameters.
    pub fn new<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: params
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Returns the last value given for `name`.
    fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn page(&self, config: &ListConfig) -> Result<usize> {
        match self.param(&config.page_param) {
            None => Ok(0),
            Some(raw) => parse_usize(&config.page_param, raw),
        }
    }

    fn limit(&self, config: &ListConfig) -> Result<usize> {
        let limit = match self.param(&config.limit_param) {
            None => config.limit,
            Some(raw) => parse_usize(&config.limit_param, raw)?,
        };
        match config.max_limit {
            Some(max) if limit > max => Err(ListableError::LimitTooLarge { limit, max }),
            _ => Ok(limit),
        }
    }

    /// Collects `filters[f]` and `filters[f][from|to]` parameters.
    ///
    /// A field given both a scalar and a range is rejected rather than
    /// letting whichever came last win.
    fn filters(&self, config: &ListConfig) -> Result<Filters> {
        let mut filters = Filters::new();
        for (key, raw) in &self.params {
            let Some((field, rest)) = bracketed(key, &config.filters_param) else {
                continue;
            };
            if raw.is_empty() {
                continue;
            }
            let value = Scalar::from(raw.as_str());
            match rest {
                "" => {
                    if let Some(Some(FilterSpec::Range { .. })) = filters.get(field) {
                        return Err(conflicting_filter(key, raw));
                    }
                    filters.insert(field.to_string(), Some(FilterSpec::Scalar(value)));
                }
                "[from]" | "[to]" => {
                    let entry = filters
                        .entry(field.to_string())
                        .or_insert_with(|| Some(FilterSpec::range(None, None)));
                    let Some(FilterSpec::Range { from, to }) = entry else {
                        return Err(conflicting_filter(key, raw));
                    };
                    if rest == "[from]" {
                        *from = Some(value);
                    } else {
                        *to = Some(value);
                    }
                }
                _ => {
                    tracing::debug!(list = %config.name, param = %key, "ignoring filter parameter");
                }
            }
        }
        Ok(filters)
    }

    fn sorter(&self, config: &ListConfig) -> Result<Sorter> {
        let mut sorter = Sorter::new();
        for (key, value) in &self.params {
            let Some((field, rest)) = bracketed(key, &config.sorter_param) else {
                continue;
            };
            if !rest.is_empty() {
                tracing::debug!(list = %config.name, param = %key, "ignoring sorter parameter");
                continue;
            }
            let dir = value
                .parse::<Dir>()
                .map_err(|_| ListableError::InvalidParam {
                    name: key.clone(),
                    value: value.clone(),
                })?;
            sorter.insert(field.to_string(), dir);
        }
        if sorter.is_empty() {
            return Ok(config.sorter.clone());
        }
        Ok(sorter)
    }
}

impl ListStateProvider for ParamsStateProvider {
    fn get_state(&self, config: &ListConfig) -> Result<ListState> {
        let state = ListState::builder()
            .page(self.page(config)?)
            .limit(self.limit(config)?)
            .filters(self.filters(config)?)
            .sorter(self.sorter(config)?)
            .build()?;

        tracing::debug!(
            list = %config.name,
            page = state.page(),
            limit = state.limit(),
            filters = state.filters().len(),
            sort_keys = state.sorter().len(),
            "built list state"
        );
        Ok(state)
    }
}

fn conflicting_filter(key: &str, raw: &str) -> ListableError {
    tracing::debug!(param = %key, "filter parameter mixes scalar and range forms");
    ListableError::InvalidParam {
        name: key.to_string(),
        value: raw.to_string(),
    }
}

fn parse_usize(name: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ListableError::InvalidParam {
            name: name.to_string(),
            value: raw.to_string(),
        })
}

/// Splits `prefix[field]rest` into `(field, rest)`.
fn bracketed<'k>(key: &'k str, prefix: &str) -> Option<(&'k str, &'k str)> {
    let inner = key.strip_prefix(prefix)?.strip_prefix('[')?;
    let end = inner.find(']')?;
    let field = &inner[..end];
    if field.is_empty() {
        return None;
    }
    Some((field, &inner[end + 1..]))
}
