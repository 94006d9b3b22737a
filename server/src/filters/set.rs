//! Filter sets
//!
//! Translates a whole batch of query pairs under a [`FilterPolicy`]. The
//! policy decides whether one bad pair fails the batch or is skipped.

use serde::{Deserialize, Serialize};

use super::error::FilterError;
use super::operator::has_bracket_suffix;
use super::predicate::{Predicate, PredicateList};
use super::translate::translate;

/// Default maximum number of pairs in one filter set
pub const DEFAULT_MAX_FILTERS: usize = 50;

/// What to do with a pair that fails translation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Fail the whole set on the first bad pair
    #[default]
    Reject,
    /// Drop bad pairs and keep going
    Skip,
}

impl std::fmt::Display for OnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OnError::Reject => write!(f, "reject"),
            OnError::Skip => write!(f, "skip"),
        }
    }
}

/// Rules applied to every pair of a filter set
#[derive(Debug, Clone)]
pub struct FilterPolicy {
    /// Keys callers may filter on; `None` allows any key
    pub allowed_keys: Option<Vec<String>>,
    /// Reject keys that still end in an unrecognised `[...]` token
    pub strict_operators: bool,
    pub on_error: OnError,
    pub max_filters: usize,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            allowed_keys: None,
            strict_operators: true,
            on_error: OnError::Reject,
            max_filters: DEFAULT_MAX_FILTERS,
        }
    }
}

/// A pair dropped under [`OnError::Skip`]
#[derive(Debug)]
pub struct Rejection {
    pub key: String,
    pub value: String,
    pub error: FilterError,
}

/// Result of translating a batch
#[derive(Debug, Default)]
pub struct FilterSet {
    pub predicates: PredicateList,
    pub rejected: Vec<Rejection>,
}

/// Translate every pair in order under `policy`
pub fn translate_all<I, K, V>(pairs: I, policy: &FilterPolicy) -> Result<FilterSet, FilterError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let pairs: Vec<(K, V)> = pairs.into_iter().collect();
    if pairs.len() > policy.max_filters {
        return Err(FilterError::TooManyFilters {
            max: policy.max_filters,
        });
    }

    let mut set = FilterSet::default();
    for (key, value) in &pairs {
        let (key, value) = (key.as_ref(), value.as_ref());
        match translate_checked(key, value, policy) {
            Ok(predicate) => set.predicates.push(predicate),
            Err(error) => match policy.on_error {
                OnError::Reject => return Err(error.for_entry(key, value)),
                OnError::Skip => {
                    tracing::debug!(key, value, error = %error, "Skipping invalid filter");
                    set.rejected.push(Rejection {
                        key: key.to_string(),
                        value: value.to_string(),
                        error,
                    });
                }
            },
        }
    }

    tracing::trace!(
        accepted = set.predicates.len(),
        rejected = set.rejected.len(),
        "Filter set translated"
    );
    Ok(set)
}

fn translate_checked(
    key: &str,
    value: &str,
    policy: &FilterPolicy,
) -> Result<Predicate, FilterError> {
    let predicate = translate(key, value)?;

    if predicate.key.is_empty() {
        return Err(FilterError::EmptyKey);
    }
    // A stripped token leaves nested keys like `meta[a]` alone
    if policy.strict_operators
        && predicate.key == key.trim()
        && has_bracket_suffix(&predicate.key)
    {
        return Err(FilterError::UnknownOperator {
            key: predicate.key,
        });
    }
    if let Some(allowed) = &policy.allowed_keys
        && !allowed.iter().any(|k| k == &predicate.key)
    {
        return Err(FilterError::UnknownKey {
            key: predicate.key,
        });
    }

    Ok(predicate)
}
