//! Query keys.

use crate::error::CacheError;
use std::fmt;

/// Identifier of a cached query: one string or an ordered tuple of strings.
///
/// `QueryKey::from("tasks")` and `QueryKey::from(["tasks", "ts_1"])` name
/// different entries. Segments are compared in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Reject keys with no segments or with an empty segment.
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.0.is_empty() || self.0.iter().any(|s| s.is_empty()) {
            return Err(CacheError::EmptyKey);
        }
        Ok(())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(":"))
    }
}

impl From<&str> for QueryKey {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl From<String> for QueryKey {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl<const N: usize> From<[&str; N]> for QueryKey {
    fn from(value: [&str; N]) -> Self {
        Self::new(value)
    }
}

impl From<Vec<String>> for QueryKey {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}

impl From<&QueryKey> for QueryKey {
    fn from(value: &QueryKey) -> Self {
        value.clone()
    }
}
