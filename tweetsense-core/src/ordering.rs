//! Ordering policy for "latest tweet" lookups.
//!
//! Tweet ids are opaque strings. Which one counts as the latest depends on
//! how they are compared, so the comparison is an explicit, configurable
//! policy instead of an assumption buried in a query.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// How tweet ids are ordered when picking the latest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdOrdering {
    /// Plain string comparison. `"99"` sorts after `"100"`.
    #[default]
    Lexical,
    /// Unsigned integer comparison. Ids that are not numeric sort below
    /// every numeric id and are compared lexically among themselves.
    Numeric,
}

impl IdOrdering {
    /// Compare two ids under this policy.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            IdOrdering::Lexical => a.cmp(b),
            IdOrdering::Numeric => match (numeric_value(a), numeric_value(b)) {
                (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => a.cmp(b),
            },
        }
    }

    /// Whether a store can evaluate this ordering itself with a plain
    /// `ORDER BY id DESC`.
    pub fn is_store_native(&self) -> bool {
        matches!(self, IdOrdering::Lexical)
    }

    /// Pick the greatest id under this policy.
    pub fn latest<I, S>(&self, ids: I) -> Option<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ids.into_iter()
            .map(Into::into)
            .max_by(|a, b| self.compare(a, b))
    }
}

/// Integer value of an id made only of ASCII digits. Signs, whitespace and
/// values past `u128::MAX` are not numeric.
fn numeric_value(id: &str) -> Option<u128> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}

impl fmt::Display for IdOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdOrdering::Lexical => write!(f, "lexical"),
            IdOrdering::Numeric => write!(f, "numeric"),
        }
    }
}

impl FromStr for IdOrdering {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lexical" | "string" => Ok(IdOrdering::Lexical),
            "numeric" | "number" => Ok(IdOrdering::Numeric),
            other => Err(ConfigError::InvalidValue {
                field: "TWEET_ID_ORDERING".to_string(),
                value: other.to_string(),
                reason: "expected 'lexical' or 'numeric'".to_string(),
            }),
        }
    }
}
