//! Lookup type definitions
//!
//! A lookup names the comparison applied between a field and a value,
//! e.g. `exact`, `icontains` or `range`. Lookups travel inside filter keys
//! as the suffix after the `__` separator.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::KeyError;

/// Separator between a field path and its lookup, and between the
/// segments of a relation-traversing field path.
pub const LOOKUP_SEP: &str = "__";

/// Supported lookup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Lookup {
    /// Exact match
    #[serde(rename = "exact")]
    Exact,
    /// Case-insensitive exact match
    #[serde(rename = "iexact")]
    IExact,
    /// Substring match
    #[serde(rename = "contains")]
    Contains,
    /// Case-insensitive substring match
    #[serde(rename = "icontains")]
    IContains,
    /// Value in list
    #[serde(rename = "in")]
    In,
    /// Greater than
    #[serde(rename = "gt")]
    Gt,
    /// Greater than or equal
    #[serde(rename = "gte")]
    Gte,
    /// Less than
    #[serde(rename = "lt")]
    Lt,
    /// Less than or equal
    #[serde(rename = "lte")]
    Lte,
    #[serde(rename = "startswith")]
    StartsWith,
    #[serde(rename = "istartswith")]
    IStartsWith,
    #[serde(rename = "endswith")]
    EndsWith,
    #[serde(rename = "iendswith")]
    IEndsWith,
    /// Inclusive range, two values
    #[serde(rename = "range")]
    Range,
    #[serde(rename = "year")]
    Year,
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "day")]
    Day,
    /// Day of week, 1 (Sunday) to 7 (Saturday)
    #[serde(rename = "week_day")]
    WeekDay,
    #[serde(rename = "hour")]
    Hour,
    #[serde(rename = "minute")]
    Minute,
    #[serde(rename = "second")]
    Second,
    /// Null check, boolean value
    #[serde(rename = "isnull")]
    IsNull,
    /// Full-text search (engine defined)
    #[serde(rename = "search")]
    Search,
    #[serde(rename = "regex")]
    Regex,
    #[serde(rename = "iregex")]
    IRegex,
}

impl Lookup {
    /// Every supported lookup, in declaration order
    pub const ALL: [Lookup; 25] = [
        Lookup::Exact,
        Lookup::IExact,
        Lookup::Contains,
        Lookup::IContains,
        Lookup::In,
        Lookup::Gt,
        Lookup::Gte,
        Lookup::Lt,
        Lookup::Lte,
        Lookup::StartsWith,
        Lookup::IStartsWith,
        Lookup::EndsWith,
        Lookup::IEndsWith,
        Lookup::Range,
        Lookup::Year,
        Lookup::Month,
        Lookup::Day,
        Lookup::WeekDay,
        Lookup::Hour,
        Lookup::Minute,
        Lookup::Second,
        Lookup::IsNull,
        Lookup::Search,
        Lookup::Regex,
        Lookup::IRegex,
    ];

    /// Get the lookup name as it appears in filter keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Lookup::Exact => "exact",
            Lookup::IExact => "iexact",
            Lookup::Contains => "contains",
            Lookup::IContains => "icontains",
            Lookup::In => "in",
            Lookup::Gt => "gt",
            Lookup::Gte => "gte",
            Lookup::Lt => "lt",
            Lookup::Lte => "lte",
            Lookup::StartsWith => "startswith",
            Lookup::IStartsWith => "istartswith",
            Lookup::EndsWith => "endswith",
            Lookup::IEndsWith => "iendswith",
            Lookup::Range => "range",
            Lookup::Year => "year",
            Lookup::Month => "month",
            Lookup::Day => "day",
            Lookup::WeekDay => "week_day",
            Lookup::Hour => "hour",
            Lookup::Minute => "minute",
            Lookup::Second => "second",
            Lookup::IsNull => "isnull",
            Lookup::Search => "search",
            Lookup::Regex => "regex",
            Lookup::IRegex => "iregex",
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lookup {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lookup::ALL
            .iter()
            .copied()
            .find(|lookup| lookup.as_str() == s)
            .ok_or_else(|| KeyError::UnsupportedLookup(s.to_string()))
    }
}

/// Whitelist of lookups a filter accepts.
///
/// Defaults to every supported lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupSet(BTreeSet<Lookup>);

impl LookupSet {
    /// Whitelist containing every supported lookup
    pub fn all() -> Self {
        Self(Lookup::ALL.iter().copied().collect())
    }

    /// Whitelist containing only the given lookups
    pub fn only(lookups: impl IntoIterator<Item = Lookup>) -> Self {
        Self(lookups.into_iter().collect())
    }

    pub fn contains(&self, lookup: Lookup) -> bool {
        self.0.contains(&lookup)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Lookup> + '_ {
        self.0.iter().copied()
    }
}

impl Default for LookupSet {
    fn default() -> Self {
        Self::all()
    }
}

impl From<Lookup> for LookupSet {
    fn from(lookup: Lookup) -> Self {
        Self::only([lookup])
    }
}

impl FromIterator<Lookup> for LookupSet {
    fn from_iter<I: IntoIterator<Item = Lookup>>(iter: I) -> Self {
        Self::only(iter)
    }
}
