//! Value validators
//!
//! A `ValueValidator` turns a raw query-string value into a typed
//! `FilterValue`, or explains why it cannot. Validators are plain values:
//! they carry their constraints and no state, so they can be cloned,
//! compared and rebuilt per request at no risk.
//!
//! Input is trimmed before validation. An empty value is always rejected.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Regex, RegexBuilder};

use super::errors::{ValueError, ValueResult};
use super::types::FilterValue;

/// Accepted date formats, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

/// Accepted datetime formats, tried in order before falling back to RFC 3339
/// and then to plain dates (midnight)
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Accepted time formats, tried in order
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Default separator for multi-valued input (`in`, `range`)
pub const DEFAULT_LIST_SEPARATOR: char = ',';

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static SLUG_RE: OnceLock<Regex> = OnceLock::new();
static URL_RE: OnceLock<Regex> = OnceLock::new();
static DECIMAL_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern must compile")
    })
}

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug pattern must compile"))
}

fn url_re() -> &'static Regex {
    URL_RE.get_or_init(|| {
        RegexBuilder::new(r"^(?:https?|ftps?)://[^\s/?#]+(?:[/?#]\S*)?$")
            .case_insensitive(true)
            .build()
            .expect("url pattern must compile")
    })
}

fn decimal_re() -> &'static Regex {
    DECIMAL_RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)$").expect("decimal pattern must compile")
    })
}

/// Rule for validating one raw value
#[derive(Debug, Clone, PartialEq)]
pub enum ValueValidator {
    /// Free text with an optional maximum length (in characters)
    Text { max_length: Option<usize> },
    /// Signed integer with optional inclusive bounds
    Integer { min: Option<i64>, max: Option<i64> },
    Float,
    Decimal,
    /// `true/1/yes/on` or `false/0/no/off`, case-insensitive
    Boolean,
    Date,
    DateTime,
    Time,
    Email { max_length: Option<usize> },
    Slug { max_length: Option<usize> },
    Url { max_length: Option<usize> },
    /// Separator-delimited list, each item checked by `item`
    Multiple {
        item: Box<ValueValidator>,
        min_values: Option<usize>,
        max_values: Option<usize>,
        separator: char,
    },
}

impl ValueValidator {
    pub fn text() -> Self {
        ValueValidator::Text { max_length: None }
    }

    pub fn text_max(max_length: usize) -> Self {
        ValueValidator::Text {
            max_length: Some(max_length),
        }
    }

    pub fn integer() -> Self {
        ValueValidator::Integer {
            min: None,
            max: None,
        }
    }

    pub fn integer_between(min: Option<i64>, max: Option<i64>) -> Self {
        ValueValidator::Integer { min, max }
    }

    /// Wraps `item` into a list validator using the default separator
    pub fn multiple(item: ValueValidator) -> Self {
        ValueValidator::Multiple {
            item: Box::new(item),
            min_values: None,
            max_values: None,
            separator: DEFAULT_LIST_SEPARATOR,
        }
    }

    /// Returns the validator name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueValidator::Text { .. } => "text",
            ValueValidator::Integer { .. } => "integer",
            ValueValidator::Float => "float",
            ValueValidator::Decimal => "decimal",
            ValueValidator::Boolean => "boolean",
            ValueValidator::Date => "date",
            ValueValidator::DateTime => "datetime",
            ValueValidator::Time => "time",
            ValueValidator::Email { .. } => "email",
            ValueValidator::Slug { .. } => "slug",
            ValueValidator::Url { .. } => "url",
            ValueValidator::Multiple { .. } => "multiple",
        }
    }

    /// Validates a raw value.
    ///
    /// # Errors
    ///
    /// Returns the first `ValueError` the value violates.
    pub fn validate(&self, raw: &str) -> ValueResult<FilterValue> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(ValueError::Required);
        }

        match self {
            ValueValidator::Text { max_length } => {
                check_length(value, *max_length)?;
                Ok(FilterValue::Text(value.to_string()))
            }
            ValueValidator::Integer { min, max } => {
                let parsed: i64 = value.parse().map_err(|_| ValueError::InvalidInteger)?;
                if let Some(min) = min {
                    if parsed < *min {
                        return Err(ValueError::BelowMinimum(*min));
                    }
                }
                if let Some(max) = max {
                    if parsed > *max {
                        return Err(ValueError::AboveMaximum(*max));
                    }
                }
                Ok(FilterValue::Int(parsed))
            }
            ValueValidator::Float => {
                let parsed: f64 = value.parse().map_err(|_| ValueError::InvalidNumber)?;
                if !parsed.is_finite() {
                    return Err(ValueError::InvalidNumber);
                }
                Ok(FilterValue::Float(parsed))
            }
            ValueValidator::Decimal => {
                if !decimal_re().is_match(value) {
                    return Err(ValueError::InvalidNumber);
                }
                Ok(FilterValue::Decimal(value.to_string()))
            }
            ValueValidator::Boolean => parse_bool(value).map(FilterValue::Bool),
            ValueValidator::Date => parse_date(value)
                .map(FilterValue::Date)
                .ok_or(ValueError::InvalidDate),
            ValueValidator::DateTime => parse_datetime(value)
                .map(FilterValue::DateTime)
                .ok_or(ValueError::InvalidDateTime),
            ValueValidator::Time => parse_time(value)
                .map(FilterValue::Time)
                .ok_or(ValueError::InvalidTime),
            ValueValidator::Email { max_length } => {
                check_length(value, *max_length)?;
                if !email_re().is_match(value) {
                    return Err(ValueError::InvalidEmail);
                }
                Ok(FilterValue::Text(value.to_string()))
            }
            ValueValidator::Slug { max_length } => {
                check_length(value, *max_length)?;
                if !slug_re().is_match(value) {
                    return Err(ValueError::InvalidSlug);
                }
                Ok(FilterValue::Text(value.to_string()))
            }
            ValueValidator::Url { max_length } => {
                check_length(value, *max_length)?;
                if !url_re().is_match(value) {
                    return Err(ValueError::InvalidUrl);
                }
                Ok(FilterValue::Text(value.to_string()))
            }
            ValueValidator::Multiple {
                item,
                min_values,
                max_values,
                separator,
            } => {
                let parts: Vec<&str> = value.split(*separator).map(str::trim).collect();

                if let Some(min) = min_values {
                    if parts.len() < *min {
                        return Err(ValueError::TooFewValues {
                            min: *min,
                            actual: parts.len(),
                        });
                    }
                }
                if let Some(max) = max_values {
                    if parts.len() > *max {
                        return Err(ValueError::TooManyValues {
                            max: *max,
                            actual: parts.len(),
                        });
                    }
                }

                parts
                    .into_iter()
                    .enumerate()
                    .map(|(index, part)| {
                        item.validate(part).map_err(|reason| ValueError::InvalidItem {
                            index,
                            reason: Box::new(reason),
                        })
                    })
                    .collect::<ValueResult<Vec<_>>>()
                    .map(FilterValue::List)
            }
        }
    }
}

fn check_length(value: &str, max_length: Option<usize>) -> ValueResult<()> {
    if let Some(max) = max_length {
        let actual = value.chars().count();
        if actual > max {
            return Err(ValueError::TooLong { max, actual });
        }
    }
    Ok(())
}

fn parse_bool(value: &str) -> ValueResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ValueError::InvalidBoolean),
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .or_else(|| parse_date(value).and_then(|date| date.and_hms_opt(0, 0, 0)))
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
}
