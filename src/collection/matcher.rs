//! Predicate evaluation against JSON documents
//!
//! Evaluates predicate maps the way a relational engine would:
//! - predicates in one map are ANDed
//! - `a__b` paths walk nested objects; arrays match if any element does
//! - missing or null values never match, except under `isnull`
//! - no coercion between strings and numbers

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::RegexBuilder;
use serde_json::Value;
use tracing::warn;

use crate::filter::PredicateMap;
use crate::lookup::{Lookup, LOOKUP_SEP};
use crate::value::FilterValue;

/// Checks if a document matches all predicates
pub fn matches(document: &Value, predicates: &PredicateMap) -> bool {
    predicates
        .iter()
        .all(|(key, expected)| matches_predicate(document, key, expected))
}

/// Checks if a document matches a single `{field_path}__{lookup}` predicate
pub fn matches_predicate(document: &Value, key: &str, expected: &FilterValue) -> bool {
    let (path, lookup) = split_predicate_key(key);
    let segments: Vec<&str> = path.split(LOOKUP_SEP).collect();

    let mut values = Vec::new();
    collect_values(document, &segments, &mut values);

    if lookup == Lookup::IsNull {
        let is_null = values.iter().all(|v| v.is_null());
        return expected.as_bool() == Some(is_null);
    }

    values
        .into_iter()
        .filter(|v| !v.is_null())
        .any(|actual| matches_value(actual, lookup, expected))
}

/// Splits at the last separator; a key without a known lookup is `exact`
fn split_predicate_key(key: &str) -> (&str, Lookup) {
    key.rsplit_once(LOOKUP_SEP)
        .and_then(|(path, name)| name.parse::<Lookup>().ok().map(|lookup| (path, lookup)))
        .unwrap_or((key, Lookup::Exact))
}

fn collect_values<'a>(value: &'a Value, segments: &[&str], out: &mut Vec<&'a Value>) {
    match (value, segments.split_first()) {
        (Value::Array(items), _) => {
            for item in items {
                collect_values(item, segments, out);
            }
        }
        (_, None) => out.push(value),
        (Value::Object(map), Some((head, rest))) => {
            if let Some(child) = map.get(*head) {
                collect_values(child, rest, out);
            }
        }
        _ => {}
    }
}

fn matches_value(actual: &Value, lookup: Lookup, expected: &FilterValue) -> bool {
    match lookup {
        Lookup::Exact => compare(actual, expected) == Some(Ordering::Equal),
        Lookup::IExact => text_match(actual, expected, true, |a, e| a == e),
        Lookup::Contains => text_match(actual, expected, false, |a, e| a.contains(e)),
        Lookup::IContains | Lookup::Search => {
            text_match(actual, expected, true, |a, e| a.contains(e))
        }
        Lookup::StartsWith => text_match(actual, expected, false, |a, e| a.starts_with(e)),
        Lookup::IStartsWith => text_match(actual, expected, true, |a, e| a.starts_with(e)),
        Lookup::EndsWith => text_match(actual, expected, false, |a, e| a.ends_with(e)),
        Lookup::IEndsWith => text_match(actual, expected, true, |a, e| a.ends_with(e)),
        Lookup::In => expected.as_list().map_or(false, |items| {
            items
                .iter()
                .any(|item| compare(actual, item) == Some(Ordering::Equal))
        }),
        Lookup::Gt => compare(actual, expected) == Some(Ordering::Greater),
        Lookup::Gte => matches!(
            compare(actual, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Lookup::Lt => compare(actual, expected) == Some(Ordering::Less),
        Lookup::Lte => matches!(compare(actual, expected), Some(Ordering::Less | Ordering::Equal)),
        Lookup::Range => match expected.as_list() {
            Some([low, high]) => {
                matches!(compare(actual, low), Some(Ordering::Greater | Ordering::Equal))
                    && matches!(compare(actual, high), Some(Ordering::Less | Ordering::Equal))
            }
            _ => false,
        },
        Lookup::Year
        | Lookup::Month
        | Lookup::Day
        | Lookup::WeekDay
        | Lookup::Hour
        | Lookup::Minute
        | Lookup::Second => match (component(actual, lookup), expected.as_int()) {
            (Some(actual), Some(expected)) => actual == expected,
            _ => false,
        },
        Lookup::Regex => regex_match(actual, expected, false),
        Lookup::IRegex => regex_match(actual, expected, true),
        Lookup::IsNull => expected.as_bool() == Some(actual.is_null()),
    }
}

/// Orders a document value against a filter value of the same family
fn compare(actual: &Value, expected: &FilterValue) -> Option<Ordering> {
    match expected {
        FilterValue::Int(_) | FilterValue::Float(_) => {
            actual.as_f64()?.partial_cmp(&expected.as_f64()?)
        }
        FilterValue::Decimal(_) => {
            let actual = match actual {
                Value::String(s) => s.parse::<f64>().ok()?,
                other => other.as_f64()?,
            };
            actual.partial_cmp(&expected.as_f64()?)
        }
        FilterValue::Text(s) => Some(actual.as_str()?.cmp(s.as_str())),
        FilterValue::Bool(b) => Some(actual.as_bool()?.cmp(b)),
        FilterValue::Date(d) => Some(as_datetime(actual)?.date().cmp(d)),
        FilterValue::DateTime(dt) => Some(as_datetime(actual)?.cmp(dt)),
        FilterValue::Time(t) => Some(as_time(actual)?.cmp(t)),
        FilterValue::List(_) => None,
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_match(
    actual: &Value,
    expected: &FilterValue,
    ignore_case: bool,
    op: fn(&str, &str) -> bool,
) -> bool {
    let Some(actual) = text_of(actual) else {
        return false;
    };
    let expected = expected.to_string();
    if ignore_case {
        op(&actual.to_lowercase(), &expected.to_lowercase())
    } else {
        op(&actual, &expected)
    }
}

fn regex_match(actual: &Value, expected: &FilterValue, ignore_case: bool) -> bool {
    let Some(actual) = text_of(actual) else {
        return false;
    };
    let pattern = expected.to_string();
    match RegexBuilder::new(&pattern).case_insensitive(ignore_case).build() {
        Ok(re) => re.is_match(&actual),
        Err(e) => {
            warn!(pattern = %pattern, error = %e, "invalid regex in predicate");
            false
        }
    }
}

fn as_datetime(value: &Value) -> Option<NaiveDateTime> {
    let s = value.as_str()?;
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn as_time(value: &Value) -> Option<NaiveTime> {
    let s = value.as_str()?;
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
        .or_else(|| as_datetime(value).map(|dt| dt.time()))
}

/// Extracts a date or time component as an integer
fn component(value: &Value, lookup: Lookup) -> Option<i64> {
    match lookup {
        Lookup::Year => as_datetime(value).map(|dt| dt.year() as i64),
        Lookup::Month => as_datetime(value).map(|dt| dt.month() as i64),
        Lookup::Day => as_datetime(value).map(|dt| dt.day() as i64),
        Lookup::WeekDay => as_datetime(value).map(|dt| dt.weekday().number_from_sunday() as i64),
        Lookup::Hour => as_time(value).map(|t| t.hour() as i64),
        Lookup::Minute => as_time(value).map(|t| t.minute() as i64),
        Lookup::Second => as_time(value).map(|t| t.second() as i64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(doc: &Value, key: &str, value: FilterValue) -> bool {
        matches_predicate(doc, key, &value)
    }

    #[test]
    fn test_exact_no_type_coercion() {
        let doc = json!({"id": 123, "code": "123"});
        assert!(check(&doc, "id__exact", FilterValue::Int(123)));
        assert!(!check(&doc, "code__exact", FilterValue::Int(123)));
        assert!(check(&doc, "code__exact", FilterValue::Text("123".into())));
    }

    #[test]
    fn test_key_without_lookup_is_exact() {
        let doc = json!({"name": "Alice"});
        assert!(check(&doc, "name", FilterValue::Text("Alice".into())));
    }

    #[test]
    fn test_text_lookups() {
        let doc = json!({"name": "Johnson"});
        assert!(check(&doc, "name__startswith", FilterValue::Text("John".into())));
        assert!(!check(&doc, "name__startswith", FilterValue::Text("john".into())));
        assert!(check(&doc, "name__istartswith", FilterValue::Text("john".into())));
        assert!(check(&doc, "name__endswith", FilterValue::Text("son".into())));
        assert!(check(&doc, "name__icontains", FilterValue::Text("HNS".into())));
        assert!(check(&doc, "name__iexact", FilterValue::Text("JOHNSON".into())));
    }

    #[test]
    fn test_range_predicates() {
        let doc = json!({"age": 25});
        assert!(check(&doc, "age__gte", FilterValue::Int(25)));
        assert!(!check(&doc, "age__gt", FilterValue::Int(25)));
        assert!(check(&doc, "age__lt", FilterValue::Float(25.5)));
        assert!(check(
            &doc,
            "age__range",
            FilterValue::List(vec![FilterValue::Int(18), FilterValue::Int(25)])
        ));
        assert!(!check(
            &doc,
            "age__range",
            FilterValue::List(vec![FilterValue::Int(26), FilterValue::Int(30)])
        ));
    }

    #[test]
    fn test_in_list() {
        let doc = json!({"status": "active"});
        let list = FilterValue::List(vec![
            FilterValue::Text("active".into()),
            FilterValue::Text("pending".into()),
        ]);
        assert!(check(&doc, "status__in", list));
    }

    #[test]
    fn test_isnull() {
        let doc = json!({"deleted_at": null, "name": "a"});
        assert!(check(&doc, "deleted_at__isnull", FilterValue::Bool(true)));
        assert!(check(&doc, "missing__isnull", FilterValue::Bool(true)));
        assert!(check(&doc, "name__isnull", FilterValue::Bool(false)));
        assert!(!check(&doc, "name__isnull", FilterValue::Bool(true)));
    }

    #[test]
    fn test_null_never_matches_comparisons() {
        let doc = json!({"age": null});
        assert!(!check(&doc, "age__exact", FilterValue::Int(0)));
        assert!(!check(&doc, "age__lt", FilterValue::Int(100)));
    }

    #[test]
    fn test_relation_paths() {
        let doc = json!({
            "author": {"name": "Ann"},
            "tags": [{"slug": "rust"}, {"slug": "db"}]
        });
        assert!(check(&doc, "author__name__exact", FilterValue::Text("Ann".into())));
        assert!(check(&doc, "tags__slug__exact", FilterValue::Text("db".into())));
        assert!(!check(&doc, "tags__slug__exact", FilterValue::Text("go".into())));
    }

    #[test]
    fn test_date_components() {
        // 2024-03-01 was a Friday.
        let doc = json!({"created": "2024-03-01T14:05:09"});
        assert!(check(&doc, "created__year", FilterValue::Int(2024)));
        assert!(check(&doc, "created__month", FilterValue::Int(3)));
        assert!(check(&doc, "created__day", FilterValue::Int(1)));
        assert!(check(&doc, "created__week_day", FilterValue::Int(6)));
        assert!(check(&doc, "created__hour", FilterValue::Int(14)));
        assert!(check(&doc, "created__minute", FilterValue::Int(5)));
        assert!(check(&doc, "created__second", FilterValue::Int(9)));
    }

    #[test]
    fn test_date_comparison() {
        let doc = json!({"published": "2024-03-01"});
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(check(&doc, "published__gt", FilterValue::Date(date)));
    }

    #[test]
    fn test_regex() {
        let doc = json!({"name": "Wilson"});
        assert!(check(&doc, "name__regex", FilterValue::Text("^W.*n$".into())));
        assert!(!check(&doc, "name__regex", FilterValue::Text("^w".into())));
        assert!(check(&doc, "name__iregex", FilterValue::Text("^w".into())));
        assert!(!check(&doc, "name__regex", FilterValue::Text("(".into())));
    }

    #[test]
    fn test_all_predicates_must_match() {
        let doc = json!({"status": "active", "age": 21});
        let mut predicates = PredicateMap::new();
        predicates.insert("status__exact".into(), FilterValue::Text("active".into()));
        predicates.insert("age__gt".into(), FilterValue::Int(18));
        assert!(matches(&doc, &predicates));

        predicates.insert("age__lt".into(), FilterValue::Int(20));
        assert!(!matches(&doc, &predicates));
    }
}
