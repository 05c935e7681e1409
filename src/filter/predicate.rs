//! Evaluation of a single condition against an attribute value.
//!
//! A sequence attribute is matched element by element. Equality, range and
//! text operators match when ANY element matches; ordering operators need
//! ALL elements to satisfy the comparison. A map attribute never matches.

use super::condition::Condition;
use super::operator::Operator;
use super::timestamp::{DefaultTimestampParser, TimestampParser};
use crate::document::node::{Document, Number};
use crate::error::{Error, Result};
use std::cmp::Ordering;

/// Evaluates `condition` against `value` (`None` when the attribute is
/// absent, which is treated as null).
///
/// # Example
///
/// ```
/// use nestpath::document::node::Document;
/// use nestpath::filter::{evaluate, Condition, Operator};
///
/// let age = Document::from(5);
/// assert!(evaluate(Some(&age), &Condition::new(Operator::GreaterThanEqual, 3)).unwrap());
/// assert!(!evaluate(Some(&age), &Condition::new(Operator::LowerThan, 3)).unwrap());
/// ```
pub fn evaluate(value: Option<&Document>, condition: &Condition) -> Result<bool> {
    evaluate_with(value, condition, &DefaultTimestampParser)
}

/// Like `evaluate`, with a custom date parser for the before/after family.
pub fn evaluate_with(
    value: Option<&Document>,
    condition: &Condition,
    timestamps: &dyn TimestampParser,
) -> Result<bool> {
    let null = Document::Null;
    let value = value.unwrap_or(&null);
    let expected = &condition.value;
    if value.is_map() {
        check_operand(condition, timestamps)?;
        return Ok(false);
    }

    let matched = match condition.operator {
        Operator::StrictlyExact => any_or_self(value, |v| v == expected),
        Operator::NotStrictlyExact => !any_or_self(value, |v| v == expected),
        Operator::Exact => equals_loosely(value, expected),
        Operator::NotExact => !equals_loosely(value, expected),
        Operator::In => is_in(value, expected, condition.strict),
        Operator::NotIn => !is_in(value, expected, condition.strict),
        Operator::GreaterThan => all_ordered(value, expected, |o| o == Ordering::Greater),
        Operator::GreaterThanEqual => all_ordered(value, expected, |o| o != Ordering::Less),
        Operator::LowerThan => all_ordered(value, expected, |o| o == Ordering::Less),
        Operator::LowerThanEqual => all_ordered(value, expected, |o| o != Ordering::Greater),
        Operator::Between => in_range(value, expected, false)?,
        Operator::BetweenEquals => in_range(value, expected, true)?,
        Operator::Before => compare_dates(value, expected, timestamps, |a, b| a <= b)?,
        Operator::StrictlyBefore => compare_dates(value, expected, timestamps, |a, b| a < b)?,
        Operator::After => compare_dates(value, expected, timestamps, |a, b| a >= b)?,
        Operator::StrictlyAfter => compare_dates(value, expected, timestamps, |a, b| a > b)?,
        Operator::Partial => match_text(value, expected, TextMatch::Contains, false),
        Operator::NotPartial => match_text(value, expected, TextMatch::Contains, true),
        Operator::Start => match_text(value, expected, TextMatch::Prefix, false),
        Operator::NotStart => match_text(value, expected, TextMatch::Prefix, true),
        Operator::End => match_text(value, expected, TextMatch::Suffix, false),
        Operator::NotEnd => match_text(value, expected, TextMatch::Suffix, true),
    };
    Ok(matched)
}

/// Applies `test` to each element of a sequence (any must pass), or to the
/// value itself.
fn any_or_self(value: &Document, test: impl Fn(&Document) -> bool) -> bool {
    match value {
        Document::Sequence(items) => items.iter().any(test),
        other => test(other),
    }
}

/// Loose equality for a scalar attribute. A sequence attribute matches
/// when one of its elements is strictly equal to `expected`.
fn equals_loosely(value: &Document, expected: &Document) -> bool {
    match value {
        Document::Sequence(items) => items.contains(expected),
        other => loose_eq(other, expected),
    }
}

/// Fails when a range or date operand cannot be used, whatever the
/// attribute holds.
fn check_operand(condition: &Condition, timestamps: &dyn TimestampParser) -> Result<()> {
    match condition.operator {
        Operator::Between | Operator::BetweenEquals => parse_range(&condition.value).map(|_| ()),
        Operator::Before | Operator::StrictlyBefore | Operator::After | Operator::StrictlyAfter => {
            reference_time(&condition.value, timestamps).map(|_| ())
        }
        _ => Ok(()),
    }
}

/// Converts the loose spellings `"true"`, `"false"`, `"null"` and numeric
/// strings into the values they name.
pub fn coerce_loose(value: &Document) -> Document {
    match value {
        Document::String(s) => match s.as_str() {
            "true" => Document::Bool(true),
            "false" => Document::Bool(false),
            "null" => Document::Null,
            text => Number::parse(text)
                .map(Document::Number)
                .unwrap_or_else(|| value.clone()),
        },
        other => other.clone(),
    }
}

/// Loose equality: numbers compare by value, numeric strings compare as
/// numbers, booleans compare against truthiness, null equals empty values.
pub fn loose_eq(a: &Document, b: &Document) -> bool {
    match (a, b) {
        (Document::Null, Document::Null) => true,
        (Document::Null, other) | (other, Document::Null) => !other.is_truthy(),
        (Document::Bool(x), other) | (other, Document::Bool(x)) => *x == other.is_truthy(),
        (Document::Number(x), Document::Number(y)) => x.as_f64() == y.as_f64(),
        (Document::Number(x), Document::String(s)) | (Document::String(s), Document::Number(x)) => {
            Number::parse(s).is_some_and(|n| n.as_f64() == x.as_f64())
        }
        (Document::String(x), Document::String(y)) => match (Number::parse(x), Number::parse(y)) {
            (Some(nx), Some(ny)) => nx.as_f64() == ny.as_f64(),
            _ => x == y,
        },
        (x, y) => x == y,
    }
}

/// Ordering used by the comparison operators.
///
/// Numbers and numeric strings compare numerically, other strings compare
/// lexically, booleans compare as 0 and 1. Null and containers are
/// unordered.
pub fn loose_cmp(a: &Document, b: &Document) -> Option<Ordering> {
    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y),
        _ => match (a, b) {
            (Document::String(x), Document::String(y)) => Some(x.cmp(y)),
            _ => None,
        },
    }
}

fn numeric(value: &Document) -> Option<f64> {
    match value {
        Document::Number(n) => Some(n.as_f64()),
        Document::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Document::String(s) => Number::parse(s).map(|n| n.as_f64()),
        _ => None,
    }
}

fn is_in(value: &Document, candidates: &Document, strict: bool) -> bool {
    let pool: Vec<&Document> = match candidates {
        Document::Sequence(items) => items.iter().collect(),
        Document::Map(map) => map.values().collect(),
        scalar => vec![scalar],
    };
    let member = |v: &Document| {
        if strict {
            pool.iter().any(|c| *c == v)
        } else {
            let v = coerce_loose(v);
            pool.iter().any(|c| loose_eq(&coerce_loose(c), &v))
        }
    };
    any_or_self(value, member)
}

fn all_ordered(value: &Document, bound: &Document, accept: impl Fn(Ordering) -> bool) -> bool {
    let check = |v: &Document| loose_cmp(v, bound).is_some_and(&accept);
    match value {
        Document::Sequence(items) => items.iter().all(check),
        Document::Null => false,
        other => check(other),
    }
}

fn in_range(value: &Document, range: &Document, inclusive: bool) -> Result<bool> {
    let (low, high) = parse_range(range)?;
    let within = |v: &Document| {
        if v.is_null() {
            return false;
        }
        match (loose_cmp(v, &low), loose_cmp(v, &high)) {
            (Some(lo), Some(hi)) if inclusive => lo != Ordering::Less && hi != Ordering::Greater,
            (Some(lo), Some(hi)) => lo == Ordering::Greater && hi == Ordering::Less,
            _ => false,
        }
    };
    Ok(any_or_self(value, within))
}

/// Splits `"lo..hi"` into its bounds, numeric where possible.
fn parse_range(range: &Document) -> Result<(Document, Document)> {
    let text = match range {
        Document::String(s) => s,
        other => {
            return Err(Error::MalformedCondition(format!(
                "range must be a \"lo..hi\" string, found {}",
                other.kind_name()
            )))
        }
    };
    let (low, high) = text
        .split_once("..")
        .ok_or_else(|| Error::MalformedCondition(format!("range '{}' has no '..'", text)))?;
    let bound = |s: &str| {
        Number::parse(s)
            .map(Document::Number)
            .unwrap_or_else(|| Document::from(s))
    };
    Ok((bound(low), bound(high)))
}

fn compare_dates(
    value: &Document,
    expected: &Document,
    timestamps: &dyn TimestampParser,
    accept: impl Fn(i64, i64) -> bool,
) -> Result<bool> {
    let reference = reference_time(expected, timestamps)?;
    let actual = match value {
        Document::String(text) => timestamps.parse(text),
        Document::Number(Number::Integer(seconds)) => Some(*seconds),
        _ => None,
    };
    Ok(actual.is_some_and(|a| accept(a, reference)))
}

fn reference_time(expected: &Document, timestamps: &dyn TimestampParser) -> Result<i64> {
    match expected {
        Document::String(text) => timestamps
            .parse(text)
            .ok_or_else(|| Error::MalformedCondition(format!("'{}' is not a date", text))),
        Document::Number(Number::Integer(seconds)) => Ok(*seconds),
        other => Err(Error::MalformedCondition(format!(
            "date condition must be a string or integer, found {}",
            other.kind_name()
        ))),
    }
}

#[derive(Clone, Copy)]
enum TextMatch {
    Contains,
    Prefix,
    Suffix,
}

impl TextMatch {
    fn test(self, haystack: &str, needle: &str) -> bool {
        let haystack = haystack.to_lowercase();
        match self {
            TextMatch::Contains => haystack.contains(needle),
            TextMatch::Prefix => haystack.starts_with(needle),
            TextMatch::Suffix => haystack.ends_with(needle),
        }
    }
}

/// Case-insensitive text matching. An empty needle passes everything. With
/// `negate`, a scalar matches when the test fails and a sequence matches
/// when any element fails.
fn match_text(value: &Document, expected: &Document, mode: TextMatch, negate: bool) -> bool {
    if !expected.is_scalar() {
        return false;
    }
    let needle = expected.to_key_string().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let element = |v: &Document| -> Option<bool> {
        match v {
            Document::String(s) if s.is_empty() => None,
            Document::String(s) => Some(mode.test(s, &needle)),
            Document::Bool(_) | Document::Number(_) => match mode {
                TextMatch::Contains => Some(loose_eq(v, expected)),
                TextMatch::Prefix | TextMatch::Suffix => None,
            },
            _ => None,
        }
    };

    match value {
        Document::Sequence(items) => items
            .iter()
            .filter_map(element)
            .any(|hit| hit != negate),
        other => element(other).is_some_and(|hit| hit != negate),
    }
}
