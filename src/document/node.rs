//! Document value representation.
//!
//! Every operation in nestpath works on a single tagged value type. A
//! `Document` is a tree of insertion-ordered maps and integer-indexed
//! sequences with scalar leaves, mirroring a parsed JSON value while keeping
//! the distinction between list-like (`[...]`) and object-like (`{...}`)
//! containers.
//!
//! # Example
//!
//! ```
//! use nestpath::document::node::{Document, Map};
//!
//! let mut user = Map::new();
//! user.insert("name".to_string(), Document::from("Alice"));
//! user.insert("age".to_string(), Document::from(30));
//! let doc = Document::Map(user);
//!
//! assert!(doc.is_map());
//! assert_eq!(doc.child("name"), Some(&Document::from("Alice")));
//! ```

use indexmap::IndexMap;
use std::fmt;
use tracing::debug;

/// An insertion-ordered, string-keyed map of documents.
pub type Map = IndexMap<String, Document>;

/// A number that keeps integers and floats apart.
///
/// Strict equality between an integer and a float never holds, even when the
/// two represent the same quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(_) => None,
        }
    }

    /// Parses a numeric string the way loose comparisons expect:
    /// surrounding whitespace is ignored, integers stay integers.
    pub fn parse(s: &str) -> Option<Number> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Some(Number::Integer(i));
        }
        // Rust accepts "inf"/"nan" spellings; numeric strings never do.
        if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
            return None;
        }
        trimmed.parse::<f64>().ok().map(Number::Float)
    }
}

/// A document value.
///
/// `PartialEq` on `Document` is strict equality: values must have the same
/// kind and the same content (`Integer(1) != Float(1.0)`). Map equality does
/// not depend on key order.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Document {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// An ordered, integer-indexed list.
    Sequence(Vec<Document>),
    /// An insertion-ordered, string-keyed map.
    Map(Map),
}

impl Document {
    /// Creates an empty map document.
    pub fn map() -> Self {
        Document::Map(Map::new())
    }

    /// Creates an empty sequence document.
    pub fn sequence() -> Self {
        Document::Sequence(Vec::new())
    }

    /// Returns a short name for the value's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Document::Null => "null",
            Document::Bool(_) => "bool",
            Document::Number(_) => "number",
            Document::String(_) => "string",
            Document::Sequence(_) => "sequence",
            Document::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Document::Null)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Document::Map(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Document::Sequence(_))
    }

    /// Returns true for maps and sequences.
    pub fn is_container(&self) -> bool {
        matches!(self, Document::Map(_) | Document::Sequence(_))
    }

    /// Returns true for booleans, numbers and strings. Null is not a scalar.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Document::Bool(_) | Document::Number(_) | Document::String(_)
        )
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Document::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Document]> {
        match self {
            Document::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Document::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Number of direct children; zero for scalars and null.
    pub fn len(&self) -> usize {
        match self {
            Document::Map(map) => map.len(),
            Document::Sequence(items) => items.len(),
            _ => 0,
        }
    }

    /// True for containers without children and for null.
    pub fn is_empty(&self) -> bool {
        match self {
            Document::Map(map) => map.is_empty(),
            Document::Sequence(items) => items.is_empty(),
            Document::Null => true,
            _ => false,
        }
    }

    /// Truthiness used when a where-clause flag such as `exist` is read.
    pub fn is_truthy(&self) -> bool {
        match self {
            Document::Null => false,
            Document::Bool(b) => *b,
            Document::Number(n) => n.as_f64() != 0.0,
            Document::String(s) => !s.is_empty() && s != "0",
            Document::Sequence(items) => !items.is_empty(),
            Document::Map(map) => !map.is_empty(),
        }
    }

    /// Coerces the value into a map key.
    ///
    /// Strings are used as-is, numbers and booleans use their display form,
    /// and null or containers become the empty string.
    pub fn to_key_string(&self) -> String {
        match self {
            Document::String(s) => s.clone(),
            Document::Number(n) => n.to_string(),
            Document::Bool(b) => b.to_string(),
            Document::Null | Document::Sequence(_) | Document::Map(_) => String::new(),
        }
    }

    /// Looks up a direct child by key.
    ///
    /// Maps match the key string exactly; sequences interpret it as an
    /// index and return `None` when it is not a valid one.
    pub fn child(&self, key: &str) -> Option<&Document> {
        match self {
            Document::Map(map) => map.get(key),
            Document::Sequence(items) => parse_index(key).and_then(|i| items.get(i)),
            _ => None,
        }
    }

    pub fn child_mut(&mut self, key: &str) -> Option<&mut Document> {
        match self {
            Document::Map(map) => map.get_mut(key),
            Document::Sequence(items) => parse_index(key).and_then(move |i| items.get_mut(i)),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.child(key).is_some()
    }

    /// Returns the keys of a container in iteration order.
    ///
    /// Sequence keys are their indices rendered as strings.
    pub fn keys(&self) -> Vec<String> {
        match self {
            Document::Map(map) => map.keys().cloned().collect(),
            Document::Sequence(items) => (0..items.len()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// Returns `(key, child)` pairs of a container in iteration order.
    pub fn entries(&self) -> Vec<(String, &Document)> {
        match self {
            Document::Map(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            Document::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Removes a direct child without renumbering its siblings.
    ///
    /// Removing the last element of a sequence pops it. Removing any other
    /// element turns the sequence into a map keyed by the surviving original
    /// indices, so `[a, b, c]` minus index 0 becomes `{"1": b, "2": c}`.
    /// A map whose remaining keys are `"0"` to `"n-1"` in order turns back
    /// into a sequence, so `[a, b, c]` minus 1 then 2 is `[a]` again.
    pub fn remove_child(&mut self, key: &str) -> Option<Document> {
        match self {
            Document::Map(map) => {
                let removed = map.shift_remove(key);
                if removed.is_some() && is_list_shaped(map) {
                    debug!(len = map.len(), "remaining keys are contiguous, restoring sequence");
                    let items = std::mem::take(map).into_values().collect();
                    *self = Document::Sequence(items);
                }
                removed
            }
            Document::Sequence(items) => {
                let index = parse_index(key)?;
                if index >= items.len() {
                    return None;
                }
                if index + 1 == items.len() {
                    return items.pop();
                }
                debug!(index, "removing inner sequence element, keeping original indices");
                let mut map = Map::with_capacity(items.len());
                for (i, item) in std::mem::take(items).into_iter().enumerate() {
                    map.insert(i.to_string(), item);
                }
                let removed = map.shift_remove(key);
                *self = Document::Map(map);
                removed
            }
            _ => None,
        }
    }

    /// Next free index of a container.
    ///
    /// Sequences return their length. Maps return one past the largest
    /// integer key, or the entry count when no key is an integer.
    pub fn next_index(&self) -> usize {
        match self {
            Document::Sequence(items) => items.len(),
            Document::Map(map) => map
                .keys()
                .filter_map(|k| parse_index(k))
                .max()
                .map(|max| max + 1)
                .unwrap_or(map.len()),
            _ => 0,
        }
    }
}

/// Parses a canonical non-negative index (`"0"`, `"12"`, never `"01"` or `"+1"`).
pub fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse().ok()
}

/// True for a non-empty map keyed `"0"` to `"n-1"` in order. Such a map
/// has the shape of a list and is written out as an array.
pub fn is_list_shaped(map: &Map) -> bool {
    !map.is_empty() && map.keys().enumerate().all(|(i, key)| parse_index(key) == Some(i))
}

impl From<bool> for Document {
    fn from(b: bool) -> Self {
        Document::Bool(b)
    }
}

impl From<i64> for Document {
    fn from(i: i64) -> Self {
        Document::Number(Number::Integer(i))
    }
}

impl From<i32> for Document {
    fn from(i: i32) -> Self {
        Document::Number(Number::Integer(i64::from(i)))
    }
}

impl From<f64> for Document {
    fn from(f: f64) -> Self {
        Document::Number(Number::Float(f))
    }
}

impl From<Number> for Document {
    fn from(n: Number) -> Self {
        Document::Number(n)
    }
}

impl From<&str> for Document {
    fn from(s: &str) -> Self {
        Document::String(s.to_string())
    }
}

impl From<String> for Document {
    fn from(s: String) -> Self {
        Document::String(s)
    }
}

impl From<Vec<Document>> for Document {
    fn from(items: Vec<Document>) -> Self {
        Document::Sequence(items)
    }
}

impl From<Map> for Document {
    fn from(map: Map) -> Self {
        Document::Map(map)
    }
}

impl<T: Into<Document>> From<Option<T>> for Document {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Document::Null)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::codec::to_json_compact(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(items: &[i64]) -> Document {
        Document::Sequence(items.iter().map(|i| Document::from(*i)).collect())
    }

    #[test]
    fn test_number_parse() {
        assert_eq!(Number::parse("42"), Some(Number::Integer(42)));
        assert_eq!(Number::parse(" 4.5 "), Some(Number::Float(4.5)));
        assert_eq!(Number::parse("1e3"), Some(Number::Float(1000.0)));
        assert_eq!(Number::parse("abc"), None);
        assert_eq!(Number::parse("inf"), None);
        assert_eq!(Number::parse(""), None);
    }

    #[test]
    fn test_strict_equality_keeps_number_kinds_apart() {
        assert_ne!(Document::from(1), Document::from(1.0));
        assert_eq!(Document::from(1), Document::from(1i64));
    }

    #[test]
    fn test_parse_index_is_canonical() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("17"), Some(17));
        assert_eq!(parse_index("01"), None);
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index("a"), None);
    }

    #[test]
    fn test_child_on_sequence_uses_index() {
        let doc = seq(&[10, 20, 30]);
        assert_eq!(doc.child("1"), Some(&Document::from(20)));
        assert_eq!(doc.child("3"), None);
        assert_eq!(doc.child("x"), None);
    }

    #[test]
    fn test_remove_last_sequence_element_pops() {
        let mut doc = seq(&[1, 2, 3]);
        assert_eq!(doc.remove_child("2"), Some(Document::from(3)));
        assert_eq!(doc, seq(&[1, 2]));
    }

    #[test]
    fn test_remove_inner_sequence_element_keeps_indices() {
        let mut doc = seq(&[1, 2, 3]);
        assert_eq!(doc.remove_child("0"), Some(Document::from(1)));
        let map = doc.as_map().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(doc.next_index(), 3);
    }

    #[test]
    fn test_remove_restores_sequence_when_keys_are_contiguous() {
        let mut doc = seq(&[1, 2, 3]);
        doc.remove_child("1");
        assert!(doc.is_map());
        doc.remove_child("2");
        assert_eq!(doc, seq(&[1]));
    }

    #[test]
    fn test_list_shape() {
        let mut map = Map::new();
        assert!(!is_list_shaped(&map));
        map.insert("0".to_string(), Document::from(1));
        map.insert("1".to_string(), Document::from(2));
        assert!(is_list_shaped(&map));
        map.swap_remove("0");
        assert!(!is_list_shaped(&map));
    }

    #[test]
    fn test_next_index_on_string_keyed_map_counts_entries() {
        let mut map = Map::new();
        map.insert("a".to_string(), Document::Null);
        map.insert("b".to_string(), Document::Null);
        assert_eq!(Document::Map(map).next_index(), 2);
    }

    #[test]
    fn test_to_key_string() {
        assert_eq!(Document::from("k").to_key_string(), "k");
        assert_eq!(Document::from(3).to_key_string(), "3");
        assert_eq!(Document::Null.to_key_string(), "");
        assert_eq!(Document::sequence().to_key_string(), "");
    }
}
