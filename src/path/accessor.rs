//! Get, set, delete and has over a document, addressed by path strings.
//!
//! Every lookup tries compound keys first: with path `a.b.c`, a key literally
//! named `"a.b.c"` wins over `"a.b"` followed by `"c"`, which wins over
//! `"a"`, `"b"`, `"c"`. Once a compound key matches, the walk commits to it.
//!
//! Missing data is never an error. `get` returns `None`, `has` returns
//! `false`, `delete` returns `false`.

use super::ast::{PathExpression, Step};
use super::parser::PathSyntax;
use crate::document::node::{parse_index, Document};
use crate::error::{Error, Result};
use tracing::debug;

/// What `set` hands back after writing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SetReturn {
    /// The value just written.
    #[default]
    Child,
    /// The whole document.
    Root,
    /// Whatever another path resolves to after the write.
    Path(String),
}

impl SetReturn {
    /// Parses `child`, `root`, or any other string as a path.
    pub fn from_name(name: &str) -> Self {
        match name {
            "child" => SetReturn::Child,
            "root" => SetReturn::Root,
            other => SetReturn::Path(other.to_string()),
        }
    }
}

/// Reads the value at `path`.
///
/// # Example
///
/// ```
/// use nestpath::document::codec::parse_json;
/// use nestpath::path::accessor::get;
///
/// let doc = parse_json(r#"{"a.b": 1, "a": {"b": 2}}"#).unwrap();
/// assert_eq!(get(&doc, "a.b").and_then(|v| v.as_i64()), Some(1));
/// ```
pub fn get<'a>(doc: &'a Document, path: &str) -> Option<&'a Document> {
    get_with(doc, path, &PathSyntax::default())
}

pub fn get_with<'a>(doc: &'a Document, path: &str, syntax: &PathSyntax) -> Option<&'a Document> {
    let expr = PathExpression::parse_with(path, syntax);
    get_expr(doc, &expr, syntax)
}

/// Reads the value at an already parsed path.
pub fn get_expr<'a>(doc: &'a Document, expr: &PathExpression, syntax: &PathSyntax) -> Option<&'a Document> {
    let steps = expr.resolve(doc, syntax);
    let keys = keys_of(&steps)?;
    get_at(doc, &keys, syntax.joiner())
}

fn get_at<'a>(node: &'a Document, keys: &[String], joiner: &str) -> Option<&'a Document> {
    for end in (1..=keys.len()).rev() {
        let candidate = keys[..end].join(joiner);
        if let Some(child) = node.child(&candidate) {
            if end > 1 {
                debug!(key = %candidate, "matched compound key");
            }
            if end == keys.len() {
                return Some(child);
            }
            return get_at(child, &keys[end..], joiner);
        }
    }
    None
}

/// True when `path` exists, even if it holds null.
///
/// An empty path on an empty document is vacuously present.
pub fn has(doc: &Document, path: &str) -> bool {
    has_with(doc, path, &PathSyntax::default())
}

pub fn has_with(doc: &Document, path: &str, syntax: &PathSyntax) -> bool {
    if path.is_empty() && doc.is_empty() {
        return true;
    }
    get_with(doc, path, syntax).is_some()
}

/// Writes `value` at `path` and returns the value just written.
///
/// Missing intermediate keys become maps. Writing a map over a map merges
/// the fields; any other overwrite of a map key removes the old entry first,
/// so the key moves to the end of its map.
pub fn set<'a>(doc: &'a mut Document, path: &str, value: Document) -> Result<&'a Document> {
    let syntax = PathSyntax::default();
    let written = set_with(doc, path, value, &SetReturn::Child, &syntax)?;
    written.ok_or_else(|| Error::InvalidPath(path.to_string()))
}

/// Writes `value` at `path`, returning what `mode` asks for.
///
/// `SetReturn::Path` yields `None` when the secondary path does not resolve.
pub fn set_with<'a>(
    doc: &'a mut Document,
    path: &str,
    value: Document,
    mode: &SetReturn,
    syntax: &PathSyntax,
) -> Result<Option<&'a Document>> {
    let expr = PathExpression::parse_with(path, syntax);
    let steps = expr.resolve(doc, syntax);
    let joiner = syntax.joiner();

    match mode {
        SetReturn::Child => {
            let written = write_at(doc, &steps, value, joiner)?;
            Ok(Some(&*written))
        }
        SetReturn::Root => {
            write_at(doc, &steps, value, joiner)?;
            Ok(Some(&*doc))
        }
        SetReturn::Path(other) => {
            write_at(doc, &steps, value, joiner)?;
            Ok(get_with(doc, other, syntax))
        }
    }
}

fn write_at<'a>(node: &'a mut Document, steps: &[Step], value: Document, joiner: &str) -> Result<&'a mut Document> {
    if node.is_null() {
        *node = empty_container_for(steps);
    }
    if !node.is_container() {
        return Err(Error::type_mismatch("container", node.kind_name()));
    }

    let (consumed, key) = choose_write_key(node, steps, joiner);
    if consumed == steps.len() {
        return write_leaf(node, &key, value);
    }

    let rest = &steps[consumed..];
    if !node.contains_key(&key) {
        debug!(key = %key, "creating intermediate container");
        write_leaf(node, &key, empty_container_for(rest))?;
    }
    match node.child_mut(&key) {
        Some(child) => write_at(child, rest, value, joiner),
        None => Err(Error::InvalidPath(key)),
    }
}

/// Picks the key to write or descend into, and how many steps it covers.
fn choose_write_key(node: &Document, steps: &[Step], joiner: &str) -> (usize, String) {
    let literal: Vec<&str> = steps.iter().map_while(Step::as_key).collect();
    if literal.is_empty() {
        return (1, node.next_index().to_string());
    }

    for end in (2..=literal.len()).rev() {
        let candidate = literal[..end].join(joiner);
        match node.child(&candidate) {
            Some(_) if end == steps.len() => return (end, candidate),
            Some(child) if child.is_container() => {
                debug!(key = %candidate, "writing through compound key");
                return (end, candidate);
            }
            _ => {}
        }
    }
    (1, literal[0].to_string())
}

/// An append step asks for a sequence; everything else gets a map.
fn empty_container_for(steps: &[Step]) -> Document {
    match steps.first() {
        Some(Step::Append) => Document::sequence(),
        _ => Document::map(),
    }
}

fn write_leaf<'a>(node: &'a mut Document, key: &str, value: Document) -> Result<&'a mut Document> {
    match node {
        Document::Map(map) => {
            if let Some(index) = map.get_index_of(key) {
                if absorbs(&map[index], &value) {
                    let slot = &mut map[index];
                    absorb(slot, value);
                    return Ok(slot);
                }
            }
            map.shift_remove(key);
            let (index, _) = map.insert_full(key.to_string(), value);
            Ok(&mut map[index])
        }
        Document::Sequence(items) => {
            let index = parse_index(key).ok_or_else(|| Error::type_mismatch("map", "sequence"))?;
            if index < items.len() {
                let slot = &mut items[index];
                if absorbs(slot, &value) {
                    absorb(slot, value);
                } else {
                    *slot = value;
                }
                Ok(slot)
            } else if index == items.len() {
                items.push(value);
                Ok(&mut items[index])
            } else {
                Err(Error::InvalidPath(format!(
                    "index {} is past the end of a sequence of length {}",
                    index,
                    items.len()
                )))
            }
        }
        other => Err(Error::type_mismatch("container", other.kind_name())),
    }
}

/// True when writing `value` over `existing` should merge instead of replace:
/// a map over a map, or an index-keyed map over a sequence.
fn absorbs(existing: &Document, value: &Document) -> bool {
    match (existing, value) {
        (Document::Map(_), Document::Map(_)) => true,
        (Document::Sequence(items), Document::Map(fields)) => {
            let mut len = items.len();
            for key in fields.keys() {
                match parse_index(key) {
                    Some(i) if i < len => {}
                    Some(i) if i == len => len += 1,
                    _ => return false,
                }
            }
            true
        }
        _ => false,
    }
}

fn absorb(existing: &mut Document, value: Document) {
    let Document::Map(fields) = value else {
        *existing = value;
        return;
    };
    match existing {
        Document::Map(map) => {
            for (key, field) in fields {
                map.insert(key, field);
            }
        }
        Document::Sequence(items) => {
            for (key, field) in fields {
                match parse_index(&key) {
                    Some(i) if i < items.len() => items[i] = field,
                    _ => items.push(field),
                }
            }
        }
        _ => *existing = Document::Map(fields),
    }
}

/// Removes the value at `path`. Returns true when something was removed.
///
/// An exact key equal to the whole remaining path is removed directly. A
/// null placeholder found on the way down is dropped, but the delete still
/// reports false.
pub fn delete(doc: &mut Document, path: &str) -> bool {
    delete_with(doc, path, &PathSyntax::default())
}

pub fn delete_with(doc: &mut Document, path: &str, syntax: &PathSyntax) -> bool {
    let expr = PathExpression::parse_with(path, syntax);
    let steps = expr.resolve(doc, syntax);
    match keys_of(&steps) {
        Some(keys) => delete_at(doc, &keys, syntax.joiner()),
        None => false,
    }
}

fn delete_at(node: &mut Document, keys: &[String], joiner: &str) -> bool {
    let full = keys.join(joiner);
    if node.contains_key(&full) {
        return node.remove_child(&full).is_some();
    }

    for end in (1..keys.len()).rev() {
        let candidate = keys[..end].join(joiner);
        match node.child(&candidate) {
            Some(Document::Null) => {
                debug!(key = %candidate, "dropping null placeholder");
                node.remove_child(&candidate);
                return false;
            }
            Some(child) if child.is_container() => {
                return match node.child_mut(&candidate) {
                    Some(child) => delete_at(child, &keys[end..], joiner),
                    None => false,
                };
            }
            _ => {}
        }
    }
    false
}

/// Reads and removes the value at `path`.
pub fn extract(doc: &mut Document, path: &str) -> Option<Document> {
    extract_with(doc, path, &PathSyntax::default())
}

pub fn extract_with(doc: &mut Document, path: &str, syntax: &PathSyntax) -> Option<Document> {
    let value = get_with(doc, path, syntax)?.clone();
    delete_with(doc, path, syntax);
    Some(value)
}

/// Literal keys of a resolved path; `None` when it contains an append step.
fn keys_of(steps: &[Step]) -> Option<Vec<String>> {
    steps
        .iter()
        .map(|step| step.as_key().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::codec::parse_json;

    fn doc(json: &str) -> Document {
        parse_json(json).unwrap()
    }

    #[test]
    fn test_compound_key_precedence() {
        assert_eq!(get(&doc(r#"{"a.b.c": 1}"#), "a.b.c"), Some(&Document::from(1)));
        assert_eq!(get(&doc(r#"{"a": {"b.c": 2}}"#), "a.b.c"), Some(&Document::from(2)));
        assert_eq!(
            get(&doc(r#"{"a": {"b": {"c": 3}}}"#), "a.b.c"),
            Some(&Document::from(3))
        );
        assert_eq!(
            get(&doc(r#"{"a.b": 1, "a": {"b": 2}}"#), "a.b"),
            Some(&Document::from(1))
        );
    }

    #[test]
    fn test_compound_match_commits() {
        // "a.b" matches first and has no "c", so the nested route is not tried
        let d = doc(r#"{"a.b": {}, "a": {"b": {"c": 1}}}"#);
        assert_eq!(get(&d, "a.b.c"), None);
    }

    #[test]
    fn test_write_leaf_on_sequence() {
        let mut d = doc("[1, 2]");
        assert!(write_leaf(&mut d, "2", Document::from(3)).is_ok());
        assert!(write_leaf(&mut d, "5", Document::from(3)).is_err());
        assert!(write_leaf(&mut d, "x", Document::from(3)).is_err());
        assert_eq!(d, doc("[1, 2, 3]"));
    }

    #[test]
    fn test_absorbs_index_map_over_sequence() {
        let seq = doc("[1, 2]");
        assert!(absorbs(&seq, &doc(r#"{"0": 9, "2": 3}"#)));
        assert!(!absorbs(&seq, &doc(r#"{"3": 3}"#)));
        assert!(!absorbs(&seq, &doc(r#"{"a": 3}"#)));
    }

    #[test]
    fn test_delete_drops_null_placeholder() {
        let mut d = doc(r#"{"a": null, "b": 1}"#);
        assert!(!delete(&mut d, "a.x"));
        assert_eq!(d, doc(r#"{"b": 1}"#));
    }

    #[test]
    fn test_set_return_from_name() {
        assert_eq!(SetReturn::from_name("child"), SetReturn::Child);
        assert_eq!(SetReturn::from_name("root"), SetReturn::Root);
        assert_eq!(SetReturn::from_name("a.b"), SetReturn::Path("a.b".to_string()));
    }
}
