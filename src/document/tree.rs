//! An owned document with path access as methods.
//!
//! `DocumentTree` wraps a root `Document` together with the `PathSyntax`
//! used to address it, and keeps an optional snapshot that `reset` can
//! return to.
//!
//! # Example
//!
//! ```
//! use nestpath::document::tree::DocumentTree;
//! use nestpath::document::node::Document;
//!
//! let mut tree = DocumentTree::default();
//! tree.set("user.name", Document::from("Alice")).unwrap();
//! tree.set("user.tags[]", Document::from("admin")).unwrap();
//!
//! assert_eq!(tree.get("user.name"), Some(&Document::from("Alice")));
//! assert_eq!(tree.count("user.tags"), 1);
//! ```

use super::node::{Document, Map};
use crate::file::saver::{save_document, WriteOptions, WriteReport};
use crate::path::accessor::{self, SetReturn};
use crate::path::parser::PathSyntax;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTree {
    root: Document,
    syntax: PathSyntax,
    /// Snapshot taken by `copy`, restored by `reset`.
    snapshot: Option<Document>,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new(Document::map())
    }
}

impl DocumentTree {
    /// Creates a tree over `root` using the default path syntax.
    pub fn new(root: Document) -> Self {
        Self::with_syntax(root, PathSyntax::default())
    }

    pub fn with_syntax(root: Document, syntax: PathSyntax) -> Self {
        Self {
            root,
            syntax,
            snapshot: None,
        }
    }

    pub fn root(&self) -> &Document {
        &self.root
    }

    pub fn into_inner(self) -> Document {
        self.root
    }

    pub fn syntax(&self) -> &PathSyntax {
        &self.syntax
    }

    pub fn get(&self, path: &str) -> Option<&Document> {
        accessor::get_with(&self.root, path, &self.syntax)
    }

    pub fn has(&self, path: &str) -> bool {
        accessor::has_with(&self.root, path, &self.syntax)
    }

    /// Writes `value` at `path` and returns the written value.
    pub fn set(&mut self, path: &str, value: Document) -> Result<&Document> {
        let written = accessor::set_with(&mut self.root, path, value, &SetReturn::Child, &self.syntax)?;
        written.ok_or_else(|| crate::Error::InvalidPath(path.to_string()))
    }

    pub fn set_with(&mut self, path: &str, value: Document, mode: &SetReturn) -> Result<Option<&Document>> {
        accessor::set_with(&mut self.root, path, value, mode, &self.syntax)
    }

    pub fn delete(&mut self, path: &str) -> bool {
        accessor::delete_with(&mut self.root, path, &self.syntax)
    }

    /// Removes the value at `path` and returns it.
    pub fn extract(&mut self, path: &str) -> Option<Document> {
        accessor::extract_with(&mut self.root, path, &self.syntax)
    }

    /// Number of children of the container at `path`; zero for anything else.
    pub fn count(&self, path: &str) -> usize {
        self.resolve(path).map(Document::len).unwrap_or(0)
    }

    /// Next free index of the container at `path`.
    pub fn next_index(&self, path: &str) -> usize {
        self.resolve(path).map(Document::next_index).unwrap_or(0)
    }

    /// An empty path addresses the root.
    fn resolve(&self, path: &str) -> Option<&Document> {
        if path.is_empty() {
            return Some(&self.root);
        }
        self.get(path)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Replaces the root with an empty map. The snapshot survives.
    pub fn clear(&mut self) {
        self.root = Document::map();
    }

    /// Takes a snapshot of the current root.
    pub fn copy(&mut self) {
        self.snapshot = Some(self.root.clone());
    }

    /// Clears the tree, then restores the snapshot unless `to_empty` is set.
    pub fn reset(&mut self, to_empty: bool) {
        self.clear();
        if !to_empty {
            if let Some(snapshot) = &self.snapshot {
                self.root = snapshot.clone();
            }
        }
    }

    /// Entries of the collection at `path` whose every criteria key is
    /// present and strictly equal to the given value.
    pub fn select(&self, path: &str, criteria: &Map) -> Vec<&Document> {
        let Some(collection) = self.get(path) else {
            return Vec::new();
        };
        collection
            .entries()
            .into_iter()
            .map(|(_, entry)| entry)
            .filter(|entry| {
                criteria.iter().all(|(key, expected)| {
                    accessor::get_with(entry, key, &self.syntax) == Some(expected)
                })
            })
            .collect()
    }

    /// Flattens the tree into a single-level map of scalar leaves keyed by
    /// their joined paths. Empty containers are kept as leaves.
    pub fn flatten(&self) -> Document {
        let mut out = Map::new();
        flatten_into(&self.root, String::new(), self.syntax.joiner(), &mut out);
        Document::Map(out)
    }

    /// Recursively drops null entries from maps and sequences.
    pub fn remove_null(&mut self) {
        strip_nulls(&mut self.root);
    }

    /// Writes the tree to `path` as JSON.
    pub fn write(&self, path: &Path, options: &WriteOptions) -> anyhow::Result<WriteReport> {
        save_document(path, &self.root, options)
    }
}

impl From<Document> for DocumentTree {
    fn from(root: Document) -> Self {
        Self::new(root)
    }
}

fn flatten_into(node: &Document, prefix: String, joiner: &str, out: &mut Map) {
    if !node.is_container() || (node.is_empty() && !prefix.is_empty()) {
        out.insert(prefix, node.clone());
        return;
    }
    for (key, child) in node.entries() {
        let path = if prefix.is_empty() {
            key
        } else {
            format!("{}{}{}", prefix, joiner, key)
        };
        flatten_into(child, path, joiner, out);
    }
}

fn strip_nulls(node: &mut Document) {
    match node {
        Document::Map(map) => {
            map.retain(|_, value| !value.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Document::Sequence(items) => {
            items.retain(|value| !value.is_null());
            items.iter_mut().for_each(strip_nulls);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::codec::parse_json;

    fn tree(json: &str) -> DocumentTree {
        DocumentTree::new(parse_json(json).unwrap())
    }

    #[test]
    fn test_copy_and_reset() {
        let mut t = tree(r#"{"a": 1}"#);
        t.copy();
        t.set("b", Document::from(2)).unwrap();
        t.reset(false);
        assert_eq!(t.root(), &parse_json(r#"{"a": 1}"#).unwrap());
        t.reset(true);
        assert!(t.is_empty());
    }

    #[test]
    fn test_reset_without_snapshot_clears() {
        let mut t = tree(r#"{"a": 1}"#);
        t.reset(false);
        assert!(t.is_empty());
    }

    #[test]
    fn test_count_and_next_index() {
        let mut t = tree(r#"{"list": [1, 2, 3], "name": "x"}"#);
        assert_eq!(t.count("list"), 3);
        assert_eq!(t.count("name"), 0);
        assert_eq!(t.count("missing"), 0);
        assert_eq!(t.count(""), 2);
        t.delete("list.0");
        assert_eq!(t.count("list"), 2);
        assert_eq!(t.next_index("list"), 3);
    }

    #[test]
    fn test_flatten() {
        let t = tree(r#"{"a": {"b": 1, "c": [true, null]}, "d": {}}"#);
        let flat = t.flatten();
        assert_eq!(flat.keys(), vec!["a.b", "a.c.0", "a.c.1", "d"]);
        assert_eq!(flat.child("a.c.0"), Some(&Document::from(true)));
        assert_eq!(flat.child("d"), Some(&Document::map()));
    }

    #[test]
    fn test_remove_null() {
        let mut t = tree(r#"{"a": null, "b": {"c": null, "d": 1}, "e": [null, 2]}"#);
        t.remove_null();
        assert_eq!(t.root(), &parse_json(r#"{"b": {"d": 1}, "e": [2]}"#).unwrap());
    }

    #[test]
    fn test_select() {
        let t = tree(
            r#"{"users": [
                {"name": "a", "role": "admin", "active": true},
                {"name": "b", "role": "user", "active": true},
                {"name": "c", "role": "admin", "active": false}
            ]}"#,
        );
        let mut criteria = Map::new();
        criteria.insert("role".to_string(), Document::from("admin"));
        criteria.insert("active".to_string(), Document::from(true));
        let found = t.select("users", &criteria);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].child("name"), Some(&Document::from("a")));
        assert!(t.select("missing", &criteria).is_empty());
    }
}
