//! List and record filtering.
//!
//! A `Filter` owns a document. In list mode the document is a collection of
//! records and `where_clause` shrinks it to the records that match; the
//! removal is destructive and visible to later calls. In record mode the
//! document is a single record that is tested but never modified.

use super::condition::{Clause, WhereClause};
use super::predicate::evaluate_with;
use super::timestamp::{DefaultTimestampParser, TimestampParser};
use crate::document::node::Document;
use crate::error::Result;
use crate::path::accessor::{get_with, has_with};
use crate::path::parser::PathSyntax;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    List,
    Record,
}

impl FilterMode {
    /// Picks list mode for sequences and for maps whose values are all
    /// containers, record mode for anything else.
    pub fn detect(doc: &Document) -> Self {
        match doc {
            Document::Sequence(_) => FilterMode::List,
            Document::Map(map) if map.values().all(Document::is_container) => FilterMode::List,
            _ => FilterMode::Record,
        }
    }
}

impl FromStr for FilterMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "list" => Ok(FilterMode::List),
            "record" => Ok(FilterMode::Record),
            other => Err(crate::Error::InvalidPath(format!("unknown filter mode '{}'", other))),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::List => f.write_str("list"),
            FilterMode::Record => f.write_str("record"),
        }
    }
}

/// Applies where-clauses to an owned document.
///
/// # Example
///
/// ```
/// use nestpath::document::codec::parse_json;
/// use nestpath::filter::{Filter, WhereClause};
///
/// let users = parse_json(r#"[{"id": 1, "active": true}, {"id": 2, "active": false}]"#).unwrap();
/// let mut filter = Filter::list(users);
///
/// let matched = filter.where_clause(&WhereClause::new().equals("active", true)).unwrap().unwrap();
/// assert_eq!(matched.len(), 1);
/// assert_eq!(filter.document().len(), 1);
/// ```
pub struct Filter {
    document: Document,
    mode: FilterMode,
    syntax: PathSyntax,
    timestamps: Box<dyn TimestampParser>,
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("document", &self.document)
            .field("mode", &self.mode)
            .field("syntax", &self.syntax)
            .finish_non_exhaustive()
    }
}

impl Filter {
    pub fn new(document: Document, mode: FilterMode) -> Self {
        Self {
            document,
            mode,
            syntax: PathSyntax::default(),
            timestamps: Box::new(DefaultTimestampParser),
        }
    }

    /// A filter over a collection of records.
    pub fn list(document: Document) -> Self {
        Self::new(document, FilterMode::List)
    }

    /// A filter over a single record.
    pub fn record(document: Document) -> Self {
        Self::new(document, FilterMode::Record)
    }

    /// A filter whose mode is picked from the document's shape.
    pub fn auto(document: Document) -> Self {
        let mode = FilterMode::detect(&document);
        Self::new(document, mode)
    }

    pub fn with_syntax(mut self, syntax: PathSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn with_timestamp_parser(mut self, parser: impl TimestampParser + 'static) -> Self {
        self.timestamps = Box::new(parser);
        self
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Runs the where-clause.
    ///
    /// List mode returns the matching records, keyed by their original
    /// positions, and keeps only those in the filter's document. It returns
    /// `None` when the document is not a collection of map records, or when
    /// a condition is malformed; in both cases the document is untouched.
    ///
    /// Record mode returns the record when it matches and `None` otherwise.
    /// A malformed condition is an error.
    pub fn where_clause(&mut self, clause: &WhereClause) -> Result<Option<Document>> {
        match self.mode {
            FilterMode::List => match self.filter_list(&self.document, clause) {
                Ok(Some(matched)) => {
                    self.document = matched.clone();
                    Ok(Some(matched))
                }
                Ok(None) => Ok(None),
                Err(err) if err.is_malformed_condition() => {
                    warn!(error = %err, "aborting list filter");
                    Ok(None)
                }
                Err(err) => Err(err),
            },
            FilterMode::Record => {
                let wrapped = Document::Sequence(vec![self.document.clone()]);
                let matched = self.filter_list(&wrapped, clause)?;
                Ok(matched.and_then(|list| list.as_sequence().and_then(|items| items.first().cloned())))
            }
        }
    }

    /// Filters a copy of `list`. `None` when it is not a collection of maps.
    fn filter_list(&self, list: &Document, clause: &WhereClause) -> Result<Option<Document>> {
        if !list.is_container() {
            debug!(kind = list.kind_name(), "document is not a collection");
            return Ok(None);
        }

        let mut rejected = Vec::new();
        for (key, record) in list.entries() {
            if !record.is_map() {
                debug!(key = %key, kind = record.kind_name(), "record is not a map");
                return Ok(None);
            }
            if !self.matches(record, clause)? {
                rejected.push(key);
            }
        }

        let mut kept = list.clone();
        for key in &rejected {
            debug!(key = %key, "removing record");
            kept.remove_child(key);
        }
        Ok(Some(kept))
    }

    /// Evaluates every clause, even after one has failed, so a malformed
    /// condition anywhere in the clause is reported.
    fn matches(&self, record: &Document, clause: &WhereClause) -> Result<bool> {
        let mut matched = true;
        for test in clause.clauses() {
            let passed = match test {
                Clause::Exists { attribute, expected } => {
                    has_with(record, attribute, &self.syntax) == *expected
                }
                Clause::Compare { attribute, condition } => {
                    let value = get_with(record, attribute, &self.syntax);
                    evaluate_with(value, condition, self.timestamps.as_ref())?
                }
            };
            matched &= passed;
        }
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::codec::parse_json;

    fn doc(json: &str) -> Document {
        parse_json(json).unwrap()
    }

    #[test]
    fn test_detect_mode() {
        assert_eq!(FilterMode::detect(&doc("[]")), FilterMode::List);
        assert_eq!(FilterMode::detect(&doc(r#"{"a": {"x": 1}, "b": {}}"#)), FilterMode::List);
        assert_eq!(FilterMode::detect(&doc(r#"{"a": {"x": 1}, "b": null}"#)), FilterMode::Record);
        assert_eq!(FilterMode::detect(&doc(r#"{"id": 1}"#)), FilterMode::Record);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("list".parse::<FilterMode>().unwrap(), FilterMode::List);
        assert_eq!("record".parse::<FilterMode>().unwrap(), FilterMode::Record);
        assert!("auto".parse::<FilterMode>().is_err());
    }

    #[test]
    fn test_scalar_document_yields_none() {
        let mut filter = Filter::list(Document::from(3));
        assert_eq!(filter.where_clause(&WhereClause::new()).unwrap(), None);
    }

    #[test]
    fn test_non_map_record_yields_none() {
        let mut filter = Filter::list(doc(r#"[{"id": 1}, 2]"#));
        assert_eq!(filter.where_clause(&WhereClause::new().equals("id", 1)).unwrap(), None);
        assert_eq!(filter.document(), &doc(r#"[{"id": 1}, 2]"#));
    }

    #[test]
    fn test_custom_timestamp_parser() {
        let mut filter = Filter::list(doc(r#"[{"at": "soon"}, {"at": "later"}]"#))
            .with_timestamp_parser(|text: &str| -> Option<i64> {
                match text {
                    "soon" => Some(1),
                    "later" => Some(10),
                    "mid" => Some(5),
                    _ => None,
                }
            });
        let clause = WhereClause::new().compare(
            "at",
            crate::filter::Condition::new(crate::filter::Operator::StrictlyBefore, "mid"),
        );
        let matched = filter.where_clause(&clause).unwrap().unwrap();
        assert_eq!(matched, doc(r#"[{"at": "soon"}]"#));
    }
}
