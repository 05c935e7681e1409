//! Parsed path representation.

use super::accessor;
use super::parser::{Parser, PathSyntax};
use crate::document::node::Document;
use std::fmt;

/// One step of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A literal key. Sequences read it as an index, maps as a string.
    Key(String),
    /// `[$name]`: the key is whatever `name` resolves to in the root document.
    Indirect(String),
    /// `[]`: the next free index of the container (only meaningful for writes).
    Append,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{}", key),
            Segment::Indirect(name) => write!(f, "[${}]", name),
            Segment::Append => write!(f, "[]"),
        }
    }
}

/// A segment after indirect references have been looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Key(String),
    Append,
}

impl Step {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Step::Key(key) => Some(key),
            Step::Append => None,
        }
    }
}

/// A parsed path: the raw text plus its segments.
///
/// Parsing never yields an empty segment list; a path without any delimiter
/// or bracket group is a single literal key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    raw: String,
    segments: Vec<Segment>,
}

impl PathExpression {
    pub(crate) fn new(raw: &str, segments: Vec<Segment>) -> Self {
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    /// Parses a path using the default syntax (`.` delimiter, `$` marker).
    pub fn parse(raw: &str) -> Self {
        Parser::parse(raw, &PathSyntax::default())
    }

    pub fn parse_with(raw: &str, syntax: &PathSyntax) -> Self {
        Parser::parse(raw, syntax)
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_indirect(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Indirect(_)))
    }

    /// Resolves indirect segments against `root`.
    ///
    /// An indirect reference that does not resolve, or resolves to null or
    /// a container, becomes the empty key.
    pub fn resolve(&self, root: &Document, syntax: &PathSyntax) -> Vec<Step> {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Key(key) => Step::Key(key.clone()),
                Segment::Indirect(name) => {
                    let key = accessor::get_with(root, name, syntax)
                        .map(Document::to_key_string)
                        .unwrap_or_default();
                    Step::Key(key)
                }
                Segment::Append => Step::Append,
            })
            .collect()
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
