//! Conditions and where-clauses.
//!
//! A where-clause is usually written as a document:
//!
//! ```json
//! {
//!     "#": "comment keys with scalar values are ignored",
//!     "active": true,
//!     "age": {"operator": "gte", "value": 18},
//!     "email": {"exist": true},
//!     "address": {"country": "NL"},
//!     "tags": ["a", "b"]
//! }
//! ```
//!
//! A bare value means strict equality, a nested map compares each of its
//! keys below the attribute, and a sequence requires every element to match.

use super::operator::Operator;
use crate::document::node::{Document, Map};
use crate::error::{Error, Result};
use crate::path::parser::PathSyntax;

/// An operator with its operand.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub operator: Operator,
    pub value: Document,
    /// Loose comparisons coerce `"true"`, `"false"`, `"null"` and numeric
    /// strings before comparing. Only `in` and `not-in` consult this.
    pub strict: bool,
}

impl Condition {
    pub fn new(operator: Operator, value: impl Into<Document>) -> Self {
        Self {
            operator,
            value: value.into(),
            strict: true,
        }
    }

    pub fn loose(operator: Operator, value: impl Into<Document>) -> Self {
        Self {
            strict: false,
            ..Self::new(operator, value)
        }
    }

    /// Reads `{operator, value[, strict]}`. Returns `None` when the map does
    /// not carry both `operator` and `value`.
    pub fn from_map(map: &Map, default_strict: bool) -> Result<Option<Self>> {
        let (Some(operator), Some(value)) = (map.get("operator"), map.get("value")) else {
            return Ok(None);
        };
        let operator = match operator {
            Document::String(name) => name.parse::<Operator>()?,
            other => {
                return Err(Error::MalformedCondition(format!(
                    "operator must be a string, found {}",
                    other.kind_name()
                )))
            }
        };
        let strict = map
            .get("strict")
            .map(Document::is_truthy)
            .unwrap_or(default_strict);

        Ok(Some(Self {
            operator,
            value: value.clone(),
            strict,
        }))
    }
}

/// One test applied to every record.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// The attribute must (or must not) be present.
    Exists { attribute: String, expected: bool },
    /// The attribute's value must satisfy the condition.
    Compare { attribute: String, condition: Condition },
}

impl Clause {
    pub fn attribute(&self) -> &str {
        match self {
            Clause::Exists { attribute, .. } | Clause::Compare { attribute, .. } => attribute,
        }
    }
}

/// A conjunction of clauses.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereClause {
    clauses: Vec<Clause>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(mut self, attribute: &str, expected: bool) -> Self {
        self.clauses.push(Clause::Exists {
            attribute: attribute.to_string(),
            expected,
        });
        self
    }

    pub fn compare(mut self, attribute: &str, condition: Condition) -> Self {
        self.clauses.push(Clause::Compare {
            attribute: attribute.to_string(),
            condition,
        });
        self
    }

    /// Shorthand for a strictly-exact comparison.
    pub fn equals(self, attribute: &str, value: impl Into<Document>) -> Self {
        self.compare(attribute, Condition::new(Operator::StrictlyExact, value))
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Builds a where-clause from its document form, with strict defaults
    /// and `.` between nested attribute names.
    pub fn from_document(doc: &Document) -> Result<Self> {
        Self::from_document_with(doc, true, &PathSyntax::default())
    }

    pub fn from_document_with(doc: &Document, default_strict: bool, syntax: &PathSyntax) -> Result<Self> {
        let Document::Map(map) = doc else {
            return Err(Error::InvalidPath(format!(
                "where-clause must be a map, found {}",
                doc.kind_name()
            )));
        };

        let mut clause = WhereClause::new();
        let cleaned = strip_comments(map);
        for (attribute, value) in &cleaned {
            clause.push_entry(attribute, value, default_strict, syntax.joiner())?;
        }
        Ok(clause)
    }

    fn push_entry(&mut self, attribute: &str, value: &Document, default_strict: bool, joiner: &str) -> Result<()> {
        match value {
            Document::Map(fields) => {
                let mut shaped = false;
                for flag in ["exist", "exists"] {
                    if let Some(expected) = fields.get(flag) {
                        self.clauses.push(Clause::Exists {
                            attribute: attribute.to_string(),
                            expected: expected.is_truthy(),
                        });
                        shaped = true;
                    }
                }
                if let Some(condition) = Condition::from_map(fields, default_strict)? {
                    self.clauses.push(Clause::Compare {
                        attribute: attribute.to_string(),
                        condition,
                    });
                    shaped = true;
                }
                if !shaped {
                    for (key, nested) in fields {
                        let path = format!("{}{}{}", attribute, joiner, key);
                        self.push_entry(&path, nested, default_strict, joiner)?;
                    }
                }
            }
            Document::Sequence(items) => {
                for item in items {
                    self.clauses.push(Clause::Compare {
                        attribute: attribute.to_string(),
                        condition: Condition::new(Operator::StrictlyExact, item.clone()),
                    });
                }
            }
            scalar => {
                self.clauses.push(Clause::Compare {
                    attribute: attribute.to_string(),
                    condition: Condition::new(Operator::StrictlyExact, scalar.clone()),
                });
            }
        }
        Ok(())
    }
}

/// Drops `#`-prefixed keys holding scalars, at every depth.
fn strip_comments(map: &Map) -> Map {
    map.iter()
        .filter(|(key, value)| !(key.starts_with('#') && value.is_scalar()))
        .map(|(key, value)| {
            let value = match value {
                Document::Map(inner) => Document::Map(strip_comments(inner)),
                other => other.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}
