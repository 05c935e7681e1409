//! Condition operators and their accepted spellings.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// A comparison applied by a where-clause condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    StrictlyExact,
    NotStrictlyExact,
    Exact,
    NotExact,
    In,
    NotIn,
    GreaterThan,
    GreaterThanEqual,
    LowerThan,
    LowerThanEqual,
    /// Exclusive `lo..hi` range.
    Between,
    /// Inclusive `lo..hi` range.
    BetweenEquals,
    Before,
    After,
    StrictlyBefore,
    StrictlyAfter,
    Partial,
    NotPartial,
    Start,
    NotStart,
    End,
    NotEnd,
}

impl Operator {
    pub const ALL: [Operator; 22] = [
        Operator::StrictlyExact,
        Operator::NotStrictlyExact,
        Operator::Exact,
        Operator::NotExact,
        Operator::In,
        Operator::NotIn,
        Operator::GreaterThan,
        Operator::GreaterThanEqual,
        Operator::LowerThan,
        Operator::LowerThanEqual,
        Operator::Between,
        Operator::BetweenEquals,
        Operator::Before,
        Operator::After,
        Operator::StrictlyBefore,
        Operator::StrictlyAfter,
        Operator::Partial,
        Operator::NotPartial,
        Operator::Start,
        Operator::NotStart,
        Operator::End,
        Operator::NotEnd,
    ];

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        self.spellings()[0]
    }

    /// Every accepted spelling, canonical name first.
    pub fn spellings(&self) -> &'static [&'static str] {
        match self {
            Operator::StrictlyExact => &["strictly-exact", "strictly-equal", "==="],
            Operator::NotStrictlyExact => &["not-strictly-exact", "not-strictly-equal", "!=="],
            Operator::Exact => &["exact", "equal", "=="],
            Operator::NotExact => &["not-exact", "not-equal", "!="],
            Operator::In => &["in"],
            Operator::NotIn => &["not-in"],
            Operator::GreaterThan => &["gt", "greater-than", ">"],
            Operator::GreaterThanEqual => &["gte", "greater-than-equal", ">="],
            Operator::LowerThan => &["lt", "lower-than", "<"],
            Operator::LowerThanEqual => &["lte", "lower-than-equal", "<="],
            Operator::Between => &["between", "> <"],
            Operator::BetweenEquals => &["between-equals", ">=<"],
            Operator::Before => &["before"],
            Operator::After => &["after"],
            Operator::StrictlyBefore => &["strictly-before"],
            Operator::StrictlyAfter => &["strictly-after"],
            Operator::Partial => &["partial"],
            Operator::NotPartial => &["not-partial"],
            Operator::Start => &["start"],
            Operator::NotStart => &["not-start"],
            Operator::End => &["end"],
            Operator::NotEnd => &["not-end"],
        }
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .iter()
            .find(|op| op.spellings().contains(&s))
            .copied()
            .ok_or_else(|| Error::MalformedCondition(format!("unknown operator '{}'", s)))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
