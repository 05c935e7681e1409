//! Where-clause filtering of records.
//!
//! Operator names accepted in conditions, with their aliases:
//!
//! - `strictly-exact` (`strictly-equal`, `===`), `not-strictly-exact` (`not-strictly-equal`, `!==`)
//! - `exact` (`equal`, `==`), `not-exact` (`not-equal`, `!=`)
//! - `in`, `not-in`
//! - `gt` (`greater-than`, `>`), `gte` (`greater-than-equal`, `>=`)
//! - `lt` (`lower-than`, `<`), `lte` (`lower-than-equal`, `<=`)
//! - `between` (`> <`), `between-equals` (`>=<`), with a `"lo..hi"` value
//! - `before`, `after`, `strictly-before`, `strictly-after`
//! - `partial`, `not-partial`, `start`, `not-start`, `end`, `not-end`

pub mod condition;
pub mod engine;
pub mod operator;
pub mod predicate;
pub mod timestamp;

pub use condition::{Clause, Condition, WhereClause};
pub use engine::{Filter, FilterMode};
pub use operator::Operator;
pub use predicate::{evaluate, evaluate_with, loose_cmp, loose_eq};
pub use timestamp::{DefaultTimestampParser, TimestampParser};
