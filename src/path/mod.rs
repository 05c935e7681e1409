//! Dotted path access into documents.
//!
//! # Supported Syntax
//!
//! - `a.b.c` - nested keys, split on the configured delimiters
//! - `a[b][0]` - bracket groups, equivalent to `a.b.0`
//! - `a[$x.y]` - indirect key: the value at `x.y` in the root document
//! - `a[]` - append at the next free index (writes only)
//!
//! Keys that literally contain the delimiter are matched before nested
//! traversal, longest first.

pub mod accessor;
pub mod ast;
pub mod parser;

pub use accessor::{delete, extract, get, has, set, SetReturn};
pub use ast::{PathExpression, Segment, Step};
pub use parser::{Parser, PathSyntax};
