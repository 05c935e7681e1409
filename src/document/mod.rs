//! Document model and helpers.
//!
//! - `node`: the `Document` value type
//! - `codec`: JSON and YAML conversion
//! - `merge`: deep merge
//! - `tree`: an owned document with path access methods

pub mod codec;
pub mod merge;
pub mod node;
pub mod tree;

pub use merge::{merge, merge_all};
pub use node::{Document, Map, Number};
pub use tree::DocumentTree;
