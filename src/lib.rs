//! nestpath - dotted-path access, deep merge and where-clause filtering over
//! JSON and YAML documents.
//!
//! # Example
//!
//! ```
//! use nestpath::document::codec::parse_json;
//! use nestpath::document::node::Document;
//! use nestpath::path::accessor::{get, set};
//!
//! let mut doc = parse_json(r#"{"users": {"alice": {"age": 30}}, "current": "alice"}"#).unwrap();
//! set(&mut doc, "users[$current].age", Document::from(31)).unwrap();
//! assert_eq!(get(&doc, "users.alice.age"), Some(&Document::from(31)));
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod file;
pub mod filter;
pub mod path;

pub use document::{Document, DocumentTree, Map, Number};
pub use error::{Error, Result};
