//! File I/O for documents.
//!
//! This module loads documents from disk or stdin (gzip aware) and writes
//! them back atomically with optional compression and backups.

pub mod loader;
pub mod saver;

pub use loader::{load_document, load_document_from_stdin, read_raw, DocumentFormat};
pub use saver::{save_document, write_raw, WriteOptions, WriteReport};
