//! Document loading.
//!
//! Files are read as raw bytes, transparently gunzipped (by `.gz` extension
//! or by the gzip magic bytes), and parsed according to the extension that
//! remains: `.yaml`/`.yml` as YAML, `.jsonl`/`.ndjson` as JSON Lines into a
//! sequence, anything else as JSON.

use crate::document::codec::{parse_json, parse_json_lines, parse_yaml};
use crate::document::node::Document;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// On-disk document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    JsonLines,
    Yaml,
}

impl DocumentFormat {
    /// Determines the format from a file name, ignoring a trailing `.gz`.
    ///
    /// - `data.jsonl` → JsonLines
    /// - `data.yml.gz` → Yaml
    /// - `data.json.gz` → Json
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let base = path_str.strip_suffix(".gz").unwrap_or(&path_str);

        if base.ends_with(".jsonl") || base.ends_with(".ndjson") {
            DocumentFormat::JsonLines
        } else if base.ends_with(".yaml") || base.ends_with(".yml") {
            DocumentFormat::Yaml
        } else {
            DocumentFormat::Json
        }
    }
}

/// Reads a file's raw bytes. Returns `None` when the file does not exist.
pub fn read_raw<P: AsRef<Path>>(path: P) -> Result<Option<Vec<u8>>> {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => {
            debug!(path = %path.display(), bytes = bytes.len(), "read file");
            Ok(Some(bytes))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Loads and parses a document file.
///
/// # Examples
///
/// ```no_run
/// use nestpath::file::loader::load_document;
///
/// let doc = load_document("users.json.gz").unwrap();
/// ```
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable, is corrupted
/// gzip, is not UTF-8, or does not parse in its format.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let bytes = read_raw(path)?
        .with_context(|| format!("File not found: {}", path.display()))?;

    let is_gzipped = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false)
        || bytes.starts_with(&GZIP_MAGIC);

    let content = decode_content(bytes, is_gzipped)?;
    parse_content(&content, DocumentFormat::from_path(path))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Loads a document from standard input.
///
/// Gzip input is detected by its magic bytes. Regular JSON is tried first,
/// then JSON Lines, then YAML.
pub fn load_document_from_stdin() -> Result<Document> {
    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    let is_gzipped = buffer.starts_with(&GZIP_MAGIC);
    let content = decode_content(buffer, is_gzipped)?;

    if let Ok(doc) = parse_json(&content) {
        return Ok(doc);
    }
    if let Ok(doc) = parse_json_lines(&content) {
        return Ok(doc);
    }
    parse_yaml(&content).context("Failed to parse stdin: input is neither JSON, JSON Lines nor YAML")
}

/// Parses text in the given format.
pub fn parse_content(content: &str, format: DocumentFormat) -> Result<Document> {
    let doc = match format {
        DocumentFormat::Json => parse_json(content)?,
        DocumentFormat::JsonLines => parse_json_lines(content)?,
        DocumentFormat::Yaml => parse_yaml(content)?,
    };
    Ok(doc)
}

fn decode_content(bytes: Vec<u8>, is_gzipped: bool) -> Result<String> {
    if is_gzipped {
        decompress_gzip_bytes(&bytes)
    } else {
        String::from_utf8(bytes).context("File is not valid UTF-8")
    }
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzip data - it may be corrupted")?;
    Ok(content)
}
