//! Document saving.
//!
//! All writes go through `write_raw`, which writes to a temporary file and
//! renames it over the target, so the target is never left half written.
//! Output can be gzip-compressed and the previous file kept as `.bak`.

use super::loader::DocumentFormat;
use crate::config::Config;
use crate::document::codec::{to_json_compact, to_json_pretty};
use crate::document::node::Document;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How a document is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Single-line JSON instead of indented output.
    pub compact: bool,
    /// Gzip the output. `.gz` is appended to the file name when missing.
    pub compress: bool,
    /// Gzip level, 0 to 9.
    pub level: u32,
    /// Copy an existing target to `<name>.bak` before overwriting it.
    pub backup: bool,
    /// Spaces per indentation level for pretty output.
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compact: false,
            compress: false,
            level: 9,
            backup: false,
            indent: 2,
        }
    }
}

impl WriteOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            compact: false,
            compress: config.compress,
            level: config.compression_level.min(9),
            backup: config.create_backup,
            indent: config.indent_size,
        }
    }
}

/// Outcome of a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    /// The file actually written (with `.gz` appended when compressing).
    pub path: PathBuf,
    /// Size of the content before compression.
    pub original: usize,
    /// Size of what landed on disk.
    pub written: usize,
}

/// Writes bytes to `path` atomically, honoring compression and backup.
///
/// A target whose name already ends in `.gz` is always compressed.
///
/// # Errors
///
/// Returns an error if the backup copy, the temp file write, the
/// compression or the final rename fails.
pub fn write_raw<P: AsRef<Path>>(path: P, data: &[u8], options: &WriteOptions) -> Result<WriteReport> {
    let mut path = path.as_ref().to_path_buf();
    let already_gz = path.to_string_lossy().ends_with(".gz");
    let compress = options.compress || already_gz;
    if compress && !already_gz {
        let mut name = path.as_os_str().to_os_string();
        name.push(".gz");
        path = PathBuf::from(name);
    }

    if options.backup && path.exists() {
        create_backup(&path)?;
    }

    let written = write_file_atomic(&path, data, compress.then_some(options.level))?;
    debug!(path = %path.display(), original = data.len(), written, "wrote file");

    Ok(WriteReport {
        path,
        original: data.len(),
        written,
    })
}

/// Serializes a document in the format implied by `path` and writes it.
///
/// JSON Lines targets get one compact line per sequence element, YAML
/// targets get YAML, and everything else gets JSON (indented unless
/// `options.compact` is set).
///
/// # Examples
///
/// ```no_run
/// use nestpath::document::node::Document;
/// use nestpath::file::saver::{save_document, WriteOptions};
///
/// let report = save_document("out.json", &Document::map(), &WriteOptions::default()).unwrap();
/// assert_eq!(report.original, 3);
/// ```
pub fn save_document<P: AsRef<Path>>(path: P, doc: &Document, options: &WriteOptions) -> Result<WriteReport> {
    let path = path.as_ref();
    let content = match (DocumentFormat::from_path(path), doc) {
        (DocumentFormat::JsonLines, Document::Sequence(lines)) => {
            let mut output = String::new();
            for line in lines {
                output.push_str(&to_json_compact(line));
                output.push('\n');
            }
            output
        }
        (DocumentFormat::Yaml, _) => serde_yaml::to_string(doc).context("Failed to serialize YAML")?,
        _ if options.compact => to_json_compact(doc),
        _ => {
            let mut json = to_json_pretty(doc, options.indent);
            json.push('\n');
            json
        }
    };

    write_raw(path, content.as_bytes(), options)
}

/// Creates a backup of a file by copying it with a .bak extension.
fn create_backup<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let mut backup_path = path.to_path_buf();
    let original_name = backup_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    backup_path.set_file_name(format!("{}.bak", original_name));
    fs::copy(path, &backup_path).context("Failed to create backup")?;
    debug!(backup = %backup_path.display(), "created backup");
    Ok(())
}

/// Writes data to `<name>.tmp` next to `path`, then renames it into place.
/// The temp file is removed when either step fails.
///
/// Returns the number of bytes on disk.
fn write_file_atomic(path: &Path, data: &[u8], compression: Option<u32>) -> Result<usize> {
    let temp_path = temp_path_for(path)?;

    let result = write_and_rename(path, &temp_path, data, compression);
    if result.is_err() && temp_path.exists() {
        if let Err(err) = fs::remove_file(&temp_path) {
            debug!(path = %temp_path.display(), error = %err, "could not remove temp file");
        }
    }
    result
}

fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", path.display()))?;
    let mut temp_name = name.to_os_string();
    temp_name.push(".tmp");
    Ok(path.with_file_name(temp_name))
}

fn write_and_rename(path: &Path, temp_path: &Path, data: &[u8], compression: Option<u32>) -> Result<usize> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let written = match compression {
        Some(level) => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
            encoder
                .write_all(data)
                .context("Failed to write compressed data")?;
            let compressed = encoder.finish().context("Failed to finish compression")?;
            fs::write(temp_path, &compressed).context("Failed to write temp file")?;
            compressed.len()
        }
        None => {
            fs::write(temp_path, data).context("Failed to write temp file")?;
            data.len()
        }
    };

    fs::rename(temp_path, path).context("Failed to rename temp file")?;

    Ok(written)
}
