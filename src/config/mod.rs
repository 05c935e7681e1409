//! Configuration for nestpath.
//!
//! Settings are read from `~/.config/nestpath/config.toml`. Every field has a
//! default, so a partial file (or no file at all) is fine.
//!
//! # Example
//!
//! ```
//! use nestpath::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.delimiters, vec![".".to_string()]);
//! assert_eq!(config.indent_size, 2);
//!
//! let custom = Config {
//!     indent_size: 4,
//!     compress: true,
//!     ..Config::default()
//! };
//! assert_eq!(custom.path_syntax().joiner(), ".");
//! ```

use crate::path::parser::PathSyntax;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for path parsing, filtering, output and logging.
///
/// # Fields
///
/// * `delimiters` - Path segment separators (default: `["."]`)
/// * `indirect_marker` - Marks `[$name]` groups as indirect (default: `'$'`)
/// * `default_strict` - Strictness of conditions that omit `strict` (default: true)
/// * `indent_size` - Spaces per indentation level in pretty output (default: 2)
/// * `compress` - Gzip written files (default: false)
/// * `compression_level` - Gzip level, 0 to 9 (default: 9)
/// * `create_backup` - Create .bak files before overwriting (default: false)
/// * `log_level` - Log filter used when `RUST_LOG` is unset (default: "warn")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path segment separators
    #[serde(default = "default_delimiters")]
    pub delimiters: Vec<String>,

    /// Marker character for indirect bracket groups
    #[serde(default = "default_indirect_marker")]
    pub indirect_marker: char,

    /// Strictness of conditions that omit `strict`
    #[serde(default = "default_strict")]
    pub default_strict: bool,

    /// Number of spaces per indentation level
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Gzip written files
    #[serde(default)]
    pub compress: bool,

    /// Gzip compression level
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,

    /// Create .bak files before saving
    #[serde(default)]
    pub create_backup: bool,

    /// Log filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_delimiters() -> Vec<String> {
    vec![".".to_string()]
}

fn default_indirect_marker() -> char {
    '$'
}

fn default_strict() -> bool {
    true
}

/// Returns the default indentation size.
fn default_indent_size() -> usize {
    2
}

fn default_compression_level() -> u32 {
    9
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiters: default_delimiters(),
            indirect_marker: default_indirect_marker(),
            default_strict: default_strict(),
            indent_size: default_indent_size(),
            compress: false,
            compression_level: default_compression_level(),
            create_backup: false,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/nestpath/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("nestpath");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Loads configuration from a specific file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(config_path)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Builds the path syntax described by `delimiters` and `indirect_marker`.
    pub fn path_syntax(&self) -> PathSyntax {
        PathSyntax::new(self.delimiters.clone(), self.indirect_marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_by_default() {
        assert!(Config::default().default_strict);
    }

    #[test]
    fn test_path_syntax_from_config() {
        let config = Config {
            delimiters: vec!["/".to_string(), ".".to_string()],
            indirect_marker: '@',
            ..Default::default()
        };
        let syntax = config.path_syntax();
        assert_eq!(syntax.joiner(), "/");
        assert_eq!(syntax.indirect_marker, '@');
    }
}
