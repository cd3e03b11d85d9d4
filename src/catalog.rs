//! Catalog files: bug pattern declarations in YAML or JSON
//!
//! ```yaml
//! version: "1"
//! patterns:
//!   - name: DeadStore
//!     summary: Value is never read
//!     severity: warning
//!     tags: [Style]
//!   - name: Leak
//!     summary: Resource is never closed
//!     severity: error
//!     suppressibility: custom_annotation
//!     custom_suppression_annotations: [com.acme.AllowLeak]
//! ```

use crate::pattern::{MalformedDescriptor, PatternDeclaration};
use crate::registry::{BuildOutcome, RegistryBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unknown catalog format: {}", .0.display())]
    UnknownFormat(PathBuf),

    #[error("invalid glob pattern '{pattern}': {message}")]
    Glob { pattern: String, message: String },
}

/// A catalog entry: a declaration, or why it could not be read
pub type Entry = Result<PatternDeclaration, MalformedDescriptor>;

/// Document shape shared by both formats; entries stay untyped so one bad
/// entry does not fail the file
#[derive(Deserialize)]
struct RawCatalog<V> {
    #[serde(default)]
    version: Option<String>,
    #[serde(default = "Vec::new")]
    patterns: Vec<V>,
}

/// One catalog file
#[derive(Debug, Clone, Default)]
pub struct CatalogFile {
    /// File format version
    pub version: Option<String>,

    /// Entries, in file order
    pub patterns: Vec<Entry>,
}

impl CatalogFile {
    /// Parse catalog text; `format` is a file extension (`yaml`, `yml`, `json`)
    pub fn parse(content: &str, format: &str, path: &Path) -> Result<Self, CatalogError> {
        let parse_error = |message: String| CatalogError::Parse {
            path: path.to_path_buf(),
            message,
        };

        match format {
            "yaml" | "yml" => {
                let raw: RawCatalog<serde_yaml::Value> =
                    serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
                let patterns: Vec<Entry> = raw
                    .patterns
                    .into_iter()
                    .map(|value| {
                        let name = value.get("name").and_then(|n| n.as_str()).map(String::from);
                        serde_yaml::from_value(value).map_err(|e| schema_error(name, e.to_string()))
                    })
                    .collect();
                Ok(Self {
                    version: raw.version,
                    patterns,
                })
            }
            "json" => {
                let raw: RawCatalog<serde_json::Value> =
                    serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;
                let patterns: Vec<Entry> = raw
                    .patterns
                    .into_iter()
                    .map(|value| {
                        let name = value.get("name").and_then(|n| n.as_str()).map(String::from);
                        serde_json::from_value(value).map_err(|e| schema_error(name, e.to_string()))
                    })
                    .collect();
                Ok(Self {
                    version: raw.version,
                    patterns,
                })
            }
            _ => Err(CatalogError::UnknownFormat(path.to_path_buf())),
        }
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !matches!(format.as_str(), "yaml" | "yml" | "json") {
            return Err(CatalogError::UnknownFormat(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(&content, &format, path)?;
        log::debug!(
            "loaded {} declarations from {}",
            catalog.patterns.len(),
            path.display()
        );
        Ok(catalog)
    }
}

fn schema_error(name: Option<String>, message: String) -> MalformedDescriptor {
    MalformedDescriptor::Schema { name, message }
}

/// Catalog files under `dir` matching any of the `include` globs, sorted
pub fn discover(dir: &Path, include: &[String]) -> Result<Vec<PathBuf>, CatalogError> {
    let mut files = Vec::new();
    for pattern in include {
        let full = format!(
            "{}/{}",
            glob::Pattern::escape(&dir.to_string_lossy()),
            pattern
        );
        let entries = glob::glob(&full).map_err(|e| CatalogError::Glob {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        files.extend(entries.filter_map(Result::ok).filter(|p| p.is_file()));
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Load entries from files and directories, in path order
pub fn load_paths(paths: &[PathBuf], include: &[String]) -> Result<Vec<Entry>, CatalogError> {
    let mut entries = Vec::new();
    for path in paths {
        let files = if path.is_dir() {
            discover(path, include)?
        } else {
            vec![path.clone()]
        };
        for file in files {
            entries.extend(CatalogFile::load(&file)?.patterns);
        }
    }
    Ok(entries)
}

/// Build a registry from entries, keeping the valid ones
pub fn build_registry(entries: impl IntoIterator<Item = Entry>) -> BuildOutcome {
    let mut builder = RegistryBuilder::new();
    for entry in entries {
        builder.declare_entry(entry);
    }
    builder.build()
}
