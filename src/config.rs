//! Configuration for the bug pattern tooling
//!
//! Reads configuration from:
//! - `.bugpatternrc.yaml` / `.bugpatternrc.json` (project-level)
//! - `~/.bugpatternrc.yaml` (user-level)

use crate::link::SiteBase;
use crate::suppression::SuppressionPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Documentation generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Root of the documentation site
    pub site_base: SiteBase,

    /// Where generated pages are written
    pub output_dir: PathBuf,

    /// Root of the test fixtures examples are mined from
    pub examples_dir: Option<PathBuf>,

    /// Emit YAML front matter on each page
    pub front_matter: bool,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            site_base: SiteBase::default(),
            output_dir: PathBuf::from("docs/bugpatterns"),
            examples_dir: None,
            front_matter: true,
        }
    }
}

/// Suppression settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuppressionConfig {
    /// Report ERROR diagnostics even where a suppression applies
    pub exempt_errors: bool,

    /// Patterns switched off for the whole run (names or alternate names)
    pub disabled: Vec<String>,
}

impl SuppressionConfig {
    pub fn policy(&self) -> SuppressionPolicy {
        SuppressionPolicy {
            exempt_errors: self.exempt_errors,
        }
    }
}

/// Catalog discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Globs matched inside catalog directories
    pub include: Vec<String>,

    /// Fail the run when any declaration is rejected
    pub strict: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            include: vec![
                "**/*.yaml".to_string(),
                "**/*.yml".to_string(),
                "**/*.json".to_string(),
            ],
            strict: false,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub docs: DocsConfig,
    pub suppression: SuppressionConfig,
    pub catalog: CatalogConfig,
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };
        log::debug!("loaded configuration from {}", path.display());

        Ok(config)
    }

    /// First configuration file found in the current, then the home directory
    pub fn find_default() -> Option<PathBuf> {
        let config_names = [
            ".bugpatternrc.yaml",
            ".bugpatternrc.yml",
            ".bugpatternrc.json",
        ];

        // Check current directory
        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Some(path);
            }
        }

        // Check home directory
        let home = dirs::home_dir()?;
        config_names
            .iter()
            .map(|name| home.join(name))
            .find(|path| path.exists())
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::find_default() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load `path` if given, falling back to defaults with a warning when it
    /// cannot be read
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        Self::load(path).unwrap_or_else(|e| {
            log::warn!(
                "ignoring configuration {}: {}; using defaults",
                path.display(),
                e
            );
            Self::default()
        })
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(
        &mut self,
        site_base: Option<String>,
        examples_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        disabled: Option<Vec<String>>,
        strict: bool,
    ) {
        if let Some(site) = site_base {
            self.docs.site_base = SiteBase::new(&site);
        }
        if let Some(dir) = examples_dir {
            self.docs.examples_dir = Some(dir);
        }
        if let Some(dir) = output_dir {
            self.docs.output_dir = dir;
        }
        if let Some(disabled) = disabled {
            self.suppression.disabled.extend(disabled);
        }
        if strict {
            self.catalog.strict = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::new();
        assert_eq!(config.docs.site_base.as_str(), "https://errorprone.info");
        assert!(config.docs.front_matter);
        assert!(!config.suppression.exempt_errors);
        assert!(!config.catalog.strict);
        assert_eq!(config.catalog.include.len(), 3);
    }

    #[test]
    fn test_yaml_deserialize() {
        let yaml = r#"
docs:
  site_base: https://checks.example.com/
  examples_dir: testdata
suppression:
  exempt_errors: true
  disabled:
    - DeadStore
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.docs.site_base.as_str(), "https://checks.example.com");
        assert_eq!(config.docs.examples_dir, Some(PathBuf::from("testdata")));
        assert_eq!(config.docs.output_dir, PathBuf::from("docs/bugpatterns"));
        assert!(config.suppression.policy().exempt_errors);
        assert_eq!(config.suppression.disabled, vec!["DeadStore"]);
    }

    #[test]
    fn test_merge_cli() {
        let mut config = Config::new();
        config.merge_cli(
            Some("https://local.test".to_string()),
            Some(PathBuf::from("fixtures")),
            None,
            Some(vec!["A".to_string()]),
            true,
        );

        assert_eq!(config.docs.site_base.as_str(), "https://local.test");
        assert_eq!(config.docs.examples_dir, Some(PathBuf::from("fixtures")));
        assert_eq!(config.suppression.disabled, vec!["A"]);
        assert!(config.catalog.strict);
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "docs = {}").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".bugpatternrc.yaml");
        std::fs::write(&path, "docs:\n  front_matter: [not, a, bool]\n").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Yaml(_))));
        let config = Config::load_or_default(Some(&path));
        assert!(config.docs.front_matter);
        assert_eq!(config.docs.output_dir, PathBuf::from("docs/bugpatterns"));

        std::fs::write(&path, "docs:\n  front_matter: false\n").unwrap();
        assert!(!Config::load_or_default(Some(&path)).docs.front_matter);
        assert!(Config::load_or_default(None).docs.front_matter);
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".bugpatternrc.json");
        std::fs::write(&path, r#"{"docs": {"front_matter": false}}"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert!(!config.docs.front_matter);
    }
}
