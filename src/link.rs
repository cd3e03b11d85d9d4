//! Diagnostic link resolution

use crate::pattern::{BugPattern, LinkType};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Documentation site used when none is configured
pub const DEFAULT_SITE_BASE: &str = "https://errorprone.info";

/// Characters allowed in a `/bugpattern/<name>` path segment
static URL_SAFE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("valid name regex"));

/// The autogenerated link for a pattern cannot be derived
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot derive a documentation link for '{name}': name is not a valid URL path segment")]
pub struct MissingLink {
    pub name: String,
}

/// Root URL of the documentation site, without a trailing slash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SiteBase(String);

impl SiteBase {
    pub fn new(url: &str) -> Self {
        Self(url.trim().trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<site-base>/bugpattern/<name>`
    pub fn pattern_url(&self, name: &str) -> Result<String, MissingLink> {
        if !URL_SAFE_NAME.is_match(name) || name == "." || name == ".." {
            return Err(MissingLink {
                name: name.to_string(),
            });
        }
        Ok(format!("{}/bugpattern/{}", self.0, name))
    }
}

impl Default for SiteBase {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_BASE)
    }
}

impl From<String> for SiteBase {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<SiteBase> for String {
    fn from(s: SiteBase) -> Self {
        s.0
    }
}

impl fmt::Display for SiteBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The link to show alongside the pattern's diagnostics, if any
pub fn resolve_link(pattern: &BugPattern, site: &SiteBase) -> Result<Option<String>, MissingLink> {
    match pattern.link_type() {
        LinkType::Autogenerated => site.pattern_url(pattern.name()).map(Some),
        LinkType::Custom => {
            let link = pattern.link().trim();
            Ok((!link.is_empty()).then(|| link.to_string()))
        }
        LinkType::None => Ok(None),
    }
}
