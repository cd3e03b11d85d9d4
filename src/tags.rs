//! Tag vocabulary and cross-catalog aggregation

use crate::pattern::{BugPattern, Suppressibility};
use crate::severity::Severity;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Very likely a real error, even though the check is not an ERROR.
///
/// Every ERROR-severity pattern carries this tag implicitly.
pub const LIKELY_ERROR: &str = "LikelyError";

/// Valid code that is discouraged for consistency or readability
pub const STYLE: &str = "Style";

/// An easily identified replacement is always faster
pub const PERFORMANCE: &str = "Performance";

/// Works within a limited domain but breaks common assumptions
pub const FRAGILE_CODE: &str = "FragileCode";

/// Problems that only appear under concurrent access
pub const CONCURRENCY: &str = "Concurrency";

/// A simpler or faster equivalent exists
pub const SIMPLIFICATION: &str = "Simplification";

/// The shared tag vocabulary
pub const STANDARD_TAGS: [&str; 6] = [
    LIKELY_ERROR,
    STYLE,
    PERFORMANCE,
    FRAGILE_CODE,
    CONCURRENCY,
    SIMPLIFICATION,
];

pub fn is_standard(tag: &str) -> bool {
    STANDARD_TAGS.contains(&tag)
}

/// Declared tags plus [`LIKELY_ERROR`] for ERROR-severity patterns
pub fn effective_tags(pattern: &BugPattern) -> BTreeSet<String> {
    let mut tags = pattern.tags().clone();
    if pattern.severity() == Severity::Error {
        tags.insert(LIKELY_ERROR.to_string());
    }
    tags
}

pub fn has_effective_tag(pattern: &BugPattern, tag: &str) -> bool {
    pattern.has_tag(tag) || (tag == LIKELY_ERROR && pattern.severity() == Severity::Error)
}

/// Patterns grouped by effective tag
#[derive(Debug, Default)]
pub struct TagIndex<'a> {
    by_tag: BTreeMap<String, Vec<&'a BugPattern>>,
}

impl<'a> TagIndex<'a> {
    pub fn build(patterns: impl IntoIterator<Item = &'a BugPattern>) -> Self {
        let mut by_tag: BTreeMap<String, Vec<&'a BugPattern>> = BTreeMap::new();
        for pattern in patterns {
            for tag in effective_tags(pattern) {
                by_tag.entry(tag).or_default().push(pattern);
            }
        }
        Self { by_tag }
    }

    /// Patterns carrying `tag`, in input order
    pub fn with_tag(&self, tag: &str) -> &[&'a BugPattern] {
        self.by_tag.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn likely_errors(&self) -> &[&'a BugPattern] {
        self.with_tag(LIKELY_ERROR)
    }

    /// Every tag in use, sorted
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.by_tag.keys().map(String::as_str)
    }

    /// Tags in use that are outside the standard vocabulary
    pub fn custom_tags(&self) -> impl Iterator<Item = &str> {
        self.tags().filter(|t| !is_standard(t))
    }
}

/// Catalog-wide counts
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_tag: BTreeMap<String, usize>,
    pub by_suppressibility: BTreeMap<String, usize>,
}

impl CatalogStats {
    pub fn collect<'a>(patterns: impl IntoIterator<Item = &'a BugPattern>) -> Self {
        let mut stats = Self::default();
        for pattern in patterns {
            stats.total += 1;
            *stats.by_severity.entry(pattern.severity()).or_default() += 1;
            for tag in effective_tags(pattern) {
                *stats.by_tag.entry(tag).or_default() += 1;
            }
            *stats
                .by_suppressibility
                .entry(pattern.suppressibility().to_string())
                .or_default() += 1;
        }
        stats
    }

    pub fn unsuppressible(&self) -> usize {
        self.by_suppressibility
            .get(&Suppressibility::Unsuppressible.to_string())
            .copied()
            .unwrap_or(0)
    }
}
