//! Descriptor consistency checks
//!
//! Every rule is evaluated independently so an operator sees all problems with
//! a descriptor at once. Violations reject the descriptor; advisories only
//! point at configuration that has no effect.

use crate::pattern::{BugPattern, LinkType, Suppressibility};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

/// Block-level markdown at the start of a summary
static BLOCK_MARKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(#{1,6}\s|[-*+]\s|>|```|~~~|\d+[.)]\s|\|)").expect("valid markup regex")
});

/// A rule a descriptor breaks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("name is empty")]
    EmptyName,

    #[error("alternate name '{0}' repeats the primary name")]
    AltNameIsName(String),

    #[error("an alternate name is empty")]
    EmptyAltName,

    #[error("link type is CUSTOM but no link is given")]
    MissingCustomLink,

    #[error("suppressibility is CUSTOM_ANNOTATION but no custom suppression annotations are listed")]
    MissingCustomAnnotations,

    #[error("summary is empty")]
    EmptySummary,

    #[error("summary ends with a period")]
    SummaryEndsWithPeriod,

    #[error("summary spans more than one line")]
    MultiLineSummary,

    #[error("summary contains block markup")]
    SummaryMarkup,

    #[error("'{key}' is already registered by '{owner}'")]
    NameCollision { key: String, owner: String },
}

/// Configuration that is accepted but has no effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Custom annotations listed on a check that is not suppressed by them
    UnusedAnnotations(Suppressibility),
    /// A link given while the link type ignores it
    UnusedLink(LinkType),
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::UnusedAnnotations(s) => write!(
                f,
                "custom suppression annotations are ignored with suppressibility {}",
                s
            ),
            Advisory::UnusedLink(t) => write!(f, "link is ignored with link type {}", t),
        }
    }
}

/// One or more violations found on a single descriptor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bug pattern '{name}' is invalid: {}", join(.violations))]
pub struct ValidationError {
    pub name: String,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(name: &str, violations: Vec<Violation>) -> Self {
        Self {
            name: name.to_string(),
            violations,
        }
    }

    pub fn has(&self, violation: &Violation) -> bool {
        self.violations.contains(violation)
    }
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Every rule the descriptor breaks, in rule order
pub fn violations(pattern: &BugPattern) -> Vec<Violation> {
    let mut found = Vec::new();

    if pattern.name().is_empty() {
        found.push(Violation::EmptyName);
    }
    for alt in pattern.alt_names() {
        if alt.is_empty() {
            found.push(Violation::EmptyAltName);
        } else if alt == pattern.name() {
            found.push(Violation::AltNameIsName(alt.clone()));
        }
    }

    if pattern.link_type() == LinkType::Custom && pattern.link().trim().is_empty() {
        found.push(Violation::MissingCustomLink);
    }

    if pattern.suppressibility() == Suppressibility::CustomAnnotation
        && pattern.custom_suppression_annotations().is_empty()
    {
        found.push(Violation::MissingCustomAnnotations);
    }

    let summary = pattern.summary();
    if summary.trim().is_empty() {
        found.push(Violation::EmptySummary);
    } else {
        if summary.trim_end().ends_with('.') {
            found.push(Violation::SummaryEndsWithPeriod);
        }
        if summary.trim().contains('\n') {
            found.push(Violation::MultiLineSummary);
        }
        if summary.lines().any(|line| BLOCK_MARKUP.is_match(line)) {
            found.push(Violation::SummaryMarkup);
        }
    }

    found
}

/// Check a descriptor, collecting every violation
pub fn validate(pattern: &BugPattern) -> Result<(), ValidationError> {
    let found = violations(pattern);
    if found.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(pattern.name(), found))
    }
}

/// Non-fatal findings about unused configuration
pub fn inspect(pattern: &BugPattern) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    match pattern.suppressibility() {
        Suppressibility::CustomAnnotation => {}
        s @ (Suppressibility::SuppressWarnings | Suppressibility::Unsuppressible) => {
            if !pattern.custom_suppression_annotations().is_empty() {
                advisories.push(Advisory::UnusedAnnotations(s));
            }
        }
    }

    match pattern.link_type() {
        LinkType::Custom => {}
        t @ (LinkType::Autogenerated | LinkType::None) => {
            if !pattern.link().is_empty() {
                advisories.push(Advisory::UnusedLink(t));
            }
        }
    }

    advisories
}
