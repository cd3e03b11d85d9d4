//! Suppression resolution
//!
//! A [`SuppressionContext`] is what a scope walker sees at one diagnostic site:
//! every `SuppressWarnings` value and every annotation type on the site and its
//! enclosing scopes. Resolution is a pure function of the descriptor and the
//! context.

use crate::pattern::{AnnotationType, BugPattern, Suppressibility};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Suppressions declared directly on one scope (class, method, variable, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Values of `SuppressWarnings` on this scope
    pub suppress_warnings: Vec<String>,
    /// Annotation types present on this scope
    pub annotations: Vec<AnnotationType>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suppress(mut self, value: &str) -> Self {
        self.suppress_warnings.push(value.to_string());
        self
    }

    pub fn annotated(mut self, annotation: &str) -> Self {
        self.annotations.push(AnnotationType::new(annotation));
        self
    }
}

/// Suppressions visible at a diagnostic site, inherited ones included
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionContext {
    values: HashSet<String>,
    annotations: HashSet<AnnotationType>,
}

impl SuppressionContext {
    /// Context with nothing suppressed
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a chain of scopes, outermost first
    pub fn from_scopes<'a>(scopes: impl IntoIterator<Item = &'a Scope>) -> Self {
        scopes
            .into_iter()
            .fold(Self::new(), |ctx, scope| ctx.enter(scope))
    }

    /// Context for a scope nested inside this one
    pub fn enter(&self, scope: &Scope) -> Self {
        let mut inner = self.clone();
        inner
            .values
            .extend(scope.suppress_warnings.iter().cloned());
        inner.annotations.extend(scope.annotations.iter().cloned());
        inner
    }

    pub fn with_suppression(mut self, value: &str) -> Self {
        self.values.insert(value.to_string());
        self
    }

    pub fn with_annotation(mut self, annotation: &str) -> Self {
        self.annotations.insert(AnnotationType::new(annotation));
        self
    }

    pub fn suppresses_value(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn has_annotation(&self, annotation: &AnnotationType) -> bool {
        self.annotations.contains(annotation)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.annotations.is_empty()
    }
}

/// What silenced a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressedBy {
    /// A `SuppressWarnings` value equal to the name or an alternate name
    Name(String),
    /// One of the check's custom suppression annotations
    Annotation(AnnotationType),
}

/// The suppression that applies to `pattern` in `context`, if any.
///
/// Names match exactly and case-sensitively; annotations match by type identity.
/// Severity plays no part here.
pub fn suppressed_by(pattern: &BugPattern, context: &SuppressionContext) -> Option<SuppressedBy> {
    match pattern.suppressibility() {
        Suppressibility::Unsuppressible => None,
        Suppressibility::SuppressWarnings => pattern
            .names()
            .find(|name| context.suppresses_value(name))
            .map(|name| SuppressedBy::Name(name.to_string())),
        Suppressibility::CustomAnnotation => pattern
            .custom_suppression_annotations()
            .iter()
            .find(|annotation| context.has_annotation(annotation))
            .map(|annotation| SuppressedBy::Annotation(annotation.clone())),
    }
}

pub fn is_suppressed(pattern: &BugPattern, context: &SuppressionContext) -> bool {
    suppressed_by(pattern, context).is_some()
}

/// Caller-level policy layered over the resolver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuppressionPolicy {
    /// Report ERROR-severity diagnostics even where a suppression applies
    pub exempt_errors: bool,
}

/// Outcome of applying a [`SuppressionPolicy`] at one site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Report,
    Suppressed(SuppressedBy),
    /// A suppression applies but the policy keeps ERROR diagnostics
    Exempt(SuppressedBy),
}

impl Decision {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Decision::Suppressed(_))
    }
}

impl SuppressionPolicy {
    pub fn decide(&self, pattern: &BugPattern, context: &SuppressionContext) -> Decision {
        match suppressed_by(pattern, context) {
            None => Decision::Report,
            Some(by) if self.exempt_errors && pattern.severity().is_error() => Decision::Exempt(by),
            Some(by) => Decision::Suppressed(by),
        }
    }

    pub fn is_suppressed(&self, pattern: &BugPattern, context: &SuppressionContext) -> bool {
        self.decide(pattern, context).is_suppressed()
    }
}
