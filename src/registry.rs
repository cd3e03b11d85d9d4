//! Run-lifetime registry of active bug patterns
//!
//! The registry is built once at startup and is read-only afterwards, so it can
//! be shared between diagnostic workers (`&Registry` or `Arc<Registry>`) without
//! locking. Every name and alternate name maps to exactly one descriptor.

use crate::pattern::{BugPattern, MalformedDescriptor, PatternDeclaration};
use crate::validate::{inspect, violations, ValidationError, Violation};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Why a descriptor was kept out of the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Malformed(#[from] MalformedDescriptor),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl RegistryError {
    /// Name of the rejected descriptor
    pub fn name(&self) -> &str {
        match self {
            RegistryError::Malformed(e) => e.name().unwrap_or("<unnamed>"),
            RegistryError::Invalid(e) => &e.name,
        }
    }

    pub fn is_collision(&self) -> bool {
        match self {
            RegistryError::Invalid(e) => e
                .violations
                .iter()
                .any(|v| matches!(v, Violation::NameCollision { .. })),
            RegistryError::Malformed(_) => false,
        }
    }
}

/// Active bug patterns, keyed by name and alternate names
#[derive(Debug, Clone, Default)]
pub struct Registry {
    patterns: Vec<BugPattern>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Build a registry, failing on the first rejected descriptor
    pub fn new(patterns: impl IntoIterator<Item = BugPattern>) -> Result<Self, RegistryError> {
        let mut builder = RegistryBuilder::new();
        for pattern in patterns {
            builder.register(pattern)?;
        }
        Ok(builder.build().registry)
    }

    /// Build a registry from raw declarations, failing on the first rejection
    pub fn from_declarations(
        declarations: impl IntoIterator<Item = PatternDeclaration>,
    ) -> Result<Self, RegistryError> {
        let mut builder = RegistryBuilder::new();
        for decl in declarations {
            builder.register(decl.build()?)?;
        }
        Ok(builder.build().registry)
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Look up by name or alternate name (exact match)
    pub fn get(&self, key: &str) -> Option<&BugPattern> {
        self.index.get(key).map(|&slot| &self.patterns[slot])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Primary name for a name or alternate name
    pub fn canonical_name(&self, key: &str) -> Option<&str> {
        self.get(key).map(BugPattern::name)
    }

    /// Patterns in registration order
    pub fn patterns(&self) -> &[BugPattern] {
        &self.patterns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BugPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Patterns left enabled after an operator's disable list.
    ///
    /// Only checks suppressible with `SuppressWarnings` can be disabled; other
    /// requests and unknown names are logged and ignored.
    pub fn active(&self, disabled: &[String]) -> Vec<&BugPattern> {
        let mut off = HashSet::new();
        for key in disabled {
            match self.get(key) {
                None => log::warn!("cannot disable unknown bug pattern '{}'", key),
                Some(p) if !p.suppressibility().is_disableable() => log::warn!(
                    "bug pattern '{}' is {} and cannot be disabled",
                    p.name(),
                    p.suppressibility()
                ),
                Some(p) => {
                    off.insert(p.name());
                }
            }
        }

        self.patterns
            .iter()
            .filter(|p| !off.contains(p.name()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a BugPattern;
    type IntoIter = std::slice::Iter<'a, BugPattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

/// Registry plus every descriptor that was kept out of it
#[derive(Debug)]
pub struct BuildOutcome {
    pub registry: Registry,
    pub rejected: Vec<RegistryError>,
}

impl BuildOutcome {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// The registry if nothing was rejected, else the first rejection
    pub fn into_result(self) -> Result<Registry, RegistryError> {
        match self.rejected.into_iter().next() {
            Some(e) => Err(e),
            None => Ok(self.registry),
        }
    }
}

/// Incremental registry construction
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: Registry,
    rejected: Vec<RegistryError>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a descriptor, or return why it cannot be added.
    ///
    /// A rejected descriptor leaves the builder unchanged.
    pub fn register(&mut self, pattern: BugPattern) -> Result<(), RegistryError> {
        let mut found = violations(&pattern);
        found.extend(pattern.names().filter_map(|key| {
            self.registry.index.get(key).map(|&slot| Violation::NameCollision {
                key: key.to_string(),
                owner: self.registry.patterns[slot].name().to_string(),
            })
        }));
        if !found.is_empty() {
            return Err(ValidationError::new(pattern.name(), found).into());
        }

        for advisory in inspect(&pattern) {
            log::warn!("bug pattern '{}': {}", pattern.name(), advisory);
        }

        let slot = self.registry.patterns.len();
        for key in pattern.names() {
            self.registry.index.insert(key.to_string(), slot);
        }
        log::debug!("registered bug pattern '{}'", pattern.name());
        self.registry.patterns.push(pattern);
        Ok(())
    }

    /// Add a descriptor, recording a rejection instead of failing
    pub fn add(&mut self, pattern: BugPattern) -> &mut Self {
        if let Err(e) = self.register(pattern) {
            self.reject(e);
        }
        self
    }

    /// Construct and add a declaration, recording a rejection instead of failing
    pub fn declare(&mut self, declaration: PatternDeclaration) -> &mut Self {
        match declaration.build() {
            Ok(pattern) => self.add(pattern),
            Err(e) => {
                self.reject(e.into());
                self
            }
        }
    }

    /// Add a catalog entry that may already have failed to parse
    pub fn declare_entry(
        &mut self,
        entry: Result<PatternDeclaration, MalformedDescriptor>,
    ) -> &mut Self {
        match entry {
            Ok(declaration) => self.declare(declaration),
            Err(e) => {
                self.reject(e.into());
                self
            }
        }
    }

    fn reject(&mut self, error: RegistryError) {
        log::warn!("excluding bug pattern: {}", error);
        self.rejected.push(error);
    }

    pub fn build(self) -> BuildOutcome {
        log::debug!(
            "registry built with {} bug patterns ({} rejected)",
            self.registry.len(),
            self.rejected.len()
        );
        BuildOutcome {
            registry: self.registry,
            rejected: self.rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Suppressibility;
    use crate::severity::Severity;

    fn decl(name: &str) -> PatternDeclaration {
        PatternDeclaration::new(name, "summary", Severity::Warning)
    }

    #[test]
    fn test_lookup_by_name_and_alt_name() {
        let a = decl("A").with_alt_name("a1").with_alt_name("a2").build().unwrap();
        let b = decl("B").build().unwrap();
        let registry = Registry::new([a.clone(), b.clone()]).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("A"), Some(&a));
        assert_eq!(registry.get("a1"), Some(&a));
        assert_eq!(registry.get("a2"), Some(&a));
        assert_eq!(registry.get("B"), Some(&b));
        assert_eq!(registry.get("b"), None);
        assert_eq!(registry.canonical_name("a2"), Some("A"));
    }

    #[test]
    fn test_shared_alt_name_fails() {
        let a = decl("A").with_alt_name("shared").build().unwrap();
        let b = decl("B").with_alt_name("shared").build().unwrap();
        let err = Registry::new([a, b]).unwrap_err();

        assert!(err.is_collision());
        assert_eq!(err.name(), "B");
        match err {
            RegistryError::Invalid(e) => assert!(e.has(&Violation::NameCollision {
                key: "shared".to_string(),
                owner: "A".to_string(),
            })),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_alt_name_matching_other_name_fails() {
        let a = decl("A").build().unwrap();
        let b = decl("B").with_alt_name("A").build().unwrap();
        assert!(Registry::new([a, b]).unwrap_err().is_collision());

        let dup = Registry::new([decl("A").build().unwrap(), decl("A").build().unwrap()]);
        assert!(dup.unwrap_err().is_collision());
    }

    #[test]
    fn test_lenient_build_excludes_bad_patterns() {
        let mut builder = Registry::builder();
        builder
            .declare(decl("Good"))
            .declare(decl("Bad").with_custom_link(""))
            .declare(PatternDeclaration {
                name: Some("NoSeverity".to_string()),
                summary: Some("x".to_string()),
                ..PatternDeclaration::default()
            })
            .declare(decl("Other").with_alt_name("Good"));
        let outcome = builder.build();

        assert!(!outcome.is_clean());
        assert_eq!(outcome.registry.len(), 1);
        assert!(outcome.registry.contains("Good"));
        let names: Vec<_> = outcome.rejected.iter().map(RegistryError::name).collect();
        assert_eq!(names, vec!["Bad", "NoSeverity", "Other"]);
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn test_field_violations_and_collision_reported_together() {
        let mut builder = Registry::builder();
        builder.declare(decl("A"));
        let err = builder
            .register(
                PatternDeclaration::new("B", "Ends with a period.", Severity::Warning)
                    .with_alt_name("A")
                    .build()
                    .unwrap(),
            )
            .unwrap_err();

        match err {
            RegistryError::Invalid(e) => assert_eq!(
                e.violations,
                vec![
                    Violation::SummaryEndsWithPeriod,
                    Violation::NameCollision {
                        key: "A".to_string(),
                        owner: "A".to_string(),
                    },
                ]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unreadable_entry_is_rejected_by_name() {
        let mut builder = Registry::builder();
        builder
            .declare_entry(Ok(decl("Good")))
            .declare_entry(Err(MalformedDescriptor::Schema {
                name: Some("Broken".to_string()),
                message: "unknown variant `fatal`".to_string(),
            }));
        let outcome = builder.build();

        assert!(outcome.registry.contains("Good"));
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].name(), "Broken");
        assert!(!outcome.rejected[0].is_collision());
    }

    #[test]
    fn test_rejected_pattern_leaves_no_keys() {
        let mut builder = Registry::builder();
        builder.declare(decl("A"));
        builder.declare(decl("B").with_alt_name("A").with_alt_name("b-alt"));
        let registry = builder.build().registry;
        assert!(!registry.contains("B"));
        assert!(!registry.contains("b-alt"));
    }

    #[test]
    fn test_active_respects_disableability() {
        let registry = Registry::from_declarations([
            decl("Plain").with_alt_name("plain"),
            decl("Locked").unsuppressible(),
            decl("Custom").suppressed_by_annotations(&["Allow"]),
        ])
        .unwrap();

        let active: Vec<_> = registry
            .active(&[
                "plain".to_string(),
                "Locked".to_string(),
                "Custom".to_string(),
                "Missing".to_string(),
            ])
            .into_iter()
            .map(BugPattern::name)
            .collect();
        assert_eq!(active, vec!["Locked", "Custom"]);
        assert_eq!(
            registry.get("Locked").unwrap().suppressibility(),
            Suppressibility::Unsuppressible
        );
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }
}
