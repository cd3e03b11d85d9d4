//! Bug pattern descriptors
//!
//! A [`PatternDeclaration`] is the raw, serde-facing form of a check's metadata as
//! it appears in a catalog file or is assembled in code. Turning it into a
//! [`BugPattern`] either yields an immutable descriptor or fails with
//! [`MalformedDescriptor`]; nothing in between is observable.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use thiserror::Error;

/// Kind of link attached to the check's diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// Link to the generated documentation page on the documentation site
    #[default]
    #[serde(alias = "AUTOGENERATED")]
    Autogenerated,
    /// Use the declared `link` verbatim
    #[serde(alias = "CUSTOM")]
    Custom,
    /// No link is displayed
    #[serde(alias = "NONE")]
    None,
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkType::Autogenerated => write!(f, "AUTOGENERATED"),
            LinkType::Custom => write!(f, "CUSTOM"),
            LinkType::None => write!(f, "NONE"),
        }
    }
}

/// Whether and what kind of fix a check offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvidesFix {
    #[default]
    #[serde(alias = "NO_FIX")]
    NoFix,
    #[serde(alias = "REQUIRES_HUMAN_ATTENTION")]
    RequiresHumanAttention,
}

impl fmt::Display for ProvidesFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvidesFix::NoFix => write!(f, "NO_FIX"),
            ProvidesFix::RequiresHumanAttention => write!(f, "REQUIRES_HUMAN_ATTENTION"),
        }
    }
}

/// Legacy problem-domain classification.
///
/// Kept so old catalogs round-trip; tags replace it and nothing reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Jdk,
    Guava,
    Guice,
    Dagger,
    Junit,
    #[default]
    OneOff,
    Inject,
    Mockito,
    Jmock,
    Android,
    Protobuf,
    Truth,
}

/// How users may silence a check at a given location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suppressibility {
    /// `SuppressWarnings("Name")` on an enclosing element
    #[default]
    #[serde(alias = "SUPPRESS_WARNINGS")]
    SuppressWarnings,
    /// One of the check's custom annotations on an enclosing element
    #[serde(alias = "CUSTOM_ANNOTATION")]
    CustomAnnotation,
    /// Cannot be suppressed
    #[serde(alias = "UNSUPPRESSIBLE")]
    Unsuppressible,
}

impl Suppressibility {
    /// Whether an operator may switch the check off for a whole run
    pub fn is_disableable(self) -> bool {
        matches!(self, Suppressibility::SuppressWarnings)
    }
}

impl fmt::Display for Suppressibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suppressibility::SuppressWarnings => write!(f, "SUPPRESS_WARNINGS"),
            Suppressibility::CustomAnnotation => write!(f, "CUSTOM_ANNOTATION"),
            Suppressibility::Unsuppressible => write!(f, "UNSUPPRESSIBLE"),
        }
    }
}

/// Identity of an annotation type, by fully qualified name (e.g. `com.acme.AllowLeak`).
///
/// Two annotation types are the same only if their qualified names are equal;
/// simple-name matches do not count.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationType(String);

impl AnnotationType {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self(qualified_name.into())
    }

    pub fn qualified_name(&self) -> &str {
        &self.0
    }

    /// Name after the last `.` (`AllowLeak` for `com.acme.AllowLeak`)
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnotationType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A declaration that cannot be turned into a descriptor at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedDescriptor {
    #[error("bug pattern declaration has no name")]
    MissingName,

    #[error("bug pattern '{name}' is missing required field `{field}`")]
    MissingField { name: String, field: &'static str },

    #[error("bug pattern '{name}' lists alternate name '{alt}' more than once")]
    DuplicateAltName { name: String, alt: String },

    /// The declaration does not fit the declaration schema (unknown field, bad value)
    #[error("bug pattern '{}' cannot be read: {message}", .name.as_deref().unwrap_or("<unnamed>"))]
    Schema {
        name: Option<String>,
        message: String,
    },
}

impl MalformedDescriptor {
    /// Name of the offending declaration, when it has one
    pub fn name(&self) -> Option<&str> {
        match self {
            MalformedDescriptor::MissingName => None,
            MalformedDescriptor::MissingField { name, .. }
            | MalformedDescriptor::DuplicateAltName { name, .. } => Some(name),
            MalformedDescriptor::Schema { name, .. } => name.as_deref(),
        }
    }
}

/// Raw bug pattern metadata, as written in a catalog file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatternDeclaration {
    /// Unique identifier, used for suppression and in diagnostics
    pub name: Option<String>,

    /// Alternate identifiers also accepted for suppression
    pub alt_names: Vec<String>,

    pub link_type: LinkType,

    /// Link URL, used only with [`LinkType::Custom`]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,

    /// Free-form classification tags
    pub tags: Vec<String>,

    pub provides_fix: ProvidesFix,

    pub category: Category,

    /// Single-line description; no trailing period, no markup
    pub summary: Option<String>,

    /// Long-form description; markdown allowed
    #[serde(skip_serializing_if = "String::is_empty")]
    pub explanation: String,

    pub severity: Option<Severity>,

    pub suppressibility: Suppressibility,

    /// Annotation types that suppress the check under [`Suppressibility::CustomAnnotation`]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_suppression_annotations: Vec<AnnotationType>,

    /// Generate a block explaining how to suppress the check
    pub document_suppression: bool,

    /// Include test fixtures as examples in the generated documentation
    pub generate_examples_from_test_cases: bool,
}

impl Default for PatternDeclaration {
    fn default() -> Self {
        Self {
            name: None,
            alt_names: Vec::new(),
            link_type: LinkType::default(),
            link: String::new(),
            tags: Vec::new(),
            provides_fix: ProvidesFix::default(),
            category: Category::default(),
            summary: None,
            explanation: String::new(),
            severity: None,
            suppressibility: Suppressibility::default(),
            custom_suppression_annotations: Vec::new(),
            document_suppression: true,
            generate_examples_from_test_cases: true,
        }
    }
}

impl PatternDeclaration {
    /// Create a declaration with the three required fields
    pub fn new(name: &str, summary: &str, severity: Severity) -> Self {
        Self {
            name: Some(name.to_string()),
            summary: Some(summary.to_string()),
            severity: Some(severity),
            ..Self::default()
        }
    }

    pub fn with_alt_name(mut self, alt: &str) -> Self {
        self.alt_names.push(alt.to_string());
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub fn with_explanation(mut self, explanation: &str) -> Self {
        self.explanation = explanation.to_string();
        self
    }

    /// Use a custom link instead of the generated documentation page
    pub fn with_custom_link(mut self, url: &str) -> Self {
        self.link_type = LinkType::Custom;
        self.link = url.to_string();
        self
    }

    pub fn with_link_type(mut self, link_type: LinkType) -> Self {
        self.link_type = link_type;
        self
    }

    pub fn with_provides_fix(mut self, provides_fix: ProvidesFix) -> Self {
        self.provides_fix = provides_fix;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_suppressibility(mut self, suppressibility: Suppressibility) -> Self {
        self.suppressibility = suppressibility;
        self
    }

    /// Add a custom suppression annotation (does not change suppressibility)
    pub fn with_custom_annotation(mut self, annotation: &str) -> Self {
        self.custom_suppression_annotations
            .push(AnnotationType::new(annotation));
        self
    }

    /// Make the check suppressible only through the given annotation types
    pub fn suppressed_by_annotations(mut self, annotations: &[&str]) -> Self {
        self.suppressibility = Suppressibility::CustomAnnotation;
        self.custom_suppression_annotations = annotations
            .iter()
            .map(|a| AnnotationType::new(*a))
            .collect();
        self
    }

    pub fn unsuppressible(mut self) -> Self {
        self.suppressibility = Suppressibility::Unsuppressible;
        self
    }

    pub fn without_suppression_docs(mut self) -> Self {
        self.document_suppression = false;
        self
    }

    pub fn without_generated_examples(mut self) -> Self {
        self.generate_examples_from_test_cases = false;
        self
    }

    /// Construct the immutable descriptor
    pub fn build(self) -> Result<BugPattern, MalformedDescriptor> {
        BugPattern::try_from(self)
    }
}

/// Immutable description of one bug pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PatternDeclaration", into = "PatternDeclaration")]
pub struct BugPattern {
    name: String,
    alt_names: Vec<String>,
    link_type: LinkType,
    link: String,
    tags: BTreeSet<String>,
    provides_fix: ProvidesFix,
    category: Category,
    summary: String,
    explanation: String,
    severity: Severity,
    suppressibility: Suppressibility,
    custom_suppression_annotations: BTreeSet<AnnotationType>,
    document_suppression: bool,
    generate_examples_from_test_cases: bool,
}

impl TryFrom<PatternDeclaration> for BugPattern {
    type Error = MalformedDescriptor;

    fn try_from(decl: PatternDeclaration) -> Result<Self, Self::Error> {
        let name = decl.name.ok_or(MalformedDescriptor::MissingName)?;

        let summary = decl.summary.ok_or_else(|| MalformedDescriptor::MissingField {
            name: name.clone(),
            field: "summary",
        })?;

        let severity = decl.severity.ok_or_else(|| MalformedDescriptor::MissingField {
            name: name.clone(),
            field: "severity",
        })?;

        let mut seen = HashSet::new();
        for alt in &decl.alt_names {
            if !seen.insert(alt.as_str()) {
                return Err(MalformedDescriptor::DuplicateAltName {
                    name,
                    alt: alt.clone(),
                });
            }
        }

        Ok(Self {
            name,
            alt_names: decl.alt_names,
            link_type: decl.link_type,
            link: decl.link,
            tags: decl.tags.into_iter().collect(),
            provides_fix: decl.provides_fix,
            category: decl.category,
            summary,
            explanation: decl.explanation,
            severity,
            suppressibility: decl.suppressibility,
            custom_suppression_annotations: decl.custom_suppression_annotations.into_iter().collect(),
            document_suppression: decl.document_suppression,
            generate_examples_from_test_cases: decl.generate_examples_from_test_cases,
        })
    }
}

impl From<BugPattern> for PatternDeclaration {
    fn from(p: BugPattern) -> Self {
        Self {
            name: Some(p.name),
            alt_names: p.alt_names,
            link_type: p.link_type,
            link: p.link,
            tags: p.tags.into_iter().collect(),
            provides_fix: p.provides_fix,
            category: p.category,
            summary: Some(p.summary),
            explanation: p.explanation,
            severity: Some(p.severity),
            suppressibility: p.suppressibility,
            custom_suppression_annotations: p.custom_suppression_annotations.into_iter().collect(),
            document_suppression: p.document_suppression,
            generate_examples_from_test_cases: p.generate_examples_from_test_cases,
        }
    }
}

impl BugPattern {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternate names, in declaration order
    pub fn alt_names(&self) -> &[String] {
        &self.alt_names
    }

    /// Primary name followed by every alternate name
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.alt_names.iter().map(String::as_str))
    }

    pub fn link_type(&self) -> LinkType {
        self.link_type
    }

    /// Declared link, as written; meaningful only for [`LinkType::Custom`]
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Declared tags (see [`crate::tags::effective_tags`] for the aggregated view)
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn provides_fix(&self) -> ProvidesFix {
        self.provides_fix
    }

    /// Legacy classification, carried for round-tripping only
    #[deprecated(note = "categories are superseded by tags")]
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn suppressibility(&self) -> Suppressibility {
        self.suppressibility
    }

    pub fn custom_suppression_annotations(&self) -> &BTreeSet<AnnotationType> {
        &self.custom_suppression_annotations
    }

    pub fn document_suppression(&self) -> bool {
        self.document_suppression
    }

    pub fn generate_examples_from_test_cases(&self) -> bool {
        self.generate_examples_from_test_cases
    }

    /// Back to the serde-facing declaration
    pub fn to_declaration(&self) -> PatternDeclaration {
        self.clone().into()
    }
}
