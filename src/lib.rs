//! Bug pattern registry
//!
//! Metadata and resolution logic for the checks of a static-analysis tool that
//! plugs into a compiler's diagnostic pipeline. Each check is described by an
//! immutable [`BugPattern`]: identity, severity, explanation, suppression policy
//! and documentation hints.
//!
//! # Architecture
//!
//! ```text
//! catalog files -> PatternDeclaration -> BugPattern -> validate -> Registry
//!                                                                    |
//!        per diagnostic site:  is_suppressed, effective_tags, Diagnostic
//!        per docs pass:        assemble / generate -> DocumentationRecord
//! ```
//!
//! The registry is built once at startup and is read-only afterwards, so
//! suppression and tag queries can run concurrently without locking.
//!
//! # Example
//!
//! ```
//! use bugpattern::{is_suppressed, PatternDeclaration, Registry, Severity, SuppressionContext};
//!
//! let registry = Registry::from_declarations([
//!     PatternDeclaration::new("UnusedVar", "Variable is never read", Severity::Warning),
//! ])
//! .unwrap();
//!
//! let pattern = registry.get("UnusedVar").unwrap();
//! let context = SuppressionContext::new().with_suppression("UnusedVar");
//! assert!(is_suppressed(pattern, &context));
//! ```

pub mod catalog;
pub mod config;
pub mod diagnostic;
pub mod docs;
pub mod link;
pub mod pattern;
pub mod registry;
pub mod severity;
pub mod suppression;
pub mod tags;
pub mod validate;

// Re-export main types
pub use catalog::{CatalogError, CatalogFile};
pub use config::Config;
pub use diagnostic::Diagnostic;
pub use docs::{
    assemble, DocError, DocumentationRecord, Example, ExampleProvider, ExpectedOutcome,
    FixtureProvider, StaticExamples,
};
pub use link::{resolve_link, MissingLink, SiteBase};
pub use pattern::{
    AnnotationType, BugPattern, Category, LinkType, MalformedDescriptor, PatternDeclaration,
    ProvidesFix, Suppressibility,
};
pub use registry::{BuildOutcome, Registry, RegistryBuilder, RegistryError};
pub use severity::Severity;
pub use suppression::{is_suppressed, Scope, SuppressionContext, SuppressionPolicy};
pub use tags::{effective_tags, TagIndex};
pub use validate::{validate, ValidationError, Violation};
