//! Documentation assembly
//!
//! Combines a descriptor with examples mined from test fixtures into a
//! [`DocumentationRecord`], and renders records as markdown pages.
//!
//! Fixture layout understood by [`FixtureProvider`]:
//!
//! ```text
//! <root>/**/<Name>PositiveCases*   code the check flags
//! <root>/**/<Name>NegativeCases*   code the check accepts
//! ```

use crate::link::{resolve_link, MissingLink, SiteBase};
use crate::pattern::{BugPattern, ProvidesFix, Suppressibility};
use crate::registry::Registry;
use crate::severity::Severity;
use crate::tags::effective_tags;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error while assembling or writing documentation
#[derive(Debug, Error)]
pub enum DocError {
    #[error(transparent)]
    MissingLink(#[from] MissingLink),

    #[error("failed to read example {}: {source}", .path.display())]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Whether the check is expected to flag an example
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedOutcome {
    /// The check reports a diagnostic
    Positive,
    /// The check stays silent
    Negative,
}

impl ExpectedOutcome {
    fn fixture_marker(self) -> &'static str {
        match self {
            ExpectedOutcome::Positive => "PositiveCases",
            ExpectedOutcome::Negative => "NegativeCases",
        }
    }
}

/// A code snippet taken from a test fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Example {
    pub snippet: String,
    pub outcome: ExpectedOutcome,
    /// Fixture file the snippet came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl Example {
    pub fn new(snippet: &str, outcome: ExpectedOutcome) -> Self {
        Self {
            snippet: snippet.to_string(),
            outcome,
            source: None,
        }
    }

    fn file_name(&self) -> Option<String> {
        self.source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }
}

/// A lazy sequence of examples
pub type Examples<'a> = Box<dyn Iterator<Item = Result<Example, DocError>> + 'a>;

/// Source of examples for documentation.
///
/// Each call to [`ExampleProvider::examples`] starts a fresh, finite sequence,
/// which may be empty.
pub trait ExampleProvider: Send + Sync {
    fn examples(&self, check_name: &str) -> Examples<'_>;
}

/// Provider with no examples at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExamples;

impl ExampleProvider for NoExamples {
    fn examples(&self, _check_name: &str) -> Examples<'_> {
        Box::new(std::iter::empty())
    }
}

/// In-memory examples keyed by check name
#[derive(Debug, Clone, Default)]
pub struct StaticExamples {
    by_name: HashMap<String, Vec<Example>>,
}

impl StaticExamples {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_example(mut self, check_name: &str, snippet: &str, outcome: ExpectedOutcome) -> Self {
        self.by_name
            .entry(check_name.to_string())
            .or_default()
            .push(Example::new(snippet, outcome));
        self
    }
}

impl ExampleProvider for StaticExamples {
    fn examples(&self, check_name: &str) -> Examples<'_> {
        match self.by_name.get(check_name) {
            Some(examples) => Box::new(examples.iter().cloned().map(Ok)),
            None => Box::new(std::iter::empty()),
        }
    }
}

/// Examples read from fixture files under a root directory
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    root: PathBuf,
}

impl FixtureProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn fixture_paths(&self, check_name: &str, outcome: ExpectedOutcome) -> Vec<PathBuf> {
        let pattern = format!(
            "{}/**/{}{}*",
            glob::Pattern::escape(&self.root.to_string_lossy()),
            glob::Pattern::escape(check_name),
            outcome.fixture_marker()
        );

        let mut paths: Vec<PathBuf> = match glob::glob(&pattern) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .filter(|p| p.is_file())
                .collect(),
            Err(e) => {
                log::warn!("invalid fixture pattern {}: {}", pattern, e);
                Vec::new()
            }
        };
        paths.sort();
        paths
    }
}

impl ExampleProvider for FixtureProvider {
    fn examples(&self, check_name: &str) -> Examples<'_> {
        let name = check_name.to_string();
        Box::new(
            [ExpectedOutcome::Positive, ExpectedOutcome::Negative]
                .into_iter()
                .flat_map(move |outcome| {
                    self.fixture_paths(&name, outcome)
                        .into_iter()
                        .map(move |path| (path, outcome))
                })
                .map(|(path, outcome)| match std::fs::read(&path) {
                    Ok(bytes) => Ok(Example {
                        snippet: String::from_utf8_lossy(&bytes).into_owned(),
                        outcome,
                        source: Some(path),
                    }),
                    Err(source) => Err(DocError::Fixture { path, source }),
                }),
        )
    }
}

/// Everything needed to render one pattern's documentation page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentationRecord {
    pub name: String,
    pub alt_names: Vec<String>,
    pub summary: String,
    pub explanation: String,
    pub severity: Severity,
    /// Effective tags
    pub tags: BTreeSet<String>,
    pub provides_fix: ProvidesFix,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Suppression instructions, absent when the pattern documents its own
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppression: Option<String>,
    pub examples: Vec<Example>,
}

/// Canned instructions for the pattern's suppression mechanism
pub fn suppression_instructions(pattern: &BugPattern) -> String {
    match pattern.suppressibility() {
        Suppressibility::SuppressWarnings => format!(
            "Suppress false positives by adding `@SuppressWarnings(\"{}\")` to the enclosing element.",
            pattern.name()
        ),
        Suppressibility::CustomAnnotation => {
            let annotations: Vec<String> = pattern
                .custom_suppression_annotations()
                .iter()
                .map(|a| format!("`@{}`", a.simple_name()))
                .collect();
            format!(
                "Suppress false positives by adding {} to the enclosing element.",
                match annotations.as_slice() {
                    [single] => format!("the annotation {}", single),
                    many => format!("one of the annotations {}", many.join(", ")),
                }
            )
        }
        Suppressibility::Unsuppressible => "This check may not be suppressed.".to_string(),
    }
}

/// Build the documentation record for one pattern
pub fn assemble<P>(
    pattern: &BugPattern,
    provider: &P,
    site: &SiteBase,
) -> Result<DocumentationRecord, DocError>
where
    P: ExampleProvider + ?Sized,
{
    let link = resolve_link(pattern, site)?;

    let suppression = pattern
        .document_suppression()
        .then(|| suppression_instructions(pattern));

    // An example that cannot be produced is skipped, never fatal to the record
    let examples = if pattern.generate_examples_from_test_cases() {
        provider
            .examples(pattern.name())
            .filter_map(|example| match example {
                Ok(example) => Some(example),
                Err(e) => {
                    log::warn!("skipping example for '{}': {}", pattern.name(), e);
                    None
                }
            })
            .collect()
    } else {
        Vec::new()
    };
    log::debug!(
        "assembled docs for '{}' with {} examples",
        pattern.name(),
        examples.len()
    );

    Ok(DocumentationRecord {
        name: pattern.name().to_string(),
        alt_names: pattern.alt_names().to_vec(),
        summary: pattern.summary().to_string(),
        explanation: pattern.explanation().to_string(),
        severity: pattern.severity(),
        tags: effective_tags(pattern),
        provides_fix: pattern.provides_fix(),
        link,
        suppression,
        examples,
    })
}

/// Result of a documentation pass over a whole registry
#[derive(Debug, Default)]
pub struct GeneratedDocs {
    pub records: Vec<DocumentationRecord>,
    /// Patterns whose documentation could not be assembled
    pub failures: Vec<(String, DocError)>,
}

/// Assemble every pattern once, in parallel, keeping registry order
pub fn generate<P>(registry: &Registry, provider: &P, site: &SiteBase) -> GeneratedDocs
where
    P: ExampleProvider + ?Sized,
{
    let results: Vec<(String, Result<DocumentationRecord, DocError>)> = registry
        .patterns()
        .par_iter()
        .map(|p| (p.name().to_string(), assemble(p, provider, site)))
        .collect();

    let mut docs = GeneratedDocs::default();
    for (name, result) in results {
        match result {
            Ok(record) => docs.records.push(record),
            Err(e) => {
                log::warn!("skipping documentation for '{}': {}", name, e);
                docs.failures.push((name, e));
            }
        }
    }
    docs
}

impl DocumentationRecord {
    pub fn positive_examples(&self) -> impl Iterator<Item = &Example> {
        self.examples
            .iter()
            .filter(|e| e.outcome == ExpectedOutcome::Positive)
    }

    pub fn negative_examples(&self) -> impl Iterator<Item = &Example> {
        self.examples
            .iter()
            .filter(|e| e.outcome == ExpectedOutcome::Negative)
    }

    /// Preferred file name of the rendered page; see [`page_names`] for the
    /// names actually used when a site is written
    pub fn page_name(&self) -> String {
        format!("{}.md", self.page_stem())
    }

    fn page_stem(&self) -> String {
        self.name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// Render as a markdown page, optionally with YAML front matter
    pub fn to_markdown(&self, front_matter: bool) -> String {
        let mut out = String::new();
        let severity = self.severity.to_string().to_uppercase();

        if front_matter {
            let _ = writeln!(out, "---");
            let _ = writeln!(out, "title: {}", yaml_string(&self.name));
            let _ = writeln!(out, "summary: {}", yaml_string(&self.summary));
            let _ = writeln!(out, "layout: bugpattern");
            let tags: Vec<String> = self.tags.iter().map(|t| yaml_string(t)).collect();
            let _ = writeln!(out, "tags: [{}]", tags.join(", "));
            let _ = writeln!(out, "severity: {}", severity);
            let _ = writeln!(out, "---");
            out.push('\n');
        } else {
            let _ = writeln!(out, "# {}\n", self.name);
            let _ = writeln!(out, "__{}__\n", self.summary);
            let _ = writeln!(out, "Severity: {}\n", severity);
        }

        if !self.alt_names.is_empty() {
            let _ = writeln!(out, "_Alternate names: {}_\n", self.alt_names.join(", "));
        }

        if !self.explanation.trim().is_empty() {
            let _ = writeln!(out, "## The problem\n");
            let _ = writeln!(out, "{}\n", self.explanation.trim());
        }

        if let Some(suppression) = &self.suppression {
            let _ = writeln!(out, "## Suppression\n");
            let _ = writeln!(out, "{}\n", suppression);
        }

        render_examples(&mut out, "Positive examples", self.positive_examples());
        render_examples(&mut out, "Negative examples", self.negative_examples());

        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        out.push('\n');
        out
    }
}

fn render_examples<'a>(out: &mut String, heading: &str, examples: impl Iterator<Item = &'a Example>) {
    let mut examples = examples.peekable();
    if examples.peek().is_none() {
        return;
    }

    let _ = writeln!(out, "## {}\n", heading);
    for example in examples {
        if let Some(file) = example.file_name() {
            let _ = writeln!(out, "__{}__\n", file);
        }
        let _ = writeln!(out, "```\n{}\n```\n", example.snippet.trim_end());
    }
}

/// Double-quoted YAML scalar (JSON strings are valid YAML)
fn yaml_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

const INDEX_PAGE: &str = "index.md";

/// Page file name for each record, in order.
///
/// Names that would clash with an earlier page or the index (compared
/// case-insensitively) get a `-2`, `-3`, ... suffix.
pub fn page_names(records: &[DocumentationRecord]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::from([INDEX_PAGE.to_string()]);
    records
        .iter()
        .map(|record| {
            let stem = record.page_stem();
            let mut page = format!("{}.md", stem);
            let mut n = 2;
            while !taken.insert(page.to_lowercase()) {
                page = format!("{}-{}.md", stem, n);
                n += 1;
            }
            if page != record.page_name() {
                log::warn!(
                    "page for '{}' renamed to {} to avoid overwriting another page",
                    record.name,
                    page
                );
            }
            page
        })
        .collect()
}

/// Index page listing every record, grouped by severity
pub fn render_index(records: &[DocumentationRecord]) -> String {
    index_page(records, &page_names(records))
}

fn index_page(records: &[DocumentationRecord], pages: &[String]) -> String {
    let mut out = String::from("# Bug patterns\n");

    for severity in Severity::ALL {
        let mut group: Vec<(&DocumentationRecord, &String)> = records
            .iter()
            .zip(pages)
            .filter(|(r, _)| r.severity == severity)
            .collect();
        if group.is_empty() {
            continue;
        }
        group.sort_by(|a, b| a.0.name.cmp(&b.0.name));

        let _ = writeln!(out, "\n## {}\n", severity.to_string().to_uppercase());
        for (record, page) in group {
            let _ = writeln!(out, "- [{}]({}): {}", record.name, page, record.summary);
        }
    }

    out
}

/// Write one page per record plus `index.md`; returns the number of pages written
pub fn write_site(
    out_dir: &Path,
    records: &[DocumentationRecord],
    front_matter: bool,
) -> Result<usize, DocError> {
    std::fs::create_dir_all(out_dir)?;

    let pages = page_names(records);
    for (record, page) in records.iter().zip(&pages) {
        let path = out_dir.join(page);
        std::fs::write(&path, record.to_markdown(front_matter))?;
        log::debug!("wrote {}", path.display());
    }
    std::fs::write(out_dir.join(INDEX_PAGE), index_page(records, &pages))?;

    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{LinkType, PatternDeclaration};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn dead_store() -> BugPattern {
        PatternDeclaration::new("DeadStore", "Value is never read", Severity::Warning)
            .with_explanation("Assigning a value that is never read is wasteful.")
            .with_tag("Style")
            .build()
            .unwrap()
    }

    /// Counts how often examples were requested
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl ExampleProvider for Counting {
        fn examples(&self, _check_name: &str) -> Examples<'_> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::new(std::iter::once(Ok(Example::new("x = 1;", ExpectedOutcome::Positive))))
        }
    }

    #[test]
    fn test_assemble_with_examples() {
        let provider = StaticExamples::new()
            .with_example("DeadStore", "int x = 1; x = 2;", ExpectedOutcome::Positive)
            .with_example("DeadStore", "int x = 1; use(x);", ExpectedOutcome::Negative);
        let record = assemble(&dead_store(), &provider, &SiteBase::default()).unwrap();

        assert_eq!(record.examples.len(), 2);
        assert_eq!(record.positive_examples().count(), 1);
        assert_eq!(record.negative_examples().count(), 1);
        assert_eq!(
            record.link.as_deref(),
            Some("https://errorprone.info/bugpattern/DeadStore")
        );
        assert_eq!(
            record.suppression.as_deref(),
            Some("Suppress false positives by adding `@SuppressWarnings(\"DeadStore\")` to the enclosing element.")
        );
    }

    #[test]
    fn test_assemble_without_examples_is_fine() {
        let record = assemble(&dead_store(), &NoExamples, &SiteBase::default()).unwrap();
        assert!(record.examples.is_empty());
    }

    #[test]
    fn test_examples_not_requested_when_disabled() {
        let provider = Counting::default();
        let pattern = PatternDeclaration::new("A", "summary", Severity::Warning)
            .without_generated_examples()
            .build()
            .unwrap();
        let record = assemble(&pattern, &provider, &SiteBase::default()).unwrap();

        assert!(record.examples.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);

        assemble(&dead_store(), &provider, &SiteBase::default()).unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_suppression_block_omitted() {
        let pattern = PatternDeclaration::new("A", "summary", Severity::Warning)
            .without_suppression_docs()
            .build()
            .unwrap();
        let record = assemble(&pattern, &NoExamples, &SiteBase::default()).unwrap();
        assert_eq!(record.suppression, None);
        assert!(!record.to_markdown(true).contains("## Suppression"));
    }

    #[test]
    fn test_suppression_instructions_per_variant() {
        let custom = PatternDeclaration::new("Leak", "x", Severity::Error)
            .suppressed_by_annotations(&["com.acme.AllowLeak"])
            .build()
            .unwrap();
        assert_eq!(
            suppression_instructions(&custom),
            "Suppress false positives by adding the annotation `@AllowLeak` to the enclosing element."
        );

        let many = PatternDeclaration::new("Leak", "x", Severity::Error)
            .suppressed_by_annotations(&["a.AllowLeak", "b.Owned"])
            .build()
            .unwrap();
        assert!(suppression_instructions(&many).contains("one of the annotations `@AllowLeak`, `@Owned`"));

        let never = PatternDeclaration::new("Never", "x", Severity::Error)
            .unsuppressible()
            .build()
            .unwrap();
        assert_eq!(suppression_instructions(&never), "This check may not be suppressed.");
    }

    #[test]
    fn test_missing_link() {
        let pattern = PatternDeclaration::new("Bad Name", "summary", Severity::Warning)
            .build()
            .unwrap();
        let err = assemble(&pattern, &NoExamples, &SiteBase::default()).unwrap_err();
        assert!(matches!(err, DocError::MissingLink(_)));

        let none = PatternDeclaration::new("Bad Name", "summary", Severity::Warning)
            .with_link_type(LinkType::None)
            .build()
            .unwrap();
        assert!(assemble(&none, &NoExamples, &SiteBase::default()).is_ok());
    }

    #[test]
    fn test_markdown_page() {
        let provider = StaticExamples::new().with_example(
            "DeadStore",
            "int x = 1;\nx = 2;\n",
            ExpectedOutcome::Positive,
        );
        let record = assemble(&dead_store(), &provider, &SiteBase::default()).unwrap();

        let expected = "---
title: \"DeadStore\"
summary: \"Value is never read\"
layout: bugpattern
tags: [\"Style\"]
severity: WARNING
---

## The problem

Assigning a value that is never read is wasteful.

## Suppression

Suppress false positives by adding `@SuppressWarnings(\"DeadStore\")` to the enclosing element.

## Positive examples

```
int x = 1;
x = 2;
```
";
        assert_eq!(record.to_markdown(true), expected);

        let plain = record.to_markdown(false);
        assert!(plain.starts_with("# DeadStore\n\n__Value is never read__\n"));
    }

    #[test]
    fn test_fixture_provider_is_restartable() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("testdata");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("DeadStorePositiveCases.java"), "x = 2;").unwrap();
        std::fs::write(nested.join("DeadStoreNegativeCases.java"), "use(x);").unwrap();
        std::fs::write(nested.join("DeadStoreXPositiveCases.java"), "other").unwrap();

        let provider = FixtureProvider::new(dir.path());
        let first: Vec<Example> = provider
            .examples("DeadStore")
            .collect::<Result<_, _>>()
            .unwrap();
        let second: Vec<Example> = provider
            .examples("DeadStore")
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].outcome, ExpectedOutcome::Positive);
        assert_eq!(first[0].snippet, "x = 2;");
        assert_eq!(first[1].outcome, ExpectedOutcome::Negative);
        assert_eq!(
            first[0].file_name().as_deref(),
            Some("DeadStorePositiveCases.java")
        );

        assert_eq!(provider.examples("Unknown").count(), 0);
    }

    #[test]
    fn test_generate_keeps_order_and_reports_failures() {
        let registry = Registry::from_declarations([
            PatternDeclaration::new("B", "summary", Severity::Warning),
            PatternDeclaration::new("Bad Name", "summary", Severity::Error),
            PatternDeclaration::new("A", "summary", Severity::Error),
        ])
        .unwrap();

        let docs = generate(&registry, &NoExamples, &SiteBase::default());
        let names: Vec<_> = docs.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(docs.failures.len(), 1);
        assert_eq!(docs.failures[0].0, "Bad Name");
    }

    #[test]
    fn test_index_and_site() {
        let registry = Registry::from_declarations([
            PatternDeclaration::new("Zeta", "Last one", Severity::Warning),
            PatternDeclaration::new("Alpha", "First one", Severity::Warning),
            PatternDeclaration::new("Boom", "Breaks", Severity::Error),
        ])
        .unwrap();
        let docs = generate(&registry, &NoExamples, &SiteBase::default());

        let index = render_index(&docs.records);
        assert_eq!(
            index,
            "# Bug patterns\n\n## ERROR\n\n- [Boom](Boom.md): Breaks\n\n## WARNING\n\n\
             - [Alpha](Alpha.md): First one\n- [Zeta](Zeta.md): Last one\n"
        );

        let dir = tempfile::tempdir().unwrap();
        let written = write_site(dir.path(), &docs.records, true).unwrap();
        assert_eq!(written, 3);
        assert!(dir.path().join("Boom.md").exists());
        assert!(dir.path().join("index.md").exists());
    }

    fn unlinked(name: &str) -> DocumentationRecord {
        let pattern = PatternDeclaration::new(name, "summary", Severity::Warning)
            .with_link_type(LinkType::None)
            .build()
            .unwrap();
        assemble(&pattern, &NoExamples, &SiteBase::default()).unwrap()
    }

    #[test]
    fn test_non_utf8_fixture_is_read_lossily() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("CafePositiveCases.java"),
            b"String s = \"caf\xe9\";\n",
        )
        .unwrap();
        let pattern = PatternDeclaration::new("Cafe", "summary", Severity::Warning)
            .build()
            .unwrap();

        let provider = FixtureProvider::new(dir.path());
        let record = assemble(&pattern, &provider, &SiteBase::default()).unwrap();
        assert_eq!(record.examples.len(), 1);
        assert_eq!(record.examples[0].snippet, "String s = \"caf\u{FFFD}\";\n");
    }

    /// Yields one good example around an unreadable one
    struct Flaky;

    impl ExampleProvider for Flaky {
        fn examples(&self, _check_name: &str) -> Examples<'_> {
            Box::new(
                vec![
                    Ok(Example::new("a();", ExpectedOutcome::Positive)),
                    Err(DocError::Fixture {
                        path: PathBuf::from("gone.java"),
                        source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
                    }),
                    Ok(Example::new("b();", ExpectedOutcome::Negative)),
                ]
                .into_iter(),
            )
        }
    }

    #[test]
    fn test_unreadable_example_is_skipped() {
        let record = assemble(&dead_store(), &Flaky, &SiteBase::default()).unwrap();
        let snippets: Vec<_> = record.examples.iter().map(|e| e.snippet.as_str()).collect();
        assert_eq!(snippets, vec!["a();", "b();"]);
    }

    #[test]
    fn test_clashing_page_names_are_made_unique() {
        let records = vec![unlinked("a b"), unlinked("a_b"), unlinked("A_B"), unlinked("index")];
        assert_eq!(
            page_names(&records),
            vec!["a_b.md", "a_b-2.md", "A_B-3.md", "index-2.md"]
        );

        let dir = tempfile::tempdir().unwrap();
        assert_eq!(write_site(dir.path(), &records, false).unwrap(), 4);

        let first = std::fs::read_to_string(dir.path().join("a_b.md")).unwrap();
        assert!(first.starts_with("# a b\n"));
        let second = std::fs::read_to_string(dir.path().join("a_b-2.md")).unwrap();
        assert!(second.starts_with("# a_b\n"));

        let index = std::fs::read_to_string(dir.path().join("index.md")).unwrap();
        assert!(index.starts_with("# Bug patterns\n"));
        assert!(index.contains("- [a b](a_b.md): summary"));
        assert!(index.contains("- [a_b](a_b-2.md): summary"));
        assert!(index.contains("- [index](index-2.md): summary"));
    }

    #[test]
    fn test_front_matter_is_quoted() {
        let pattern = PatternDeclaration::new("Foo: bar", "summary", Severity::Warning)
            .with_link_type(LinkType::None)
            .with_tag("#hash")
            .with_tag("a, b")
            .build()
            .unwrap();
        let page = assemble(&pattern, &NoExamples, &SiteBase::default())
            .unwrap()
            .to_markdown(true);

        assert!(page.contains("title: \"Foo: bar\"\n"));
        assert!(page.contains("tags: [\"#hash\", \"a, b\"]\n"));
    }

    #[test]
    fn test_page_name_is_file_safe() {
        let record = assemble(
            &PatternDeclaration::new("a/b c", "summary", Severity::Warning)
                .with_link_type(LinkType::None)
                .build()
                .unwrap(),
            &NoExamples,
            &SiteBase::default(),
        )
        .unwrap();
        assert_eq!(record.page_name(), "a_b_c.md");
    }
}
