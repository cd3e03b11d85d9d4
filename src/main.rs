//! Bug pattern CLI
//!
//! Validate bug pattern catalogs, inspect patterns, evaluate suppressions and
//! generate documentation.
//!
//! Usage:
//!   bugpattern validate <paths>...        # Report every rejected declaration
//!   bugpattern list [--tag] [--severity]  # List active patterns
//!   bugpattern explain <name>             # Show pattern details
//!   bugpattern docs <paths>...            # Generate markdown pages
//!   bugpattern suppressed <name> ...      # Evaluate a suppression context
//!   bugpattern stats                      # Catalog statistics

use anyhow::{bail, Context};
use bugpattern::config::Config;
use bugpattern::docs::{self, ExampleProvider, NoExamples};
use bugpattern::registry::BuildOutcome;
use bugpattern::suppression::{Decision, SuppressedBy};
use bugpattern::tags::{has_effective_tag, CatalogStats, LIKELY_ERROR};
use bugpattern::{
    catalog, effective_tags, BugPattern, Diagnostic, FixtureProvider, Scope, Severity,
    SuppressionContext,
};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bugpattern",
    version,
    about = "Bug pattern registry tooling",
    long_about = "Validate bug pattern catalogs, resolve suppressions and generate documentation."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Fail when any declaration is rejected
    #[arg(long, global = true)]
    strict: bool,

    /// Disable patterns (comma-separated names or alternate names)
    #[arg(long, global = true, value_delimiter = ',')]
    disable: Option<Vec<String>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate catalogs and report rejected declarations
    Validate {
        /// Catalog files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// List active patterns
    List {
        /// Catalog files or directories
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Filter by effective tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Filter by severity
        #[arg(short, long)]
        severity: Option<Severity>,

        /// Only patterns considered likely errors
        #[arg(long)]
        likely_errors: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show pattern details
    Explain {
        /// Pattern name or alternate name
        name: String,

        /// Catalog files or directories
        #[arg(short, long, default_value = ".")]
        paths: Vec<PathBuf>,
    },

    /// Generate markdown documentation
    Docs {
        /// Catalog files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Test fixture root to mine examples from
        #[arg(short, long)]
        examples: Option<PathBuf>,

        /// Documentation site root used for generated links
        #[arg(long)]
        site_base: Option<String>,
    },

    /// Decide whether a pattern is suppressed in a given context
    Suppressed {
        /// Pattern name or alternate name
        name: String,

        /// SuppressWarnings values visible at the site
        #[arg(short, long)]
        suppress: Vec<String>,

        /// Annotation types visible at the site
        #[arg(short, long)]
        annotation: Vec<String>,

        /// Catalog files or directories
        #[arg(short, long, default_value = ".")]
        paths: Vec<PathBuf>,
    },

    /// Show catalog statistics
    Stats {
        /// Catalog files or directories
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load_or_default(Config::find_default().as_deref()),
    };
    config.merge_cli(None, None, None, cli.disable.clone(), cli.strict);

    match cli.command {
        Commands::Validate { paths } => cmd_validate(&config, &paths),
        Commands::List {
            paths,
            tag,
            severity,
            likely_errors,
            format,
        } => {
            let tag = if likely_errors {
                Some(LIKELY_ERROR.to_string())
            } else {
                tag
            };
            cmd_list(&config, &paths, tag.as_deref(), severity, format)
        }
        Commands::Explain { name, paths } => cmd_explain(&config, &paths, &name),
        Commands::Docs {
            paths,
            out,
            examples,
            site_base,
        } => {
            config.merge_cli(site_base, examples, out, None, false);
            cmd_docs(&config, &paths)
        }
        Commands::Suppressed {
            name,
            suppress,
            annotation,
            paths,
        } => cmd_suppressed(&config, &paths, &name, &suppress, &annotation),
        Commands::Stats { paths, format } => cmd_stats(&config, &paths, format),
    }
}

/// Load catalogs and build the registry, honoring `catalog.strict`
fn load_registry(config: &Config, paths: &[PathBuf]) -> anyhow::Result<BuildOutcome> {
    let declarations = catalog::load_paths(paths, &config.catalog.include)?;
    let outcome = catalog::build_registry(declarations);

    if config.catalog.strict && !outcome.is_clean() {
        report_rejections(&outcome);
        bail!(
            "{} bug pattern declaration(s) rejected",
            outcome.rejected.len()
        );
    }
    Ok(outcome)
}

fn report_rejections(outcome: &BuildOutcome) {
    for error in &outcome.rejected {
        eprintln!("{}: {}", "error".red().bold(), error);
    }
}

fn find<'a>(outcome: &'a BuildOutcome, name: &str) -> anyhow::Result<&'a BugPattern> {
    match outcome.registry.get(name) {
        Some(pattern) => Ok(pattern),
        None => bail!("bug pattern '{}' not found", name),
    }
}

fn severity_label(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Error => "error".red(),
        Severity::Warning => "warning".yellow(),
        Severity::Suggestion => "suggestion".blue(),
    }
}

fn cmd_validate(config: &Config, paths: &[PathBuf]) -> anyhow::Result<()> {
    let declarations = catalog::load_paths(paths, &config.catalog.include)?;
    let total = declarations.len();
    let outcome = catalog::build_registry(declarations);

    report_rejections(&outcome);
    println!(
        "{} declarations, {} accepted, {} rejected",
        total,
        outcome.registry.len().to_string().green(),
        if outcome.is_clean() {
            "0".normal()
        } else {
            outcome.rejected.len().to_string().red()
        }
    );

    if !outcome.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_list(
    config: &Config,
    paths: &[PathBuf],
    tag: Option<&str>,
    severity: Option<Severity>,
    format: Format,
) -> anyhow::Result<()> {
    let outcome = load_registry(config, paths)?;
    let patterns: Vec<&BugPattern> = outcome
        .registry
        .active(&config.suppression.disabled)
        .into_iter()
        .filter(|p| tag.map_or(true, |t| has_effective_tag(p, t)))
        .filter(|p| severity.map_or(true, |s| p.severity() == s))
        .collect();

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&patterns)?),
        Format::Text => {
            for pattern in &patterns {
                println!(
                    "{:<40} {:<11} {}",
                    pattern.name().cyan(),
                    severity_label(pattern.severity()),
                    pattern.summary()
                );
            }
            println!();
            println!("{} patterns", patterns.len());
        }
    }
    Ok(())
}

fn cmd_explain(config: &Config, paths: &[PathBuf], name: &str) -> anyhow::Result<()> {
    let outcome = load_registry(config, paths)?;
    let pattern = find(&outcome, name)?;

    println!("{}", "Bug Pattern".bold());
    println!();
    println!("  {}: {}", "Name".bold(), pattern.name().cyan());
    if !pattern.alt_names().is_empty() {
        println!("  {}: {}", "Alternate names".bold(), pattern.alt_names().join(", "));
    }
    println!("  {}: {}", "Severity".bold(), severity_label(pattern.severity()));
    println!("  {}: {}", "Summary".bold(), pattern.summary());
    println!("  {}: {}", "Fix".bold(), pattern.provides_fix());

    let tags: Vec<String> = effective_tags(pattern).into_iter().collect();
    if !tags.is_empty() {
        println!("  {}: {}", "Tags".bold(), tags.join(", "));
    }

    if !pattern.explanation().trim().is_empty() {
        println!();
        println!("  {}", "Explanation".bold());
        for line in pattern.explanation().lines() {
            println!("  {}", line);
        }
    }

    println!();
    println!("  {}", "Suppression".bold());
    println!("  {}", docs::suppression_instructions(pattern));

    let diagnostic = Diagnostic::for_pattern(pattern, &config.docs.site_base);
    if let Some(link) = &diagnostic.link {
        println!();
        println!("  {}: {}", "Documentation".bold(), link.blue());
    }

    Ok(())
}

fn cmd_docs(config: &Config, paths: &[PathBuf]) -> anyhow::Result<()> {
    let outcome = load_registry(config, paths)?;
    report_rejections(&outcome);

    let provider: Box<dyn ExampleProvider> = match &config.docs.examples_dir {
        Some(dir) => Box::new(FixtureProvider::new(dir)),
        None => Box::new(NoExamples),
    };

    let generated = docs::generate(&outcome.registry, provider.as_ref(), &config.docs.site_base);
    for (name, error) in &generated.failures {
        eprintln!("{}: {}: {}", "error".red().bold(), name, error);
    }

    let out_dir = &config.docs.output_dir;
    let written = docs::write_site(out_dir, &generated.records, config.docs.front_matter)
        .with_context(|| format!("failed to write documentation to {}", out_dir.display()))?;
    println!(
        "Wrote {} pages to {}",
        written.to_string().green(),
        out_dir.display()
    );

    if !generated.failures.is_empty() {
        bail!(
            "documentation failed for {} pattern(s)",
            generated.failures.len()
        );
    }
    Ok(())
}

fn cmd_suppressed(
    config: &Config,
    paths: &[PathBuf],
    name: &str,
    suppress: &[String],
    annotations: &[String],
) -> anyhow::Result<()> {
    let outcome = load_registry(config, paths)?;
    let pattern = find(&outcome, name)?;

    let scope = Scope {
        suppress_warnings: suppress.to_vec(),
        annotations: annotations.iter().map(|a| a.as_str().into()).collect(),
    };
    let context = SuppressionContext::new().enter(&scope);

    let describe = |by: &SuppressedBy| match by {
        SuppressedBy::Name(n) => format!("SuppressWarnings(\"{}\")", n),
        SuppressedBy::Annotation(a) => format!("@{}", a),
    };

    match config.suppression.policy().decide(pattern, &context) {
        Decision::Report => println!("{}: {}", pattern.name().cyan(), "reported".yellow()),
        Decision::Suppressed(by) => println!(
            "{}: {} by {}",
            pattern.name().cyan(),
            "suppressed".green(),
            describe(&by)
        ),
        Decision::Exempt(by) => println!(
            "{}: {} ({} ignored for ERROR diagnostics)",
            pattern.name().cyan(),
            "reported".yellow(),
            describe(&by)
        ),
    }
    Ok(())
}

fn cmd_stats(config: &Config, paths: &[PathBuf], format: Format) -> anyhow::Result<()> {
    let outcome = load_registry(config, paths)?;
    let stats = CatalogStats::collect(&outcome.registry);

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        Format::Text => {
            println!("{}", "Bug Pattern Statistics".bold());
            println!();
            println!("  Total: {}", stats.total);
            println!("  Rejected: {}", outcome.rejected.len());

            println!();
            println!("  {}", "By severity".bold());
            for (severity, count) in &stats.by_severity {
                println!("    {:<12} {}", severity_label(*severity), count);
            }

            println!();
            println!("  {}", "By suppressibility".bold());
            for (kind, count) in &stats.by_suppressibility {
                println!("    {:<20} {}", kind, count);
            }

            println!();
            println!("  {}", "By tag".bold());
            for (tag, count) in &stats.by_tag {
                println!("    {:<20} {}", tag, count);
            }
        }
    }
    Ok(())
}
