use std::{fmt::Write as _, path::PathBuf};

use bibkeeper::{
    Acronym, Corpus,
    domain::{SearchField, ShortFormIndex, UsageSet, glossary},
    storage::read_usage,
};
use clap::{Args, Parser, Subcommand};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub struct Acronyms {
    #[command(subcommand)]
    command: AcronymCommand,
}

#[derive(Debug, Subcommand)]
enum AcronymCommand {
    /// Load and validate every acronym, reporting short-form collisions
    Validate(Validate),

    /// Search acronyms, or list colliding short forms
    Find(Find),

    /// Write the LaTeX acronym environment
    Glossary(Glossary),
}

impl Acronyms {
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self.command {
            AcronymCommand::Validate(command) => command.run(root),
            AcronymCommand::Find(command) => command.run(root),
            AcronymCommand::Glossary(command) => command.run(root),
        }
    }
}

fn load(root: &std::path::Path, collect_all: bool) -> anyhow::Result<Corpus<Acronym>> {
    let config = super::load_config(root, collect_all)?;
    super::load_corpus(root, config.validation)
}

/// The short form and key, then every long form by locale.
fn describe(acronym: &Acronym) -> String {
    let mut out = format!("{:<12} {}\n", acronym.short, format!("({})", acronym.key).key());
    for (locale, long) in &acronym.long {
        let _ = writeln!(out, "    {locale}: {long}");
    }
    out
}

/// Every group of acronyms sharing a short form, ignoring case.
fn duplicate_report(corpus: &Corpus<Acronym>, index: &ShortFormIndex) -> String {
    let mut out = String::new();
    let mut groups = 0;
    for (_, keys) in index.duplicates() {
        groups += 1;
        for acronym in keys.iter().filter_map(|key| corpus.get(key)) {
            out.push_str(&describe(acronym));
        }
        out.push('\n');
    }
    let _ = writeln!(out, "{groups} duplicate short forms");
    out
}

#[derive(Debug, Default, Parser)]
struct Validate {
    /// Validate every acronym and report all failures, instead of stopping at
    /// the first invalid one
    #[arg(long)]
    collect_all: bool,
}

impl Validate {
    #[instrument(level = "debug", skip(self))]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let corpus = load(&root, self.collect_all)?;
        let index = ShortFormIndex::build(corpus.iter());
        let duplicates = index.duplicates().count();

        println!(
            "{}",
            format!(
                "✓ Acronyms:    {} loaded, {} short forms",
                corpus.len(),
                index.len()
            )
            .success()
        );
        if duplicates == 0 {
            println!("✓ Duplicates:  none");
        } else {
            println!(
                "{}",
                format!("✗ Duplicates:  {duplicates} short forms used more than once").warning()
            );
            println!("  run 'bk acronyms find --duplicates' to list them");
        }
        Ok(())
    }
}

#[derive(Debug, Default, Args)]
#[group(required = true, multiple = false)]
struct Query {
    /// List every group of acronyms sharing a short form, ignoring case
    #[arg(long)]
    duplicates: bool,

    /// Search short forms
    #[arg(long, value_name = "PATTERN")]
    short: Option<String>,

    /// Search long forms in every language
    #[arg(long, value_name = "PATTERN")]
    long: Option<String>,

    /// Search descriptions, notes and reference links
    #[arg(long, value_name = "PATTERN")]
    notes: Option<String>,
}

#[derive(Debug, Default, Parser)]
struct Find {
    #[command(flatten)]
    query: Query,
}

impl Find {
    #[instrument(level = "debug", skip(self))]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let corpus = load(&root, false)?;
        let index = ShortFormIndex::build(corpus.iter());

        if self.query.duplicates {
            print!("{}", duplicate_report(&corpus, &index));
            return Ok(());
        }

        let (field, pattern) = match self.query {
            Query {
                short: Some(pattern),
                ..
            } => (SearchField::Short, pattern),
            Query {
                long: Some(pattern),
                ..
            } => (SearchField::Long, pattern),
            Query {
                notes: Some(pattern),
                ..
            } => (SearchField::Notes, pattern),
            Query { .. } => anyhow::bail!("nothing to search for"),
        };

        let found = index.search(corpus.entries(), field, &pattern);
        for acronym in &found {
            print!("{}", describe(acronym));
        }
        println!("\n{} acronyms found", found.len());
        Ok(())
    }
}

#[derive(Debug, Default, Parser)]
struct Glossary {
    /// Only include acronyms listed in this LaTeX usage log
    #[arg(long, value_name = "FILE")]
    usage_log: Option<PathBuf>,

    /// The name looked up in short-target and long-target overrides
    #[arg(long, value_name = "NAME")]
    target: Option<String>,

    /// Write the glossary to this file instead of stdout
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Validate every acronym and report all failures, instead of stopping at
    /// the first invalid one
    #[arg(long)]
    collect_all: bool,
}

impl Glossary {
    #[instrument(level = "debug", skip(self))]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let config = super::load_config(&root, self.collect_all)?;
        let corpus: Corpus<Acronym> = super::load_corpus(&root, config.validation)?;
        let index = ShortFormIndex::build(corpus.iter());

        let usage = match self.usage_log.as_ref().or(config.usage_log.as_ref()) {
            Some(path) => read_usage(path)?,
            None => UsageSet::default(),
        };
        let target = self.target.as_deref().unwrap_or(&config.glossary_target);

        let rendered = glossary(&index, corpus.entries(), &usage, target);
        match &self.output {
            Some(path) => {
                std::fs::write(path, &rendered).map_err(|e| {
                    anyhow::anyhow!("failed to write glossary to {}: {e}", path.display())
                })?;
                tracing::info!("wrote glossary to {}", path.display());
            }
            None => print!("{rendered}"),
        }
        Ok(())
    }
}
