use std::path::PathBuf;

use bibkeeper::{Record, domain::PersonIndex};
use clap::Parser;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Default, Parser)]
pub struct Validate {
    /// Validate every record and report all failures, instead of stopping at
    /// the first invalid one
    #[arg(long)]
    collect_all: bool,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

impl Validate {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let config = super::load_config(&root, self.collect_all)?;
        let corpus = super::load_corpus::<Record>(&root, config.validation)?;
        let people = PersonIndex::build(corpus.iter());

        if !self.quiet {
            println!(
                "{}",
                format!("✓ Records:     {} loaded, all valid", corpus.len()).success()
            );
            println!("✓ Directories: {}", corpus.directories().len());
            println!("✓ People:      {}", people.len());
        }
        Ok(())
    }
}
