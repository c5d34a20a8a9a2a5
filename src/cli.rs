use std::path::{Path, PathBuf};

mod acronyms;
mod authors;
mod init;
mod render;
mod terminal;
mod validate;

use acronyms::Acronyms;
use authors::Authors;
use bibkeeper::{
    Config, Corpus,
    domain::{Entry, ValidationMode},
    storage::CorpusError,
};
use clap::ArgAction;
use init::Init;
use render::Render;
use terminal::Colorize;
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the library or acronym directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.command.run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Write a starting bibkeeper.toml into the root
    Init(Init),

    /// Load and validate every record in the library
    Validate(Validate),

    /// Validate the library, then write fragments, bibliography files and
    /// directory indexes
    Render(Render),

    /// List contributors and the records they appear in
    Authors(Authors),

    /// Validate, search and render acronyms
    Acronyms(Acronyms),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Init(command) => command.run(root)?,
            Self::Validate(command) => command.run(root)?,
            Self::Render(command) => command.run(root)?,
            Self::Authors(command) => command.run(root)?,
            Self::Acronyms(command) => command.run(root)?,
        }
        Ok(())
    }
}

/// Reads `bibkeeper.toml` from `root`, switching to collect-all validation if
/// requested on the command line.
fn load_config(root: &Path, collect_all: bool) -> anyhow::Result<Config> {
    let mut config = Config::discover(root)?;
    if collect_all {
        config.validation = ValidationMode::CollectAll;
    }
    Ok(config)
}

/// Loads a corpus, printing every rejected unit before failing.
fn load_corpus<T: Entry>(root: &Path, mode: ValidationMode) -> anyhow::Result<Corpus<T>> {
    Corpus::load(root, mode).map_err(|error| {
        if let CorpusError::Invalid { rejected, .. } = &error {
            for rejected in rejected {
                eprintln!("{}", format!("✗ {rejected}").warning());
            }
        }
        error.into()
    })
}
