use std::path::{Path, PathBuf};

use bibkeeper::{
    Config,
    domain::{CONFIG_FILE, Targets, ValidationMode},
};
use clap::Parser;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Default, Parser)]
pub struct Init {
    /// Enable every output target
    #[arg(long)]
    all: bool,

    /// Prefix for generated links to the published sources
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Write outputs below this directory, relative to the root
    #[arg(long, value_name = "DIR")]
    output_root: Option<PathBuf>,

    /// Link artifacts found under this directory
    #[arg(long, value_name = "DIR")]
    artifacts_root: Option<PathBuf>,

    /// Report every invalid entry instead of stopping at the first one
    #[arg(long)]
    collect_all: bool,

    /// Overwrite an existing configuration
    #[arg(long)]
    force: bool,
}

impl Init {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let path = root.join(CONFIG_FILE);
        if path.exists() && !self.force {
            anyhow::bail!(
                "{} already exists, pass --force to overwrite it",
                path.display()
            );
        }

        std::fs::create_dir_all(&root)
            .map_err(|e| anyhow::anyhow!("failed to create {}: {e}", root.display()))?;
        self.config().save(&path)?;

        println!("{}", format!("✓ Created {}", path.display()).success());
        print_next_steps(&root);
        Ok(())
    }

    fn config(&self) -> Config {
        Config {
            targets: if self.all {
                Targets::ALL
            } else {
                Targets {
                    adoc: true,
                    ..Targets::default()
                }
            },
            base_url: self.base_url.clone(),
            output_root: self.output_root.clone(),
            local_links: self.artifacts_root.is_some(),
            artifacts_root: self.artifacts_root.clone(),
            validation: if self.collect_all {
                ValidationMode::CollectAll
            } else {
                ValidationMode::FailFast
            },
            ..Config::default()
        }
    }
}

fn print_next_steps(root: &Path) {
    println!();
    println!("Next steps:");
    println!("  bk --root {} validate", root.display());
    println!("  bk --root {} render", root.display());
}
