use std::path::PathBuf;

use bibkeeper::{
    Config, Record,
    domain::{Rendered, Targets, entries_index},
    storage::{ArtifactTree, OutputLayout},
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Default, Parser)]
pub struct Render {
    /// Write the AsciiDoc fragment of every record
    #[arg(long)]
    adoc: bool,

    /// Write the BiBTeX entry of every record that has one
    #[arg(long)]
    bibtex: bool,

    /// Write the Biblatex entry of every record that has one
    #[arg(long)]
    biblatex: bool,

    /// Enable every target
    #[arg(long, conflicts_with_all = ["adoc", "bibtex", "biblatex"])]
    all: bool,

    /// Write outputs below this directory instead of next to the sources
    #[arg(long, value_name = "DIR")]
    output_root: Option<PathBuf>,

    /// Prefix for generated links to the published sources
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Link artifacts found under the artifacts root
    #[arg(long)]
    local_links: bool,

    /// Directory holding PDFs, slides and other artifacts
    #[arg(long, value_name = "DIR")]
    artifacts_root: Option<PathBuf>,

    /// Validate every record and report all failures, instead of stopping at
    /// the first invalid one
    #[arg(long)]
    collect_all: bool,
}

impl Render {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let config = self.apply(super::load_config(&root, self.collect_all)?);

        if !config.targets.any() {
            anyhow::bail!("no output target enabled, pass --adoc, --bibtex, --biblatex or --all");
        }
        if config.local_links && config.artifacts_root.is_none() {
            anyhow::bail!("local links are enabled but no artifacts root is configured");
        }

        let corpus = super::load_corpus::<Record>(&root, config.validation)?;
        let layout = OutputLayout::new(&root, config.output_root.clone());

        let records: Vec<&Record> = corpus.iter().collect();
        let rendered: Vec<Rendered> = records
            .par_iter()
            .map(|record| Rendered::new(record, &config, &ArtifactTree))
            .collect();

        let progress = ProgressBar::new(records.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
            progress.set_style(style);
        }

        let mut files = 0;
        for (record, rendered) in records.iter().zip(&rendered) {
            progress.set_message(record.key.clone());
            files += layout.write(record, rendered)?;
            progress.inc(1);
        }
        progress.finish_and_clear();

        let mut indexes = 0;
        if config.targets.adoc {
            for (directory, stems) in corpus.directories() {
                let path = layout.write_index(directory, &entries_index(&stems))?;
                tracing::info!("wrote {} entries to {}", stems.len(), path.display());
                indexes += 1;
            }
        }

        println!(
            "{}",
            format!(
                "✓ Rendered {} records: {files} files, {indexes} directory indexes",
                records.len()
            )
            .success()
        );
        Ok(())
    }

    /// Applies command-line overrides on top of the file configuration.
    fn apply(&self, mut config: Config) -> Config {
        if self.all {
            config.targets = Targets::ALL;
        } else {
            config.targets.adoc |= self.adoc;
            config.targets.bibtex |= self.bibtex;
            config.targets.biblatex |= self.biblatex;
        }
        config.local_links |= self.local_links;
        if let Some(output_root) = &self.output_root {
            config.output_root = Some(output_root.clone());
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = Some(base_url.clone());
        }
        if let Some(artifacts_root) = &self.artifacts_root {
            config.artifacts_root = Some(artifacts_root.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::cli::tests::write;

    const TALK: &str = "talks/2019/summit:\n  title: Hello\n  type: keynote\n  year: 2019\n  presenters:\n    - Doe, Jane\n  bibtex: \"@misc{summit}\"\n";

    #[test]
    fn renders_next_to_sources() {
        let tmp = tempdir().unwrap();
        write(tmp.path(), "talks/2019/summit.yaml", TALK);

        Render {
            all: true,
            ..Render::default()
        }
        .run(tmp.path().to_path_buf())
        .unwrap();

        let dir = tmp.path().join("talks/2019");
        let fragment = std::fs::read_to_string(dir.join("summit.adoc")).unwrap();
        assert!(fragment.contains("*Jane Doe*: _Hello_, 2019\n"));
        assert_eq!(
            std::fs::read_to_string(dir.join("summit.bib")).unwrap(),
            "@misc{summit}\n"
        );
        assert!(!dir.join("summit-biblatex.bib").exists());
        assert!(dir.join("_entries.adoc").exists());
    }

    #[test]
    fn output_root_mirrors_keys() {
        let tmp = tempdir().unwrap();
        let out = tempdir().unwrap();
        write(tmp.path(), "talks/2019/summit.yaml", TALK);

        Render {
            bibtex: true,
            output_root: Some(out.path().to_path_buf()),
            ..Render::default()
        }
        .run(tmp.path().to_path_buf())
        .unwrap();

        assert!(out.path().join("talks/2019/summit.bib").exists());
        assert!(!out.path().join("talks/2019/summit.adoc").exists());
        assert!(!out.path().join("talks/2019/_entries.adoc").exists());
    }

    #[test]
    fn local_links_without_root_is_rejected() {
        let tmp = tempdir().unwrap();
        write(tmp.path(), "talks/2019/summit.yaml", TALK);

        let error = Render {
            adoc: true,
            local_links: true,
            ..Render::default()
        }
        .run(tmp.path().to_path_buf())
        .unwrap_err();
        assert!(error.to_string().contains("artifacts root"));
    }

    #[test]
    fn no_target_is_rejected() {
        let tmp = tempdir().unwrap();
        assert!(Render::default().run(tmp.path().to_path_buf()).is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let render = Render {
            base_url: Some("https://lib.example".to_string()),
            adoc: true,
            ..Render::default()
        };
        let file = Config {
            base_url: Some("https://old.example".to_string()),
            targets: Targets {
                bibtex: true,
                ..Targets::default()
            },
            ..Config::default()
        };

        let config = render.apply(file);
        assert_eq!(config.base_url.as_deref(), Some("https://lib.example"));
        assert!(config.targets.adoc && config.targets.bibtex);
    }
}
