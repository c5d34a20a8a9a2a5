use std::{fmt::Write as _, path::PathBuf};

use bibkeeper::{
    Record,
    domain::{Name, PersonIndex},
};
use clap::Parser;
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Default, Parser)]
pub struct Authors {
    /// Show the records of one person, written as in the sources
    /// (`"Last, First"`)
    #[arg(long, value_name = "NAME")]
    person: Option<String>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Authors {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let config = super::load_config(&root, false)?;
        let corpus = super::load_corpus::<Record>(&root, config.validation)?;
        let people = PersonIndex::build(corpus.iter());

        let report = match &self.person {
            Some(person) => {
                let name = Name::new(person.as_str());
                let Some(keys) = people.records(&name) else {
                    anyhow::bail!("no record lists '{person}'");
                };
                self.person_report(&name, keys)?
            }
            None => self.people_report(&people, is_narrow())?,
        };
        print!("{report}");
        Ok(())
    }

    fn person_report(&self, name: &Name, keys: &[String]) -> anyhow::Result<String> {
        let mut out = String::new();
        match self.output {
            OutputFormat::Table => {
                writeln!(out, "{} ({})", name.display_form(), keys.len())?;
                for key in keys {
                    writeln!(out, "  {}", key.key())?;
                }
            }
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "name": name,
                    "display": name.display_form(),
                    "records": keys,
                });
                writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
            }
        }
        Ok(out)
    }

    fn people_report(&self, people: &PersonIndex, narrow: bool) -> anyhow::Result<String> {
        let sorted = people.sorted();
        let mut out = String::new();
        match self.output {
            OutputFormat::Table => {
                let width = if narrow {
                    0
                } else {
                    sorted
                        .iter()
                        .map(|(name, _)| name.as_str().chars().count())
                        .max()
                        .unwrap_or(0)
                };
                for (name, keys) in &sorted {
                    writeln!(
                        out,
                        "{:<width$}  {}",
                        name.as_str(),
                        keys.len().to_string().dim()
                    )?;
                }
                writeln!(out, "\n{} people", sorted.len())?;
            }
            OutputFormat::Json => {
                let entries: Vec<_> = sorted
                    .iter()
                    .map(|(name, keys)| {
                        serde_json::json!({
                            "name": name,
                            "display": name.display_form(),
                            "count": keys.len(),
                            "records": keys,
                        })
                    })
                    .collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
            }
        }
        Ok(out)
    }
}
