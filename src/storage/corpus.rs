use std::{
    collections::{BTreeMap, HashMap},
    ffi::OsStr,
    fmt,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use nonempty::NonEmpty;
use walkdir::WalkDir;

use super::source::{SourceError, read_unit};
use crate::domain::{Entry, ValidationMode, Violation, schema::directory_of};

/// Every valid entry of one kind below a root directory, keyed and ordered by
/// load order.
///
/// Built in a single pass and read-only afterwards.
#[derive(Debug)]
pub struct Corpus<T> {
    entries: IndexMap<String, T>,
    sources: Vec<String>,
}

/// A source unit that failed validation.
#[derive(Debug)]
pub struct Rejected {
    /// The source file.
    pub path: PathBuf,
    /// The key the file declares.
    pub key: String,
    /// Every rule the unit violates.
    pub violations: NonEmpty<Violation>,
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.key, self.path.display())?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

/// Errors loading a corpus.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// The root could not be traversed.
    #[error("failed to read corpus directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// A source file could not be read.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// One or more source units failed validation.
    #[error("{}", invalid_summary(.noun, .rejected))]
    Invalid {
        /// What kind of entry was loaded.
        noun: &'static str,
        /// The failing units, in load order.
        rejected: NonEmpty<Rejected>,
    },
}

fn invalid_summary(noun: &str, rejected: &NonEmpty<Rejected>) -> String {
    const MAX_DISPLAY: usize = 5;

    let total = rejected.len();
    let plural = if total > 1 { "s" } else { "" };
    let keys: Vec<&str> = rejected
        .iter()
        .take(MAX_DISPLAY)
        .map(|rejected| rejected.key.as_str())
        .collect();
    let msg = keys.join(", ");

    if total <= MAX_DISPLAY {
        format!("found {total} invalid {noun}{plural}: {msg}")
    } else {
        format!(
            "found {total} invalid {noun}{plural}: {msg}... (and {} more)",
            total - MAX_DISPLAY
        )
    }
}

impl<T: Entry> Corpus<T> {
    /// Loads every `*.yaml` file below `root`, in sorted path order.
    ///
    /// Hidden files and directories are skipped.
    ///
    /// # Errors
    ///
    /// Fails immediately if the root cannot be traversed or a file cannot be
    /// read. Invalid units end the pass at the first failure under
    /// [`ValidationMode::FailFast`], or are all collected under
    /// [`ValidationMode::CollectAll`].
    pub fn load(root: &Path, mode: ValidationMode) -> Result<Self, CorpusError> {
        let mut entries = IndexMap::new();
        let mut sources = Vec::new();
        let mut origins: HashMap<String, PathBuf> = HashMap::new();
        let mut rejected = Vec::new();

        for path in collect_yaml_paths(root)? {
            tracing::debug!("processing {}", path.display());
            let unit = read_unit(root, &path)?;

            let mut result = T::from_unit(&unit);
            if let Some(first) = origins.get(&unit.key) {
                let duplicate = Violation::DuplicateKey {
                    first: first.clone(),
                };
                result = match result {
                    Ok(_) => Err(NonEmpty::new(duplicate)),
                    Err(mut violations) => {
                        violations.push(duplicate);
                        Err(violations)
                    }
                };
            }

            match result {
                Ok(entry) => {
                    origins.insert(unit.key.clone(), path.clone());
                    sources.push(unit.relative);
                    entries.insert(unit.key, entry);
                }
                Err(violations) => {
                    tracing::warn!("invalid {} {}", T::NOUN, unit.key);
                    rejected.push(Rejected {
                        path,
                        key: unit.key,
                        violations,
                    });
                    if mode == ValidationMode::FailFast {
                        break;
                    }
                }
            }
        }

        if let Some(rejected) = NonEmpty::from_vec(rejected) {
            return Err(CorpusError::Invalid {
                noun: T::NOUN,
                rejected,
            });
        }

        tracing::info!("loaded {} {}s from {}", entries.len(), T::NOUN, root.display());
        Ok(Self {
            entries,
            sources,
        })
    }
}

impl<T> Corpus<T> {
    /// The entry with `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    /// Every entry, in load order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// The entries keyed by their key, in load order.
    #[must_use]
    pub const fn entries(&self) -> &IndexMap<String, T> {
        &self.entries
    }

    /// The number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the corpus holds no entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source stems grouped by sub-directory, both relative to the root and
    /// sorted. Files directly in the root are not listed.
    #[must_use]
    pub fn directories(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut directories: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for relative in &self.sources {
            let directory = directory_of(relative);
            if directory.is_empty() {
                continue;
            }
            let stem = relative.strip_suffix(".yaml").unwrap_or(relative);
            directories.entry(directory).or_default().push(stem);
        }
        for stems in directories.values_mut() {
            stems.sort_unstable();
        }
        directories
    }
}

fn collect_yaml_paths(root: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()))
        .filter(|entry| match entry {
            Ok(entry) => {
                entry.file_type().is_file() && entry.path().extension() == Some(OsStr::new("yaml"))
            }
            Err(_) => true,
        })
        .map(|entry| entry.map(walkdir::DirEntry::into_path))
        .collect()
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|name| name.starts_with('.'))
}
