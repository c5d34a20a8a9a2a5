use std::{
    io,
    path::{Component, Path, PathBuf},
};

use serde_yaml::{Mapping, Value};

use crate::domain::SourceUnit;

/// Errors reading a YAML source file into a [`SourceUnit`].
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The file could not be read.
    #[error("could not open file {}: {source}", path.display())]
    Io {
        /// The source file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The file is not valid YAML.
    #[error("could not parse {}: {source}", path.display())]
    Yaml {
        /// The source file.
        path: PathBuf,
        /// The underlying error.
        source: serde_yaml::Error,
    },

    /// The document does not have exactly one top-level key.
    #[error("{} must hold exactly one top-level key, found {found}", path.display())]
    KeyCount {
        /// The source file.
        path: PathBuf,
        /// The number of top-level keys.
        found: usize,
    },

    /// The top-level key is not a string, or its value is not a mapping.
    #[error("{} must map a text key to a mapping of fields", path.display())]
    Shape {
        /// The source file.
        path: PathBuf,
    },

    /// The file is not below the corpus root.
    #[error("{} is outside the corpus root", path.display())]
    OutsideRoot {
        /// The source file.
        path: PathBuf,
    },
}

/// Reads one source file below `root`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or does not hold a
/// single key mapping to a field tree.
pub fn read_unit(root: &Path, path: &Path) -> Result<SourceUnit, SourceError> {
    let relative = relative_path(root, path).ok_or_else(|| SourceError::OutsideRoot {
        path: path.to_path_buf(),
    })?;

    let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Mapping = serde_yaml::from_str(&content).map_err(|source| SourceError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    if document.len() != 1 {
        return Err(SourceError::KeyCount {
            path: path.to_path_buf(),
            found: document.len(),
        });
    }

    match document.into_iter().next() {
        Some((Value::String(key), Value::Mapping(tree))) => Ok(SourceUnit {
            path: path.to_path_buf(),
            relative,
            key,
            tree,
        }),
        _ => Err(SourceError::Shape {
            path: path.to_path_buf(),
        }),
    }
}

/// `path` relative to `root`, `/`-separated.
pub(crate) fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative
        .components()
        .map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    parts.map(|parts| parts.join("/"))
}
