use std::{
    io,
    path::{Path, PathBuf},
};

use crate::domain::{UsageSet, usage::SIBLING_FILE};

/// A usage log that could not be read.
#[derive(Debug, thiserror::Error)]
#[error("could not read usage log {}: {source}", path.display())]
pub struct UsageLogError {
    /// The file that failed.
    pub path: PathBuf,
    /// The underlying error.
    pub source: io::Error,
}

/// Reads the usage log at `path`, merged with the `add-acronyms.txt` file next
/// to it if there is one.
///
/// # Errors
///
/// Returns an error if the log or an existing sibling file cannot be read.
pub fn read_usage(path: &Path) -> Result<UsageSet, UsageLogError> {
    let mut usage = UsageSet::default();
    usage.extend_from_lines(read(path)?.lines());

    let sibling = path
        .parent()
        .map_or_else(|| PathBuf::from(SIBLING_FILE), |dir| dir.join(SIBLING_FILE));
    if sibling.is_file() {
        usage.extend_from_lines(read(&sibling)?.lines());
    } else {
        tracing::debug!("no {} next to {}", SIBLING_FILE, path.display());
    }

    tracing::info!("{} acronyms used according to {}", usage.len(), path.display());
    Ok(usage)
}

fn read(path: &Path) -> Result<String, UsageLogError> {
    std::fs::read_to_string(path).map_err(|source| UsageLogError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_sibling_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("paper.aux");
        std::fs::write(&log, "\\relax\n\\acronymused{it:api}\n").unwrap();
        std::fs::write(
            dir.path().join(SIBLING_FILE),
            "\\acronymused{net:tcp}\n\\acronymused{it:api}\n",
        )
        .unwrap();

        let usage = read_usage(&log).unwrap();

        assert_eq!(usage.labels().collect::<Vec<_>>(), ["it:api", "net:tcp"]);
    }

    #[test]
    fn sibling_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("paper.aux");
        std::fs::write(&log, "\\acronymused{it:api}\n").unwrap();

        assert_eq!(read_usage(&log).unwrap().len(), 1);
    }

    #[test]
    fn missing_log_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_usage(&dir.path().join("paper.aux")).is_err());
    }
}
