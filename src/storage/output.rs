use std::{
    io,
    path::{Path, PathBuf},
};

use crate::domain::{Record, Rendered, document::ENTRIES_INDEX};

/// A file that could not be written.
#[derive(Debug, thiserror::Error)]
#[error("could not write {}: {source}", path.display())]
pub struct OutputError {
    /// The file that failed.
    pub path: PathBuf,
    /// The underlying error.
    pub source: io::Error,
}

/// Decides where rendered outputs go and writes them.
///
/// Without an output root, files are written next to their sources. With one,
/// they are written to `<output root>/<key directory>/`.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    corpus_root: PathBuf,
    output_root: Option<PathBuf>,
}

impl OutputLayout {
    /// Creates a layout for a corpus at `corpus_root`.
    #[must_use]
    pub fn new(corpus_root: impl Into<PathBuf>, output_root: Option<PathBuf>) -> Self {
        Self {
            corpus_root: corpus_root.into(),
            output_root,
        }
    }

    /// The directory outputs for `record` are written to.
    #[must_use]
    pub fn directory(&self, record: &Record) -> PathBuf {
        match &self.output_root {
            Some(root) => root.join(record.key_directory()),
            None => record
                .src_file
                .parent()
                .map_or_else(|| self.corpus_root.clone(), Path::to_path_buf),
        }
    }

    /// The AsciiDoc fragment path for `record`.
    #[must_use]
    pub fn fragment_path(&self, record: &Record) -> PathBuf {
        self.directory(record).join(format!("{}.adoc", record.stem))
    }

    /// The BiBTeX path for `record`.
    #[must_use]
    pub fn bibtex_path(&self, record: &Record) -> PathBuf {
        self.directory(record).join(format!("{}.bib", record.stem))
    }

    /// The Biblatex path for `record`.
    #[must_use]
    pub fn biblatex_path(&self, record: &Record) -> PathBuf {
        self.directory(record)
            .join(format!("{}-biblatex.bib", record.stem))
    }

    /// Writes every output in `rendered`, returning the number of files.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created or a file cannot be
    /// written.
    pub fn write(&self, record: &Record, rendered: &Rendered) -> Result<usize, OutputError> {
        let outputs = [
            (self.fragment_path(record), &rendered.fragment),
            (self.bibtex_path(record), &rendered.bibtex),
            (self.biblatex_path(record), &rendered.biblatex),
        ];

        let mut written = 0;
        for (path, content) in outputs {
            if let Some(content) = content {
                write_file(&path, content)?;
                written += 1;
            }
        }
        Ok(written)
    }

    /// Writes a directory index for `directory`, relative to the corpus root.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_index(&self, directory: &str, content: &str) -> Result<PathBuf, OutputError> {
        let root = self.output_root.as_ref().unwrap_or(&self.corpus_root);
        let path = root.join(directory).join(ENTRIES_INDEX);
        write_file(&path, content)?;
        Ok(path)
    }
}

/// Writes `content` followed by a newline, creating parent directories.
fn write_file(path: &Path, content: &str) -> Result<(), OutputError> {
    let error = |source| OutputError {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(error)?;
    }
    std::fs::write(path, format!("{content}\n")).map_err(error)?;
    tracing::debug!("wrote file: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::links::tests::record;

    #[test]
    fn outputs_next_to_source_by_default() {
        let layout = OutputLayout::new("/library", None);
        let record = record();

        assert_eq!(
            layout.fragment_path(&record),
            PathBuf::from("/library/talks/2019/ossummit.adoc")
        );
        assert_eq!(
            layout.biblatex_path(&record),
            PathBuf::from("/library/talks/2019/ossummit-biblatex.bib")
        );
    }

    #[test]
    fn output_root_mirrors_key_directory() {
        let layout = OutputLayout::new("/library", Some(PathBuf::from("/site")));
        assert_eq!(
            layout.bibtex_path(&record()),
            PathBuf::from("/site/talks/2019/ossummit.bib")
        );
    }

    #[test]
    fn writes_enabled_outputs_with_trailing_newline() {
        let out = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new("/library", Some(out.path().to_path_buf()));
        let record = record();
        let rendered = Rendered {
            key: record.key.clone(),
            fragment: Some("fragment".to_string()),
            bibtex: None,
            biblatex: Some("@misc{x}".to_string()),
        };

        assert_eq!(layout.write(&record, &rendered).unwrap(), 2);

        let fragment = std::fs::read_to_string(out.path().join("talks/2019/ossummit.adoc")).unwrap();
        assert_eq!(fragment, "fragment\n");
        assert!(!out.path().join("talks/2019/ossummit.bib").exists());
        assert!(out.path().join("talks/2019/ossummit-biblatex.bib").exists());
    }

    #[test]
    fn index_goes_under_output_root() {
        let out = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new("/library", Some(out.path().to_path_buf()));

        let path = layout.write_index("talks/2019", "index").unwrap();

        assert_eq!(path, out.path().join("talks/2019").join(ENTRIES_INDEX));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "index\n");
    }
}
