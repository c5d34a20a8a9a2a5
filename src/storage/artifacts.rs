use std::path::Path;

use walkdir::WalkDir;

use crate::domain::{Artifact, ArtifactSource};

/// Finds artifacts in a directory tree mirroring the library's key layout.
///
/// For a record `talks/2019/summit`, candidates are the files directly inside
/// `<root>/talks/2019/` whose name starts with `summit` and has an extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactTree;

impl ArtifactSource for ArtifactTree {
    fn artifacts(&self, root: &Path, directory: &str, stem: &str) -> Vec<Artifact> {
        let search = root.join(directory);
        if !search.is_dir() {
            tracing::debug!("no artifact directory {}", search.display());
            return Vec::new();
        }

        WalkDir::new(&search)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(error) => {
                    tracing::warn!("skipping local links in {}: {error}", search.display());
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?;
                if !name.starts_with(stem) {
                    return None;
                }
                let (file_stem, extension) = name.rsplit_once('.')?;
                let relative = if directory.is_empty() {
                    name.to_string()
                } else {
                    format!("{directory}/{name}")
                };
                Some(Artifact {
                    relative,
                    stem: file_stem.to_string(),
                    extension: extension.to_string(),
                })
            })
            .collect()
    }
}
