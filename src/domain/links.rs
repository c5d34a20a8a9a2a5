//! Composition of a record's link block.
//!
//! Up to three groups are merged, always in this order: the record's declared
//! `urls`, links generated from the configured base URL, and artifacts found
//! on disk. Empty groups are dropped before layout, so they never take a
//! separator slot.

use std::path::Path;

use super::{config::Config, record::Record, schema::directory_of};

/// The heading that opens the first non-empty group.
pub const LINKS_HEADING: &str = "* Links:";

/// The glyph that opens every later group.
pub const GROUP_SEPARATOR: &str = "    ┃ ";

const GENERATED_LABEL: &str = "skb:";
const LOCAL_LABEL: &str = "local:";

/// A file found next to a record in the artifacts tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the artifacts root, `/`-separated.
    pub relative: String,
    /// File name without its final extension.
    pub stem: String,
    /// The final extension, without the dot.
    pub extension: String,
}

impl Artifact {
    /// The link tag: upper-cased extension, plus whatever the file stem adds
    /// to `record_stem` after one separator character.
    #[must_use]
    pub fn tag(&self, record_stem: &str) -> String {
        let extension = self.extension.to_uppercase();
        match self.stem.get(record_stem.len() + 1..) {
            Some(suffix) if !suffix.is_empty() && self.stem.starts_with(record_stem) => {
                format!("{extension}: {suffix}")
            }
            _ => extension,
        }
    }
}

/// Finds artifacts belonging to a record.
pub trait ArtifactSource {
    /// Artifacts in `directory` (relative to the artifacts root) whose file
    /// name starts with `stem`, in a stable order.
    fn artifacts(&self, root: &Path, directory: &str, stem: &str) -> Vec<Artifact>;
}

/// An [`ArtifactSource`] that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoArtifacts;

impl ArtifactSource for NoArtifacts {
    fn artifacts(&self, _root: &Path, _directory: &str, _stem: &str) -> Vec<Artifact> {
        Vec::new()
    }
}

/// One rendered link: `<target>[<tag>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// The link target, including any AsciiDoc macro prefix.
    pub target: String,
    /// The visible text.
    pub tag: String,
}

impl Link {
    fn new(target: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            tag: tag.into(),
        }
    }
}

/// Where a group of links came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The record's own `urls`.
    Declared,
    /// Built from the configured base URL.
    Generated,
    /// Found under the artifacts root.
    Local,
}

/// A non-empty, labelled set of links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkGroup {
    /// Where the links came from.
    pub origin: Origin,
    /// The links, in output order.
    pub links: Vec<Link>,
}

/// The composed link groups of one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkBlock {
    groups: Vec<LinkGroup>,
}

impl LinkBlock {
    /// Composes the link block for `record`.
    ///
    /// The generated group needs a non-blank base URL. The local group needs
    /// local links enabled and an artifacts root.
    pub fn compose(record: &Record, config: &Config, artifacts: &dyn ArtifactSource) -> Self {
        let mut block = Self::default();

        block.push(
            Origin::Declared,
            record
                .urls
                .iter()
                .map(|(tag, url)| Link::new(format!("link:{url}"), tag))
                .collect(),
        );

        let base_url = config.base_url.as_deref().filter(|url| !url.trim().is_empty());
        if let Some(base_url) = base_url {
            block.push(Origin::Generated, generated(record, base_url));
        }

        if let Some(root) = config.local_artifacts() {
            let found = artifacts.artifacts(root, record.key_directory(), &record.stem);
            tracing::trace!("{} artifacts for {}", found.len(), record.key);
            block.push(
                Origin::Local,
                found
                    .iter()
                    .map(|artifact| {
                        Link::new(
                            format!("link:{{library-home}}/{}", artifact.relative),
                            artifact.tag(&record.stem),
                        )
                    })
                    .collect(),
            );
        }

        block
    }

    fn push(&mut self, origin: Origin, links: Vec<Link>) {
        if !links.is_empty() {
            self.groups.push(LinkGroup { origin, links });
        }
    }

    /// The non-empty groups in output order.
    #[must_use]
    pub fn groups(&self) -> &[LinkGroup] {
        &self.groups
    }

    /// Whether no group has any link.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Lays the groups out as AsciiDoc. Empty blocks render as nothing.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (position, group) in self.groups.iter().enumerate() {
            if position == 0 {
                out.push_str(LINKS_HEADING);
                out.push_str("\n      ");
            } else {
                out.push_str(GROUP_SEPARATOR);
            }

            let links: Vec<String> = group
                .links
                .iter()
                .map(|link| format!("{}[{}]", link.target, link.tag))
                .collect();
            match group.origin {
                Origin::Declared => out.push_str(&links.join(",\n      ")),
                Origin::Generated => {
                    out.push_str(GENERATED_LABEL);
                    out.push_str("\n        ");
                    out.push_str(&links.join(",\n        "));
                }
                Origin::Local => {
                    out.push_str(LOCAL_LABEL);
                    out.push_str("\n        ");
                    out.push_str(&links.join(",\n        "));
                }
            }
            out.push('\n');
        }
        out
    }
}

fn generated(record: &Record, base_url: &str) -> Vec<Link> {
    let base = base_url.trim_end_matches('/');
    let prefix = match directory_of(&record.key) {
        "" => format!("{base}/{}", record.stem),
        directory => format!("{base}/{directory}/{}", record.stem),
    };

    let mut links = vec![Link::new(format!("{prefix}.yaml"), "yaml src")];
    if record.bibtex.is_some() {
        links.push(Link::new(format!("{prefix}.bib"), "BiBTeX"));
    }
    if record.biblatex.is_some() {
        links.push(Link::new(format!("{prefix}-biblatex.bib"), "Biblatex"));
    }
    links
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;

    use indexmap::IndexMap;

    use super::*;
    use crate::domain::record::RecordType;

    pub(crate) fn record() -> Record {
        Record {
            key: "talks/2019/ossummit".to_string(),
            title: "Building Things".to_string(),
            title_addon: None,
            record_type: RecordType::Presentation,
            year: "2019".to_string(),
            presenters: Vec::new(),
            authors: Vec::new(),
            editors: Vec::new(),
            panelists: Vec::new(),
            chair: None,
            urls: IndexMap::new(),
            adoc: None,
            bibtex: None,
            biblatex: None,
            src_file: PathBuf::from("/library/talks/2019/ossummit.yaml"),
            stem: "ossummit".to_string(),
        }
    }

    struct Fixed(Vec<&'static str>);

    impl ArtifactSource for Fixed {
        fn artifacts(&self, _root: &Path, directory: &str, _stem: &str) -> Vec<Artifact> {
            self.0
                .iter()
                .map(|name| {
                    let (stem, extension) = name.rsplit_once('.').unwrap();
                    Artifact {
                        relative: format!("{directory}/{name}"),
                        stem: stem.to_string(),
                        extension: extension.to_string(),
                    }
                })
                .collect()
        }
    }

    fn with_urls() -> Record {
        let mut record = record();
        record
            .urls
            .insert("video".to_string(), "https://v.example/1".to_string());
        record
            .urls
            .insert("slides".to_string(), "https://s.example/1".to_string());
        record
    }

    #[test]
    fn declared_links_only() {
        let block = LinkBlock::compose(&with_urls(), &Config::default(), &NoArtifacts);

        assert_eq!(
            block.render(),
            "* Links:\n      link:https://v.example/1[video],\n      link:https://s.example/1[slides]\n"
        );
    }

    #[test]
    fn base_url_appends_separated_group() {
        let mut record = with_urls();
        record.bibtex = Some("@misc{x}".to_string());
        let config = Config {
            base_url: Some("https://lib.example/".to_string()),
            ..Config::default()
        };

        let rendered = LinkBlock::compose(&record, &config, &NoArtifacts).render();

        assert_eq!(rendered.matches(LINKS_HEADING).count(), 1);
        assert_eq!(
            rendered,
            "* Links:\n      link:https://v.example/1[video],\n      link:https://s.example/1[slides]\n\
             \x20   ┃ skb:\n        https://lib.example/talks/2019/ossummit.yaml[yaml src],\n        \
             https://lib.example/talks/2019/ossummit.bib[BiBTeX]\n"
        );
    }

    #[test]
    fn empty_declared_group_takes_no_separator() {
        let config = Config {
            base_url: Some("https://lib.example".to_string()),
            ..Config::default()
        };

        let rendered = LinkBlock::compose(&record(), &config, &NoArtifacts).render();

        assert!(rendered.starts_with("* Links:\n      skb:\n"));
        assert!(!rendered.contains(GROUP_SEPARATOR));
    }

    #[test]
    fn blank_base_url_generates_nothing() {
        for blank in ["", "  "] {
            let config = Config {
                base_url: Some(blank.to_string()),
                ..Config::default()
            };
            let block = LinkBlock::compose(&record(), &config, &NoArtifacts);
            assert!(block.is_empty());
            assert_eq!(block.render(), "");
        }
    }

    #[test]
    fn local_group_needs_flag_and_root() {
        let artifacts = Fixed(vec!["ossummit.pdf"]);
        let flag_only = Config {
            local_links: true,
            ..Config::default()
        };
        assert!(LinkBlock::compose(&record(), &flag_only, &artifacts).is_empty());

        let both = Config {
            local_links: true,
            artifacts_root: Some(PathBuf::from("/srv/library")),
            ..Config::default()
        };
        assert_eq!(
            LinkBlock::compose(&record(), &both, &artifacts).render(),
            "* Links:\n      local:\n        link:{library-home}/talks/2019/ossummit.pdf[PDF]\n"
        );
    }

    #[test]
    fn all_three_groups_in_fixed_order() {
        let mut record = with_urls();
        record.biblatex = Some("@misc{x}".to_string());
        let config = Config {
            base_url: Some("https://lib.example".to_string()),
            local_links: true,
            artifacts_root: Some(PathBuf::from("/srv/library")),
            ..Config::default()
        };
        let artifacts = Fixed(vec!["ossummit.pdf", "ossummit-slides.pdf"]);

        let block = LinkBlock::compose(&record, &config, &artifacts);
        let origins: Vec<Origin> = block.groups().iter().map(|group| group.origin).collect();
        assert_eq!(origins, [Origin::Declared, Origin::Generated, Origin::Local]);

        let rendered = block.render();
        assert_eq!(rendered.matches(GROUP_SEPARATOR).count(), 2);
        assert!(rendered.contains("ossummit-biblatex.bib[Biblatex]"));
        assert!(rendered.contains("ossummit-slides.pdf[PDF: slides]"));
    }

    #[test]
    fn artifact_tag_suffix() {
        let artifact = |stem: &str| Artifact {
            relative: String::new(),
            stem: stem.to_string(),
            extension: "mp4".to_string(),
        };
        assert_eq!(artifact("talk").tag("talk"), "MP4");
        assert_eq!(artifact("talk-demo").tag("talk"), "MP4: demo");
        assert_eq!(artifact("talk-").tag("talk"), "MP4");
    }
}
