//! Rendering of records into AsciiDoc fragments and bibliography outputs.

use std::fmt::Write as _;

use super::{
    config::{Config, Targets},
    links::{ArtifactSource, LinkBlock},
    name::{Role, resolve},
    record::{Classification, Record},
};

/// The comment block opening every generated AsciiDoc file.
pub const BANNER: &str = "//\n// This file was generated by bibkeeper from the library sources.\n// Edit the YAML source instead.\n//\n\n";

/// The file name of a directory index.
pub const ENTRIES_INDEX: &str = "_entries.adoc";

/// The lead in front of a record's title.
///
/// Its shape depends on the record's classification:
///
/// - presenter types name their presenter, but only if there is exactly one
/// - panels name the chair
/// - movies have no lead
/// - everything else names the first editor, or failing that the first
///   author, collapsing further names into `et al.`
#[must_use]
pub fn byline(record: &Record) -> String {
    match record.record_type.classification() {
        Classification::Presenter => match resolve(&record.presenters).as_slice() {
            [presenter] => format!("*{presenter}*: "),
            _ => String::new(),
        },
        Classification::Panel => record
            .chair
            .as_ref()
            .map(|chair| format!("*{}* (chair): ", chair.display_form()))
            .unwrap_or_default(),
        Classification::Movie => String::new(),
        Classification::Publication => {
            let editors = resolve(&record.editors);
            let authors = resolve(&record.authors);
            match (editors.as_slice(), authors.as_slice()) {
                ([editor], _) => format!("*{editor}* (ed): "),
                ([editor, ..], _) => format!("*{editor}* et al.: "),
                ([], [author]) => format!("*{author}*: "),
                ([], [author, ..]) => format!("*{author}* et al.: "),
                ([], []) => String::new(),
            }
        }
    }
}

/// Renders the AsciiDoc fragment for `record`, without a trailing newline.
///
/// The output is a pure function of its inputs.
pub fn fragment(record: &Record, config: &Config, artifacts: &dyn ArtifactSource) -> String {
    let mut out = String::from(BANNER);
    out.push_str(&byline(record));

    out.push('_');
    out.push_str(&record.title);
    if let Some(addon) = &record.title_addon {
        out.push_str(" - ");
        out.push_str(addon);
    }
    let _ = write!(out, "_, {}\n\n", record.year);

    for role in Role::ALL {
        let names = resolve(record.contributors(role));
        if !names.is_empty() {
            let _ = writeln!(out, "* {}: {}", role.label(names.len()), names.join(", "));
        }
    }

    if let Some(adoc) = &record.adoc {
        out.push_str(adoc);
    }

    out.push_str(&LinkBlock::compose(record, config, artifacts).render());
    out
}

/// The outputs produced for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// The record key.
    pub key: String,
    /// The AsciiDoc fragment, if that target is enabled.
    pub fragment: Option<String>,
    /// The BiBTeX entry, if enabled and present.
    pub bibtex: Option<String>,
    /// The Biblatex entry, if enabled and present.
    pub biblatex: Option<String>,
}

impl Rendered {
    /// Renders every enabled target for `record`.
    pub fn new(record: &Record, config: &Config, artifacts: &dyn ArtifactSource) -> Self {
        let Targets {
            adoc,
            bibtex,
            biblatex,
        } = config.targets;

        Self {
            key: record.key.clone(),
            fragment: adoc.then(|| fragment(record, config, artifacts)),
            bibtex: record.bibtex.clone().filter(|text| bibtex && !text.is_empty()),
            biblatex: record
                .biblatex
                .clone()
                .filter(|text| biblatex && !text.is_empty()),
        }
    }

    /// Whether nothing is to be written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fragment.is_none() && self.bibtex.is_none() && self.biblatex.is_none()
    }
}

/// Renders a directory index including the fragments of `stems`.
///
/// `stems` are source paths relative to the library root, without extension.
#[must_use]
pub fn entries_index<S: AsRef<str>>(stems: &[S]) -> String {
    let mut out = String::from(BANNER);
    out.push_str("[cols=\"a\", grid=rows, frame=none, %autowidth.stretch]\n|===\n");
    for stem in stems {
        let _ = writeln!(out, "|include::{{library-adoc}}/{}.adoc[]", stem.as_ref());
    }
    out.push_str("|===\n");
    out
}
