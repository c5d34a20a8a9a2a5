//! Bibliographic and presentation records.

use std::{fmt, path::PathBuf};

use indexmap::IndexMap;
use nonempty::NonEmpty;

use super::{
    name::{Name, Role},
    schema::{Entry, Fields, SourceUnit, Violation},
};

/// The declared `type` of a record.
///
/// The taxonomy is closed in the sense that every value falls into exactly one
/// [`Classification`]; values without special meaning are kept verbatim as
/// publications.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// `tutorial`
    Tutorial,
    /// `presentation`
    Presentation,
    /// `lecture-note`
    LectureNote,
    /// `keynote`
    Keynote,
    /// `invited-talk`
    InvitedTalk,
    /// `panel`
    Panel,
    /// `movie`
    Movie,
    /// Any other type, e.g. `article`, `book`, `inproceedings`.
    Publication(String),
}

/// How a [`RecordType`] is treated by validation and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Talks and teaching material, led by presenters.
    Presenter,
    /// A panel, led by its chair.
    Panel,
    /// A movie, with no contributor requirement.
    Movie,
    /// Everything else, led by editors or authors.
    Publication,
}

impl RecordType {
    /// Parses a type value. Never fails; unknown values become publications.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "tutorial" => Self::Tutorial,
            "presentation" => Self::Presentation,
            "lecture-note" => Self::LectureNote,
            "keynote" => Self::Keynote,
            "invited-talk" => Self::InvitedTalk,
            "panel" => Self::Panel,
            "movie" => Self::Movie,
            other => Self::Publication(other.to_string()),
        }
    }

    /// The type as written in the source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Tutorial => "tutorial",
            Self::Presentation => "presentation",
            Self::LectureNote => "lecture-note",
            Self::Keynote => "keynote",
            Self::InvitedTalk => "invited-talk",
            Self::Panel => "panel",
            Self::Movie => "movie",
            Self::Publication(other) => other,
        }
    }

    /// The classification driving validation and byline rendering.
    #[must_use]
    pub const fn classification(&self) -> Classification {
        match self {
            Self::Tutorial
            | Self::Presentation
            | Self::LectureNote
            | Self::Keynote
            | Self::InvitedTalk => Classification::Presenter,
            Self::Panel => Classification::Panel,
            Self::Movie => Classification::Movie,
            Self::Publication(_) => Classification::Publication,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated library record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Unique, `/`-separated key.
    pub key: String,
    /// Title of the work.
    pub title: String,
    /// Optional subtitle, rendered after the title.
    pub title_addon: Option<String>,
    /// Declared type.
    pub record_type: RecordType,
    /// Year, kept as written.
    pub year: String,
    /// Presenters in source order.
    pub presenters: Vec<Name>,
    /// Authors in source order.
    pub authors: Vec<Name>,
    /// Editors in source order.
    pub editors: Vec<Name>,
    /// Panelists in source order.
    pub panelists: Vec<Name>,
    /// Panel chair.
    pub chair: Option<Name>,
    /// Declared links, label to URL, in source order.
    pub urls: IndexMap<String, String>,
    /// Free-form AsciiDoc appended to the rendered fragment.
    pub adoc: Option<String>,
    /// BiBTeX entry.
    pub bibtex: Option<String>,
    /// Biblatex entry.
    pub biblatex: Option<String>,
    /// The file the record was loaded from.
    pub src_file: PathBuf,
    /// File name of the source without extension.
    pub stem: String,
}

const RECORD_FIELDS: [&str; 13] = [
    "title",
    "titleaddon",
    "type",
    "year",
    "presenters",
    "authors",
    "editors",
    "chair",
    "panelists",
    "urls",
    "adoc",
    "bibtex",
    "biblatex",
];

impl Record {
    /// The contributors listed under `role`.
    #[must_use]
    pub fn contributors(&self, role: Role) -> &[Name] {
        match role {
            Role::Presenter => &self.presenters,
            Role::Editor => &self.editors,
            Role::Author => &self.authors,
            Role::Panelist => &self.panelists,
        }
    }

    /// The directory portion of the key.
    #[must_use]
    pub fn key_directory(&self) -> &str {
        super::schema::directory_of(&self.key)
    }
}

impl Entry for Record {
    const NOUN: &'static str = "record";

    fn from_unit(unit: &SourceUnit) -> Result<Self, NonEmpty<Violation>> {
        let mut fields = Fields::new(&unit.tree);

        let title = fields.required_string("title");
        let record_type = fields
            .required_string("type")
            .map(|value| RecordType::parse(value.as_str()));
        let year = fields.required_scalar("year");
        let title_addon = fields.optional_string("titleaddon");

        let presenters = fields.names(Role::Presenter.field());
        let authors = fields.names(Role::Author.field());
        let editors = fields.names(Role::Editor.field());
        let panelists = fields.names(Role::Panelist.field());
        let chair = fields.optional_non_empty_string("chair").map(Name::new);

        let urls = fields.mapping("urls").unwrap_or_default();
        let adoc = fields.optional_string("adoc");
        let bibtex = fields.optional_string("bibtex");
        let biblatex = fields.optional_string("biblatex");

        fields.reject_unknown(&RECORD_FIELDS);

        fields.reject_repeats(Role::Presenter, &presenters);
        fields.reject_repeats(Role::Author, &authors);
        fields.reject_repeats(Role::Editor, &editors);
        fields.reject_repeats(Role::Panelist, &panelists);

        if let Some(record_type) = &record_type {
            check_taxonomy(
                &mut fields,
                record_type,
                &Roster {
                    presenters: &presenters,
                    authors: &authors,
                    editors: &editors,
                    panelists: &panelists,
                    chair: chair.as_ref(),
                },
            );
        }

        fields.check_location(unit);

        fields.finish(|| {
            Some(Self {
                key: unit.key.clone(),
                title: title?.as_str().to_owned(),
                title_addon,
                record_type: record_type?,
                year: year?,
                presenters,
                authors,
                editors,
                panelists,
                chair,
                urls,
                adoc,
                bibtex,
                biblatex,
                src_file: unit.path.clone(),
                stem: unit.stem().to_string(),
            })
        })
    }
}

struct Roster<'a> {
    presenters: &'a [Name],
    authors: &'a [Name],
    editors: &'a [Name],
    panelists: &'a [Name],
    chair: Option<&'a Name>,
}

fn check_taxonomy(fields: &mut Fields<'_>, record_type: &RecordType, roster: &Roster<'_>) {
    let missing = |requirement| Violation::MissingContributors {
        record_type: record_type.to_string(),
        requirement,
    };

    match record_type.classification() {
        Classification::Presenter => {
            if roster.presenters.is_empty() {
                fields.push(missing("presenter(s)"));
            }
        }
        Classification::Panel => {
            if roster.panelists.is_empty() {
                fields.push(missing("panelist(s)"));
            }
            // A declared but unusable chair is already a field violation.
            if roster.chair.is_none() && !fields.contains("chair") {
                fields.push(missing("chair"));
            }
        }
        Classification::Movie => {}
        Classification::Publication => {
            if roster.authors.is_empty() && roster.editors.is_empty() {
                fields.push(missing("author(s) and editor(s)"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_yaml::Mapping;
    use test_case::test_case;

    use super::*;
    use crate::domain::ViolationKind;

    fn unit(relative: &str, key: &str, yaml: &str) -> SourceUnit {
        SourceUnit {
            path: PathBuf::from("/library").join(relative),
            relative: relative.to_string(),
            key: key.to_string(),
            tree: serde_yaml::from_str::<Mapping>(yaml).unwrap(),
        }
    }

    fn validate(yaml: &str) -> Result<Record, NonEmpty<Violation>> {
        Record::from_unit(&unit("a/b/c.yaml", "a/b/c", yaml))
    }

    fn kinds(result: Result<Record, NonEmpty<Violation>>) -> Vec<ViolationKind> {
        result.unwrap_err().iter().map(Violation::kind).collect()
    }

    #[test]
    fn minimal_article_is_valid() {
        let record = validate(
            "title: On Things\ntype: article\nyear: 2018\nauthors:\n  - Doe, Jane\n",
        )
        .unwrap();

        assert_eq!(record.key, "a/b/c");
        assert_eq!(record.title, "On Things");
        assert_eq!(record.year, "2018");
        assert_eq!(record.record_type, RecordType::Publication("article".to_string()));
        assert_eq!(record.stem, "c");
        assert_eq!(record.src_file, PathBuf::from("/library/a/b/c.yaml"));
    }

    #[test_case("tutorial")]
    #[test_case("presentation")]
    #[test_case("lecture-note")]
    #[test_case("keynote")]
    #[test_case("invited-talk")]
    fn presenter_class_requires_presenters(record_type: &str) {
        let with = format!("title: t\ntype: {record_type}\nyear: 1\npresenters: ['Doe, J']\n");
        assert!(validate(&with).is_ok());

        let without = format!("title: t\ntype: {record_type}\nyear: 1\nauthors: ['Doe, J']\n");
        assert_eq!(kinds(validate(&without)), [ViolationKind::Taxonomy]);
    }

    #[test_case("panelists: ['A, a']\nchair: 'C, c'\n", true; "panelists and chair")]
    #[test_case("panelists: ['A, a']\n", false; "no chair")]
    #[test_case("chair: 'C, c'\n", false; "no panelists")]
    #[test_case("panelists: []\nchair: ''\n", false; "both empty")]
    fn panel_requires_panelists_and_chair(roles: &str, valid: bool) {
        let yaml = format!("title: t\ntype: panel\nyear: 1\n{roles}");
        assert_eq!(validate(&yaml).is_ok(), valid);
    }

    #[test]
    fn panel_missing_both_reports_both() {
        let violations = validate("title: t\ntype: panel\nyear: 1\n").unwrap_err();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn empty_chair_is_reported_once() {
        let violations =
            validate("title: t\ntype: panel\nyear: 1\npanelists: ['A, a']\nchair: ''\n")
                .unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations.head, Violation::EmptyField("chair".to_string()));
    }

    #[test_case(""; "no contributors")]
    #[test_case("presenters: ['A, a']\n"; "presenters only")]
    #[test_case("authors: ['A, a']\neditors: ['B, b']\n"; "authors and editors")]
    fn movie_waives_contributor_requirement(roles: &str) {
        let yaml = format!("title: t\ntype: movie\nyear: 1\n{roles}");
        assert!(validate(&yaml).is_ok());
    }

    #[test_case("authors: ['A, a']\n", true; "authors")]
    #[test_case("editors: ['A, a']\n", true; "editors")]
    #[test_case("presenters: ['A, a']\n", false; "presenters only")]
    #[test_case("", false; "nobody")]
    fn publication_requires_authors_or_editors(roles: &str, valid: bool) {
        let yaml = format!("title: t\ntype: book\nyear: 1\n{roles}");
        assert_eq!(validate(&yaml).is_ok(), valid);
    }

    #[test]
    fn all_violations_are_collected_together() {
        let violations = validate("type: book\nfoo: bar\nauthors: ['A, a', 'A, a']\n").unwrap_err();

        let messages: Vec<String> = violations.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            [
                "did not find key 'title'",
                "did not find key 'year'",
                "unknown key 'foo'",
                "author 'A, a' used more than once",
            ]
        );
    }

    #[test]
    fn empty_urls_are_rejected() {
        let result = validate("title: t\ntype: book\nyear: 1\nauthors: ['A, a']\nurls: {}\n");
        assert_eq!(kinds(result), [ViolationKind::Schema]);
    }

    #[test_case("a/b/c.yaml", "a/b/c", true; "same directory")]
    #[test_case("a/x/c.yaml", "a/b/c", false; "sibling directory")]
    #[test_case("c.yaml", "c", true; "top level")]
    #[test_case("a/c.yaml", "c", false; "key at top level, file nested")]
    fn key_path_consistency(relative: &str, key: &str, valid: bool) {
        let yaml = "title: t\ntype: book\nyear: 1\nauthors: ['A, a']\n";
        let result = Record::from_unit(&unit(relative, key, yaml));
        assert_eq!(result.is_ok(), valid);
        if !valid {
            assert_eq!(kinds(result), [ViolationKind::PathConsistency]);
        }
    }

    #[test]
    fn type_classification() {
        assert_eq!(RecordType::parse("keynote").classification(), Classification::Presenter);
        assert_eq!(RecordType::parse("panel").classification(), Classification::Panel);
        assert_eq!(RecordType::parse("movie").classification(), Classification::Movie);
        assert_eq!(
            RecordType::parse("inproceedings").classification(),
            Classification::Publication
        );
        assert_eq!(RecordType::parse("lecture-note").as_str(), "lecture-note");
    }
}
