//! Acronym records.

use std::path::PathBuf;

use indexmap::IndexMap;
use nonempty::NonEmpty;

use super::schema::{Entry, Fields, SourceUnit, Violation};

/// The locale preferred when no override applies.
pub const DEFAULT_LOCALE: &str = "en";

/// A validated acronym definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acronym {
    /// Unique, `/`-separated key.
    pub key: String,
    /// The short form, e.g. `API`.
    pub short: String,
    /// Per-target replacements for the short form.
    pub short_target: IndexMap<String, String>,
    /// The long form by locale. Never empty.
    pub long: IndexMap<String, String>,
    /// Per-target replacements for the long form.
    pub long_target: IndexMap<String, String>,
    /// Descriptions by locale.
    pub description: IndexMap<String, String>,
    /// Notes by label.
    pub notes: IndexMap<String, String>,
    /// Reference links by label.
    pub urls: IndexMap<String, String>,
    /// The file the acronym was loaded from.
    pub src_file: PathBuf,
}

const ACRONYM_FIELDS: [&str; 7] = [
    "short",
    "short-target",
    "long",
    "long-target",
    "description",
    "notes",
    "urls",
];

impl Acronym {
    /// The short form to print for `target`.
    #[must_use]
    pub fn short_for(&self, target: &str) -> &str {
        self.short_target.get(target).unwrap_or(&self.short)
    }

    /// The long form to print for `target`.
    ///
    /// Resolution order is the target override, then the English long form,
    /// then the first long form declared.
    #[must_use]
    pub fn long_for(&self, target: &str) -> &str {
        self.long_target
            .get(target)
            .or_else(|| self.long.get(DEFAULT_LOCALE))
            .or_else(|| self.long.values().next())
            .map_or("", String::as_str)
    }

    /// The label used in LaTeX documents, `/` replaced by `:`.
    #[must_use]
    pub fn label(&self) -> String {
        self.key.replace('/', ":")
    }
}

impl Entry for Acronym {
    const NOUN: &'static str = "acronym";

    fn from_unit(unit: &SourceUnit) -> Result<Self, NonEmpty<Violation>> {
        let mut fields = Fields::new(&unit.tree);

        let short = fields.required_string("short");
        let long = fields.required_mapping("long");
        let short_target = fields.mapping("short-target").unwrap_or_default();
        let long_target = fields.mapping("long-target").unwrap_or_default();
        let description = fields.mapping("description").unwrap_or_default();
        let notes = fields.mapping("notes").unwrap_or_default();
        let urls = fields.mapping("urls").unwrap_or_default();

        fields.reject_unknown(&ACRONYM_FIELDS);
        fields.check_location(unit);

        fields.finish(|| {
            Some(Self {
                key: unit.key.clone(),
                short: short?.as_str().to_owned(),
                short_target,
                long: long?,
                long_target,
                description,
                notes,
                urls,
                src_file: unit.path.clone(),
            })
        })
    }
}
