//! Field-level validation shared by every kind of entry in the knowledge base.
//!
//! A source unit is validated in a single pass: every rule runs, every
//! violation is collected, and a typed entry is only produced when the list
//! comes back empty.

use std::path::PathBuf;

use indexmap::IndexMap;
use non_empty_string::NonEmptyString;
use nonempty::NonEmpty;
use serde_yaml::{Mapping, Value};

use super::name::{Name, Role};

/// One parsed source file: a single top-level key and the field tree below it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceUnit {
    /// The file the unit was read from.
    pub path: PathBuf,
    /// The file path relative to the corpus root, `/`-separated.
    pub relative: String,
    /// The top-level key of the document.
    pub key: String,
    /// The fields stored under the key.
    pub tree: Mapping,
}

impl SourceUnit {
    /// The file name without its extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        let file = self
            .relative
            .rsplit_once('/')
            .map_or(self.relative.as_str(), |(_, file)| file);
        file.rsplit_once('.').map_or(file, |(stem, _)| stem)
    }
}

/// An entry type that can be validated from a [`SourceUnit`].
pub trait Entry: Sized {
    /// A short noun for log and report messages, e.g. "record".
    const NOUN: &'static str;

    /// Validates `unit` and converts it into a typed entry.
    ///
    /// # Errors
    ///
    /// Returns every rule the unit violates, in the order the rules run.
    fn from_unit(unit: &SourceUnit) -> Result<Self, NonEmpty<Violation>>;
}

/// The broad class a [`Violation`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Missing, empty, malformed or unknown field.
    Schema,
    /// Contributor requirement for the record type not met.
    Taxonomy,
    /// Key directory does not match the storage directory.
    PathConsistency,
    /// The key was already loaded from another file.
    DuplicateKey,
    /// A name repeats within one role list.
    DuplicateContributor,
}

/// A single rule violated by a source unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// A required field is absent.
    #[error("did not find key '{0}'")]
    MissingField(&'static str),

    /// A field is present but has no content.
    #[error("key '{0}' with no entry")]
    EmptyField(String),

    /// A field holds the wrong shape of value.
    #[error("key '{field}' must be {expected}")]
    InvalidField {
        /// The offending field.
        field: String,
        /// A description of the accepted shape.
        expected: &'static str,
    },

    /// A field outside the recognised set.
    #[error("unknown key '{0}'")]
    UnknownField(String),

    /// The record type requires contributors that are missing.
    #[error("found {record_type} without {requirement}")]
    MissingContributors {
        /// The declared type of the record.
        record_type: String,
        /// What the type requires.
        requirement: &'static str,
    },

    /// A name appears twice in one role list.
    #[error("{role} '{name}' used more than once")]
    DuplicateContributor {
        /// The role list containing the repeat.
        role: Role,
        /// The repeated name.
        name: Name,
    },

    /// The key's directory differs from the file's directory.
    #[error("something wrong in key path ({key_dir}) and directory ({file_dir})")]
    PathMismatch {
        /// Directory portion of the key.
        key_dir: String,
        /// Directory of the file relative to the corpus root.
        file_dir: String,
    },

    /// The key is already defined by another source file.
    #[error("key already in dictionary, defined in {}", first.display())]
    DuplicateKey {
        /// The file that defined the key first.
        first: PathBuf,
    },
}

impl Violation {
    /// The class of this violation.
    #[must_use]
    pub const fn kind(&self) -> ViolationKind {
        match self {
            Self::MissingField(_)
            | Self::EmptyField(_)
            | Self::InvalidField { .. }
            | Self::UnknownField(_) => ViolationKind::Schema,
            Self::MissingContributors { .. } => ViolationKind::Taxonomy,
            Self::DuplicateContributor { .. } => ViolationKind::DuplicateContributor,
            Self::PathMismatch { .. } => ViolationKind::PathConsistency,
            Self::DuplicateKey { .. } => ViolationKind::DuplicateKey,
        }
    }
}

/// The directory portion of a `/`-separated path, or `""` at the top level.
#[must_use]
pub fn directory_of(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Collects typed field values out of a tree while recording violations.
pub(crate) struct Fields<'a> {
    tree: &'a Mapping,
    violations: Vec<Violation>,
}

impl<'a> Fields<'a> {
    pub(crate) const fn new(tree: &'a Mapping) -> Self {
        Self {
            tree,
            violations: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.tree.get(field)
    }

    pub(crate) fn contains(&self, field: &str) -> bool {
        self.tree.contains_key(field)
    }

    /// A required, non-empty string.
    pub(crate) fn required_string(&mut self, field: &'static str) -> Option<NonEmptyString> {
        let Some(value) = self.get(field) else {
            self.push(Violation::MissingField(field));
            return None;
        };
        let text = self.scalar_text(field, value)?;
        NonEmptyString::new(text).map_or_else(
            |_| {
                self.push(Violation::EmptyField(field.to_string()));
                None
            },
            Some,
        )
    }

    /// A required scalar that may be written as a number or a string.
    pub(crate) fn required_scalar(&mut self, field: &'static str) -> Option<String> {
        match self.get(field) {
            None => {
                self.push(Violation::MissingField(field));
                None
            }
            Some(Value::Null) => {
                self.push(Violation::EmptyField(field.to_string()));
                None
            }
            Some(value) => self.scalar_text(field, value),
        }
    }

    /// An optional string; present but empty is allowed.
    pub(crate) fn optional_string(&mut self, field: &str) -> Option<String> {
        let value = self.get(field)?;
        self.scalar_text(field, value)
    }

    /// An optional string that must not be empty when present.
    pub(crate) fn optional_non_empty_string(&mut self, field: &str) -> Option<String> {
        let text = self.optional_string(field)?;
        if text.trim().is_empty() {
            self.push(Violation::EmptyField(field.to_string()));
            return None;
        }
        Some(text)
    }

    /// An optional list of names, empty when absent.
    pub(crate) fn names(&mut self, field: &str) -> Vec<Name> {
        match self.get(field) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(items)) => {
                let mut names = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(name) => names.push(Name::new(name.clone())),
                        _ => {
                            self.push(Violation::InvalidField {
                                field: field.to_string(),
                                expected: "a list of names",
                            });
                            return Vec::new();
                        }
                    }
                }
                names
            }
            Some(_) => {
                self.push(Violation::InvalidField {
                    field: field.to_string(),
                    expected: "a list of names",
                });
                Vec::new()
            }
        }
    }

    /// An optional string-to-string mapping that must not be empty when
    /// present. Insertion order is kept.
    pub(crate) fn mapping(&mut self, field: &str) -> Option<IndexMap<String, String>> {
        let value = self.get(field)?;
        let Value::Mapping(entries) = value else {
            self.push(Violation::InvalidField {
                field: field.to_string(),
                expected: "a mapping",
            });
            return None;
        };
        if entries.is_empty() {
            self.push(Violation::EmptyField(field.to_string()));
            return None;
        }

        let mut map = IndexMap::with_capacity(entries.len());
        for (label, value) in entries {
            let (Some(label), Some(text)) = (scalar_to_string(label), scalar_to_string(value))
            else {
                self.push(Violation::InvalidField {
                    field: field.to_string(),
                    expected: "a mapping of text values",
                });
                return None;
            };
            map.insert(label, text);
        }
        Some(map)
    }

    /// A required mapping; reported missing when absent.
    pub(crate) fn required_mapping(
        &mut self,
        field: &'static str,
    ) -> Option<IndexMap<String, String>> {
        if !self.contains(field) {
            self.push(Violation::MissingField(field));
            return None;
        }
        self.mapping(field)
    }

    /// Reports every key that is not in `recognised`.
    pub(crate) fn reject_unknown(&mut self, recognised: &[&str]) {
        let unknown: Vec<String> = self
            .tree
            .keys()
            .filter(|key| !key.as_str().is_some_and(|key| recognised.contains(&key)))
            .map(|key| scalar_to_string(key).unwrap_or_else(|| format!("{key:?}")))
            .collect();
        for key in unknown {
            self.push(Violation::UnknownField(key));
        }
    }

    /// Reports repeated names within one role list.
    pub(crate) fn reject_repeats(&mut self, role: Role, names: &[Name]) {
        for name in super::name::repeated(names) {
            self.push(Violation::DuplicateContributor {
                role,
                name: name.clone(),
            });
        }
    }

    /// Checks that the key lives in the directory of its source file.
    pub(crate) fn check_location(&mut self, unit: &SourceUnit) {
        let key_dir = directory_of(&unit.key);
        let file_dir = directory_of(&unit.relative);
        if key_dir != file_dir {
            self.push(Violation::PathMismatch {
                key_dir: key_dir.to_string(),
                file_dir: file_dir.to_string(),
            });
        }
    }

    pub(crate) fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, NonEmpty<Violation>> {
        if let Some(violations) = NonEmpty::from_vec(self.violations) {
            return Err(violations);
        }
        // Every accessor that returns `None` also records a violation, so a
        // clean run always has its values.
        build().ok_or_else(|| NonEmpty::new(Violation::MissingField("?")))
    }

    fn scalar_text(&mut self, field: &str, value: &Value) -> Option<String> {
        let text = scalar_to_string(value);
        if text.is_none() {
            self.push(Violation::InvalidField {
                field: field.to_string(),
                expected: "a text value",
            });
        }
        text
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn stem_strips_directory_and_extension() {
        let unit = SourceUnit {
            path: PathBuf::from("/lib/a/b/talk.yaml"),
            relative: "a/b/talk.yaml".to_string(),
            key: "a/b/talk".to_string(),
            tree: Mapping::new(),
        };
        assert_eq!(unit.stem(), "talk");
    }

    #[test]
    fn directory_of_top_level_is_empty() {
        assert_eq!(directory_of("a/b/c"), "a/b");
        assert_eq!(directory_of("c"), "");
    }

    #[test]
    fn required_string_reports_missing_and_empty() {
        let tree = tree("title: ''\n");
        let mut fields = Fields::new(&tree);

        assert!(fields.required_string("title").is_none());
        assert!(fields.required_string("type").is_none());
        assert_eq!(
            fields.violations,
            [
                Violation::EmptyField("title".to_string()),
                Violation::MissingField("type"),
            ]
        );
    }

    #[test]
    fn numeric_year_is_accepted_as_text() {
        let tree = tree("year: 2019\n");
        let mut fields = Fields::new(&tree);

        assert_eq!(fields.required_scalar("year").as_deref(), Some("2019"));
        assert!(fields.violations.is_empty());
    }

    #[test]
    fn mapping_keeps_insertion_order() {
        let tree = tree("urls:\n  zeta: z\n  alpha: a\n");
        let mut fields = Fields::new(&tree);

        let urls = fields.mapping("urls").unwrap();
        let labels: Vec<&str> = urls.keys().map(String::as_str).collect();
        assert_eq!(labels, ["zeta", "alpha"]);
    }

    #[test]
    fn empty_mapping_is_a_violation() {
        let tree = tree("urls: {}\n");
        let mut fields = Fields::new(&tree);

        assert!(fields.mapping("urls").is_none());
        assert_eq!(fields.violations, [Violation::EmptyField("urls".to_string())]);
    }

    #[test]
    fn unknown_keys_are_each_reported() {
        let tree = tree("title: x\nfoo: 1\nbar: 2\n");
        let mut fields = Fields::new(&tree);

        fields.reject_unknown(&["title"]);
        assert_eq!(
            fields.violations,
            [
                Violation::UnknownField("foo".to_string()),
                Violation::UnknownField("bar".to_string()),
            ]
        );
    }

    #[test]
    fn violation_kinds() {
        assert_eq!(Violation::MissingField("title").kind(), ViolationKind::Schema);
        assert_eq!(
            Violation::DuplicateKey {
                first: PathBuf::from("x.yaml")
            }
            .kind(),
            ViolationKind::DuplicateKey
        );
    }
}
