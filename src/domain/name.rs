//! Contributor names and role lists.
//!
//! Names are stored the way they are written in the sources, `"Last, First"`.
//! Two names denote the same person only if the raw strings are identical.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A contributor name in `"Last, First"` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    /// Wraps a raw name string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The name exactly as written in the source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name in `"First Last"` form.
    ///
    /// Everything after the first comma is treated as the given name. A name
    /// without a comma is returned trimmed but otherwise unchanged.
    #[must_use]
    pub fn display_form(&self) -> String {
        match self.0.split_once(',') {
            Some((last, first)) => {
                let (last, first) = (last.trim(), first.trim());
                if first.is_empty() {
                    last.to_string()
                } else {
                    format!("{first} {last}")
                }
            }
            None => self.0.trim().to_string(),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The contributor roles a record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Someone presenting a talk, tutorial or lecture.
    Presenter,
    /// An editor of a collection.
    Editor,
    /// An author of a publication.
    Author,
    /// A member of a panel.
    Panelist,
}

impl Role {
    /// Roles in the order their lists are rendered and indexed.
    pub const ALL: [Self; 4] = [Self::Presenter, Self::Editor, Self::Author, Self::Panelist];

    /// The source field holding this role's list.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Presenter => "presenters",
            Self::Editor => "editors",
            Self::Author => "authors",
            Self::Panelist => "panelists",
        }
    }

    /// The label for a list of `count` contributors in this role.
    #[must_use]
    pub const fn label(self, count: usize) -> &'static str {
        let plural = count > 1;
        match self {
            Self::Presenter if plural => "Presenters",
            Self::Presenter => "Presenter",
            Self::Editor if plural => "Editors",
            Self::Editor => "Editor",
            Self::Author if plural => "Authors",
            Self::Author => "Author",
            Self::Panelist if plural => "Panelists",
            Self::Panelist => "Panelist",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let singular = match self {
            Self::Presenter => "presenter",
            Self::Editor => "editor",
            Self::Author => "author",
            Self::Panelist => "panelist",
        };
        f.write_str(singular)
    }
}

/// Returns the names that occur more than once, each reported once, in the
/// order their second occurrence is found.
#[must_use]
pub fn repeated(names: &[Name]) -> Vec<&Name> {
    let mut seen = Vec::with_capacity(names.len());
    let mut repeated = Vec::new();
    for name in names {
        if seen.contains(&name) {
            if !repeated.contains(&name) {
                repeated.push(name);
            }
        } else {
            seen.push(name);
        }
    }
    repeated
}

/// Resolves a role list into display names, dropping repeats and keeping the
/// order of first appearance.
#[must_use]
pub fn resolve(names: &[Name]) -> Vec<String> {
    let mut unique: Vec<&Name> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique.into_iter().map(Name::display_form).collect()
}
