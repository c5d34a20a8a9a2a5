//! Case-insensitive index of acronym short forms.
//!
//! The index is the single source of output order for everything acronym
//! related: ascending lower-cased short form, then load order within a bucket.

use std::{collections::BTreeMap, fmt::Write as _};

use indexmap::IndexMap;

use super::{acronym::Acronym, usage::UsageSet};

/// Acronym keys grouped by lower-cased short form.
#[derive(Debug, Clone, Default)]
pub struct ShortFormIndex {
    buckets: BTreeMap<String, Vec<String>>,
}

/// Where [`ShortFormIndex::search`] looks for a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// The short form.
    Short,
    /// Any long form.
    Long,
    /// Descriptions, notes and URLs.
    Notes,
}

impl ShortFormIndex {
    /// Indexes `acronyms`, in their iteration order.
    pub fn build<'a>(acronyms: impl IntoIterator<Item = &'a Acronym>) -> Self {
        let mut buckets: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for acronym in acronyms {
            buckets
                .entry(acronym.short.to_lowercase())
                .or_default()
                .push(acronym.key.clone());
        }
        Self { buckets }
    }

    /// Every indexed key in output order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.values().flatten().map(String::as_str)
    }

    /// Buckets holding more than one key.
    pub fn duplicates(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.buckets
            .iter()
            .filter(|(_, keys)| keys.len() > 1)
            .map(|(short, keys)| (short.as_str(), keys.as_slice()))
    }

    /// The number of distinct lower-cased short forms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether nothing was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// The acronyms passing `usage`, in output order.
    pub fn filtered<'a>(
        &'a self,
        acronyms: &'a IndexMap<String, Acronym>,
        usage: &'a UsageSet,
    ) -> impl Iterator<Item = &'a Acronym> + 'a {
        self.keys()
            .filter_map(|key| acronyms.get(key))
            .filter(|acronym| usage.includes(&acronym.label()))
    }

    /// Acronyms whose `field` contains `pattern`, ignoring case, in output
    /// order. An acronym matching in several places is returned once.
    #[must_use]
    pub fn search<'a>(
        &self,
        acronyms: &'a IndexMap<String, Acronym>,
        field: SearchField,
        pattern: &str,
    ) -> Vec<&'a Acronym> {
        let pattern = pattern.to_lowercase();
        let matches = |text: &String| text.to_lowercase().contains(&pattern);

        self.keys()
            .filter_map(|key| acronyms.get(key))
            .filter(|acronym| match field {
                SearchField::Short => matches(&acronym.short),
                SearchField::Long => acronym.long.values().any(matches),
                SearchField::Notes => acronym
                    .description
                    .values()
                    .chain(acronym.notes.values())
                    .chain(acronym.urls.values())
                    .any(matches),
            })
            .collect()
    }
}

/// Renders the LaTeX `acronym` environment for the acronyms passing `usage`.
///
/// The environment's width argument is the longest printed short form
/// followed by `X`.
#[must_use]
pub fn glossary(
    index: &ShortFormIndex,
    acronyms: &IndexMap<String, Acronym>,
    usage: &UsageSet,
    target: &str,
) -> String {
    let mut longest = "";
    let mut body = String::new();
    for acronym in index.filtered(acronyms, usage) {
        let short = acronym.short_for(target);
        let _ = writeln!(
            body,
            "    \\acro{{{}}}[{short}]{{{}}}",
            acronym.label(),
            acronym.long_for(target)
        );
        if short.chars().count() > longest.chars().count() {
            longest = short;
        }
    }

    format!("\\begin{{acronym}}[{longest}X]\n{body}\\end{{acronym}}\n")
}
