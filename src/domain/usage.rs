//! Usage logs: which acronyms a document actually references.
//!
//! LaTeX writes one `\acronymused{<label>}` line per referenced acronym into
//! its auxiliary file. Labels use `:` where keys use `/`, so they are kept as
//! written and compared against [`Acronym::label`](super::Acronym::label).

use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;

/// The token that starts a usage line.
pub const USAGE_MARKER: &str = "\\acronymused";

/// The extra usage file looked up next to the log.
pub const SIBLING_FILE: &str = "add-acronyms.txt";

static USAGE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{}\s*\{{([^{{}}]+)\}}", regex::escape(USAGE_MARKER)))
        .expect("usage pattern is a valid regex")
});

/// The result of matching one log line against the usage marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageToken<'a> {
    /// The line does not record a usage.
    NoMatch,
    /// The line records a usage of the acronym with this label.
    Used(&'a str),
}

/// Tokenizes one line of a usage log.
#[must_use]
pub fn tokenize(line: &str) -> UsageToken<'_> {
    USAGE_LINE
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map_or(UsageToken::NoMatch, |label| UsageToken::Used(label.as_str().trim()))
}

/// The set of acronym labels referenced by usage logs, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageSet {
    labels: IndexSet<String>,
}

impl UsageSet {
    /// Adds every usage found in `lines`, ignoring repeats.
    pub fn extend_from_lines<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        for line in lines {
            if let UsageToken::Used(label) = tokenize(line) {
                self.labels.insert(label.to_string());
            }
        }
    }

    /// Builds a set from the lines of a single log.
    #[must_use]
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut set = Self::default();
        set.extend_from_lines(lines);
        set
    }

    /// Whether no usage was recorded. An empty set filters nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether an acronym with `label` passes the filter.
    #[must_use]
    pub fn includes(&self, label: &str) -> bool {
        self.labels.is_empty() || self.labels.contains(label)
    }

    /// The recorded labels in first-seen order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}
