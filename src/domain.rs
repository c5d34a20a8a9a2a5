//! Domain model of the knowledge base.
//!
//! Records and acronyms are validated out of generic source trees, indexed
//! across the corpus, and rendered into AsciiDoc and bibliography text. None
//! of this touches the filesystem; see [`crate::storage`] for that.

pub mod acronym;
pub use acronym::Acronym;

pub mod acronym_index;
pub use acronym_index::{SearchField, ShortFormIndex, glossary};

mod config;
pub use config::{CONFIG_FILE, Config, ConfigError, Targets, ValidationMode};

pub mod document;
pub use document::{Rendered, byline, entries_index, fragment};

pub mod links;
pub use links::{Artifact, ArtifactSource, LinkBlock, NoArtifacts};

pub mod name;
pub use name::{Name, Role};

mod people;
pub use people::PersonIndex;

pub mod record;
pub use record::{Classification, Record, RecordType};

pub mod schema;
pub use schema::{Entry, SourceUnit, Violation, ViolationKind};

pub mod usage;
pub use usage::UsageSet;
