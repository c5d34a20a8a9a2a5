//! Filesystem access: reading sources, loading corpora and writing outputs.

mod artifacts;
pub use artifacts::ArtifactTree;

mod corpus;
pub use corpus::{Corpus, CorpusError, Rejected};

mod output;
pub use output::{OutputError, OutputLayout};

mod source;
pub use source::{SourceError, read_unit};

mod usage_log;
pub use usage_log::{UsageLogError, read_usage};
