//! Plain-text bibliography and acronym management.
//!
//! A library is a directory of YAML files, one record per file. Records are
//! validated against a type taxonomy, indexed across the corpus, and rendered
//! into AsciiDoc fragments, bibliography files and LaTeX acronym glossaries.

pub mod domain;
pub use domain::{Acronym, Config, Record};

pub mod storage;
pub use storage::Corpus;
