use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The name of the configuration file looked up in a corpus root.
pub const CONFIG_FILE: &str = "bibkeeper.toml";

/// Settings for loading, rendering and filtering a knowledge base.
///
/// The value is built once by the host (file, then command-line overrides) and
/// passed explicitly to everything that needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Where rendered files go. When unset, outputs are written next to their
    /// sources.
    pub output_root: Option<PathBuf>,

    /// Which outputs to produce.
    pub targets: Targets,

    /// Prefix for generated links to the published sources.
    ///
    /// When unset, no generated link group is rendered.
    pub base_url: Option<String>,

    /// Whether to link artifacts found under [`Config::artifacts_root`].
    pub local_links: bool,

    /// The directory holding PDFs, slides and other artifacts, mirroring the
    /// key structure of the library.
    pub artifacts_root: Option<PathBuf>,

    /// A LaTeX auxiliary file listing the acronyms a document uses.
    ///
    /// When unset, every acronym is included in the glossary.
    pub usage_log: Option<PathBuf>,

    /// How the load pass reacts to invalid entries.
    pub validation: ValidationMode,

    /// The key looked up in `short-target` and `long-target` overrides.
    pub glossary_target: String,
}

/// Output targets, each enabled independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targets {
    /// The AsciiDoc fragment.
    #[serde(default)]
    pub adoc: bool,
    /// The BiBTeX entry, when the record has one.
    #[serde(default)]
    pub bibtex: bool,
    /// The Biblatex entry, when the record has one.
    #[serde(default)]
    pub biblatex: bool,
}

impl Targets {
    /// Every target enabled.
    pub const ALL: Self = Self {
        adoc: true,
        bibtex: true,
        biblatex: true,
    };

    /// Whether any target is enabled.
    #[must_use]
    pub const fn any(self) -> bool {
        self.adoc || self.bibtex || self.biblatex
    }
}

/// How the load pass reacts to invalid entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// Stop at the first invalid entry.
    #[default]
    FailFast,
    /// Validate every entry, then report all failures together.
    CollectAll,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_root: None,
            targets: Targets::default(),
            base_url: None,
            local_links: false,
            artifacts_root: None,
            usage_log: None,
            validation: ValidationMode::default(),
            glossary_target: default_glossary_target(),
        }
    }
}

/// Errors reading or writing a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("failed to access config file {}: {source}", path.display())]
    Io {
        /// The configuration file.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// The file is not valid configuration TOML.
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        /// The configuration file.
        path: PathBuf,
        /// The underlying error.
        source: toml::de::Error,
    },
    /// The configuration could not be serialised.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `bibkeeper.toml` from `root`, falling back to defaults when the
    /// file does not exist.
    ///
    /// Relative paths in the file are taken relative to `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            tracing::debug!("Loading config from {}", path.display());
            Self::load(&path).map(|config| config.relative_to(root))
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn relative_to(mut self, root: &Path) -> Self {
        let paths = [
            &mut self.output_root,
            &mut self.artifacts_root,
            &mut self.usage_log,
        ];
        for path in paths.into_iter().flatten() {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
        self
    }

    /// The artifacts root, if local links are both requested and possible.
    #[must_use]
    pub fn local_artifacts(&self) -> Option<&Path> {
        if self.local_links {
            self.artifacts_root.as_deref()
        } else {
            None
        }
    }
}

fn default_glossary_target() -> String {
    "latex".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        output_root: Option<PathBuf>,

        #[serde(default)]
        targets: Targets,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,

        #[serde(default)]
        local_links: bool,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        artifacts_root: Option<PathBuf>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        usage_log: Option<PathBuf>,

        #[serde(default)]
        validation: ValidationMode,

        #[serde(default = "default_glossary_target")]
        glossary_target: String,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                output_root,
                targets,
                base_url,
                local_links,
                artifacts_root,
                usage_log,
                validation,
                glossary_target,
            } => Self {
                output_root,
                targets,
                base_url,
                local_links,
                artifacts_root,
                usage_log,
                validation,
                glossary_target,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            output_root: config.output_root,
            targets: config.targets,
            base_url: config.base_url,
            local_links: config.local_links,
            artifacts_root: config.artifacts_root,
            usage_log: config.usage_log,
            validation: config.validation,
            glossary_target: config.glossary_target,
        }
    }
}
