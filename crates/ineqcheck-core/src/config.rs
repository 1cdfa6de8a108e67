//! Layered configuration.
//!
//! Two optional TOML files are read, lowest precedence first:
//!
//! 1. user config: `<config_dir>/ineqcheck/config.toml`
//! 2. project config: `./ineqcheck.toml` (or an explicit `--config` path,
//!    which replaces project discovery)
//!
//! Keys set in a later layer override the same keys in an earlier one;
//! unset keys fall through.
//!
//! ```toml
//! output = "text"          # pretty | text | json
//!
//! [parse]
//! ascii_operators = true   # accept <=, >=, ==
//! comments = true          # skip lines starting with '#'
//! ```

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ErrorCode;
use crate::parse::ParseOptions;

/// File name looked up in the project directory.
pub const PROJECT_CONFIG_FILE: &str = "ineqcheck.toml";

/// Errors loading configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::ConfigReadFailed,
            Self::Parse { .. } => ErrorCode::ConfigParseError,
        }
    }
}

/// One config file as written on disk. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub output: Option<String>,
    pub parse: ParseSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseSection {
    pub ascii_operators: Option<bool>,
    pub comments: Option<bool>,
}

impl ConfigFile {
    /// Layer `upper` on top of `self`; keys set in `upper` win.
    #[must_use]
    pub fn overlay(self, upper: Self) -> Self {
        Self {
            output: upper.output.or(self.output),
            parse: ParseSection {
                ascii_operators: upper.parse.ascii_operators.or(self.parse.ascii_operators),
                comments: upper.parse.comments.or(self.parse.comments),
            },
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    /// Raw output mode name; interpreted by the CLI.
    pub output: Option<String>,
    pub ascii_operators: bool,
    pub comments: bool,
    /// Files that contributed, lowest precedence first.
    pub sources: Vec<PathBuf>,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self::from_file(ConfigFile::default(), Vec::new())
    }
}

impl EffectiveConfig {
    fn from_file(file: ConfigFile, sources: Vec<PathBuf>) -> Self {
        let defaults = ParseOptions::default();
        Self {
            output: file.output,
            ascii_operators: file.parse.ascii_operators.unwrap_or(defaults.ascii_operators),
            comments: file.parse.comments.unwrap_or(defaults.comments),
            sources,
        }
    }

    #[must_use]
    pub const fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            ascii_operators: self.ascii_operators,
            comments: self.comments,
        }
    }
}

/// Load one config file. A missing file is `Ok(None)`.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
pub fn load_config_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str::<ConfigFile>(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Path of the per-user config file, if the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ineqcheck/config.toml"))
}

/// Resolve configuration for a run in `project_root`.
///
/// `explicit` replaces project discovery when given; unlike a discovered
/// file it must exist.
///
/// # Errors
///
/// Returns [`ConfigError`] if any contributing file is unreadable or
/// malformed, or if `explicit` does not exist.
pub fn resolve_config(
    project_root: &Path,
    explicit: Option<&Path>,
) -> Result<EffectiveConfig, ConfigError> {
    resolve_layers(user_config_path().as_deref(), project_root, explicit)
}

fn resolve_layers(
    user_path: Option<&Path>,
    project_root: &Path,
    explicit: Option<&Path>,
) -> Result<EffectiveConfig, ConfigError> {
    let mut merged = ConfigFile::default();
    let mut sources = Vec::new();

    if let Some(path) = user_path
        && let Some(file) = load_config_file(path)?
    {
        merged = merged.overlay(file);
        sources.push(path.to_path_buf());
    }

    let project_path = explicit.map_or_else(|| project_root.join(PROJECT_CONFIG_FILE), Path::to_path_buf);
    match load_config_file(&project_path)? {
        Some(file) => {
            merged = merged.overlay(file);
            sources.push(project_path);
        }
        None if explicit.is_some() => {
            return Err(ConfigError::Read {
                source: io::Error::new(io::ErrorKind::NotFound, "config file not found"),
                path: project_path,
            });
        }
        None => {}
    }

    debug!(sources = sources.len(), "configuration resolved");
    Ok(EffectiveConfig::from_file(merged, sources))
}
