//! Engine configuration
//!
//! Loaded from a TOML file; every field has a default so an empty file (or
//! no file) is a valid configuration.
//!
//! ```toml
//! database = ".schemaport/store.db"
//!
//! [policy]
//! languages = ["en", "de"]
//! option_decision = "parent-option-set"
//! view_walk = "first-valid"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use schemaport_core::errors::{ExError, ExErrorKind, ExResult};
use schemaport_core::policy::ImportPolicy;
use schemaport_store::errors::io_error;

pub const DEFAULT_DATABASE: &str = ".schemaport/store.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// SQLite file holding the reconciled records
    pub database: PathBuf,
    pub policy: ImportPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            policy: ImportPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Parse TOML text
    ///
    /// # Errors
    ///
    /// Returns `ERR_INVALID_INPUT` for malformed TOML or unknown values.
    pub fn from_toml_str(text: &str) -> ExResult<Self> {
        toml::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("load_config")
                .with_message(e.to_string())
        })
    }

    /// Load a TOML file
    ///
    /// # Errors
    ///
    /// Returns `ERR_IO` if the file cannot be read, `ERR_INVALID_INPUT` if
    /// it does not parse.
    pub fn load<P: AsRef<Path>>(path: P) -> ExResult<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| io_error("load_config", e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "configuration loaded");
        Ok(config)
    }

    /// Load `path` when given, defaults otherwise
    ///
    /// # Errors
    ///
    /// As [`EngineConfig::load`].
    pub fn load_or_default(path: Option<&Path>) -> ExResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
