//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! refscope has two configuration scopes:
//! - **Global**: User-level settings
//! - **Project**: Settings for one working directory
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$REFSCOPE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/refscope/config.toml`
//! 3. `~/.refscope/config.toml`
//!
//! # Project Config Location
//!
//! `.refscope.toml` in the project directory.
//!
//! # Example
//!
//! ```no_run
//! use refscope::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/project"))).unwrap();
//! let config = result.config;
//!
//! println!("Stable reference: {}", config.use_stable_build_as_reference());
//! if let Some(tool) = config.tool() {
//!     println!("Default tool: {}", tool);
//! }
//! ```

pub mod schema;

pub use schema::{ConfigFile, ReferenceDefaults};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project config file.
pub const PROJECT_CONFIG_FILE: &str = ".refscope.toml";

/// Default history snapshot path, relative to the project directory.
pub const DEFAULT_HISTORY_FILE: &str = "history.json";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Files that were read, global first.
    pub sources: Vec<PathBuf>,
}

/// Merged configuration from all sources.
///
/// Accessor methods apply precedence rules automatically. Project config
/// overrides global config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: ConfigFile,
    /// Project configuration (if present)
    pub project: Option<ConfigFile>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `project_dir` is provided, also loads the project config there.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed.
    /// Missing config files are not an error (defaults are used).
    pub fn load(project_dir: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let mut sources = Vec::new();

        let global = match Self::global_config_location() {
            Some(path) => {
                let config = Self::read_config(&path)?;
                sources.push(path);
                config
            }
            None => ConfigFile::default(),
        };

        let project = match project_dir.map(|dir| dir.join(PROJECT_CONFIG_FILE)) {
            Some(path) if path.exists() => {
                let config = Self::read_config(&path)?;
                sources.push(path);
                Some(config)
            }
            _ => None,
        };

        global.validate()?;
        if let Some(ref p) = project {
            p.validate()?;
        }

        for source in &sources {
            log::debug!("loaded config from {}", source.display());
        }

        Ok(ConfigLoadResult {
            config: Config { global, project },
            sources,
        })
    }

    /// Find the global config file, if one exists.
    fn global_config_location() -> Option<PathBuf> {
        // 1. Check $REFSCOPE_CONFIG
        if let Ok(path) = std::env::var("REFSCOPE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/refscope/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("refscope/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.refscope/config.toml
        dirs::home_dir()
            .map(|home| home.join(".refscope/config.toml"))
            .filter(|path| path.exists())
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Pick a value from the project config, falling back to global.
    fn pick<T>(&self, get: impl Fn(&ConfigFile) -> Option<T>) -> Option<T> {
        self.project.as_ref().and_then(&get).or_else(|| get(&self.global))
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Get the default tool id.
    ///
    /// Returns `None` if not configured.
    pub fn tool(&self) -> Option<String> {
        self.pick(|c| c.tool.clone())
    }

    /// Get the history snapshot path.
    ///
    /// Defaults to `history.json`.
    pub fn history(&self) -> PathBuf {
        self.pick(|c| c.history.clone())
            .unwrap_or_else(|| DEFAULT_HISTORY_FILE.to_string())
            .into()
    }

    /// Whether to use the stable plugin policy.
    ///
    /// Defaults to `false` (previous run).
    pub fn use_stable_build_as_reference(&self) -> bool {
        self.pick(|c| {
            c.reference
                .as_ref()
                .and_then(|r| r.use_stable_build_as_reference)
        })
        .unwrap_or(false)
    }

    /// Whether the stable policy also requires overall success.
    ///
    /// Defaults to `false`.
    pub fn use_overall_result_as_reference(&self) -> bool {
        self.pick(|c| {
            c.reference
                .as_ref()
                .and_then(|r| r.use_overall_result_as_reference)
        })
        .unwrap_or(false)
    }
}
