//! core::config::schema
//!
//! Configuration schema types.
//!
//! Global and project files share one schema; project values override
//! global ones field by field.
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they conform to
//! expected formats (e.g., the default tool must be a valid tool id).

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::ToolId;

/// Contents of a config file.
///
/// # Example
///
/// ```toml
/// tool = "checkstyle"
/// history = "build/history.json"
///
/// [reference]
/// use_stable_build_as_reference = true
/// use_overall_result_as_reference = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Default tool id
    pub tool: Option<String>,

    /// Default history snapshot path
    pub history: Option<String>,

    /// Reference selection defaults
    pub reference: Option<ReferenceDefaults>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(tool) = &self.tool {
            ToolId::new(tool)
                .map_err(|e| ConfigError::InvalidValue(format!("invalid default tool: {}", e)))?;
        }

        if let Some(history) = &self.history {
            if history.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "history path cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Reference selection defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceDefaults {
    /// Only compare against builds whose analysis succeeded on its own terms
    pub use_stable_build_as_reference: Option<bool>,

    /// Additionally require the overall build result to be SUCCESS
    pub use_overall_result_as_reference: Option<bool>,
}
