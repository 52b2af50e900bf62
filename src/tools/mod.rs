//! tools
//!
//! Registry of the static analysis tools whose results can be compared.
//!
//! # Architecture
//!
//! A tool is described by the [`StaticAnalysisTool`] trait: a stable id used
//! to look up its outcome on a build, a display name, and a parser that turns
//! the tool's report into an [`IssueSet`]. Tools are registered once in a
//! [`ToolRegistry`] and looked up by id.
//!
//! Report formats are owned by the individual tools; [`native`] provides the
//! only built-in one.

pub mod native;

use std::collections::BTreeMap;
use thiserror::Error;

use crate::core::issues::IssueSet;
use crate::core::types::ToolId;

/// Errors from parsing a tool report.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed {format} report: {message}")]
    Malformed { format: String, message: String },

    #[error("{0} reports cannot be scanned from a console log")]
    ConsoleLogUnsupported(ToolId),
}

/// Errors from registry operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    DuplicateTool(ToolId),

    #[error("unknown tool '{id}', must be one of: {known}")]
    UnknownTool { id: String, known: String },
}

/// Parses a tool report into issues.
pub trait IssueParser {
    /// Parse the full contents of a report.
    fn parse(&self, report: &str) -> Result<IssueSet, ParseError>;
}

/// A static analysis tool that reports issues.
pub trait StaticAnalysisTool: Send + Sync {
    /// Stable id, used to select the tool's outcome on a build.
    fn id(&self) -> &ToolId;

    /// Human readable name.
    fn display_name(&self) -> &str;

    /// Create a parser for this tool's report format.
    fn create_parser(&self) -> Box<dyn IssueParser>;

    /// Whether the parser can scan a console log.
    ///
    /// Line based formats usually can; structured formats (XML, JSON) must
    /// be read from their own report file.
    fn can_scan_console_log(&self) -> bool {
        true
    }
}

/// Known tools, keyed by id.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<ToolId, Box<dyn StaticAnalysisTool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in tools.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.tools.insert(
            native::NativeFormat::id_value(),
            Box::new(native::NativeFormat::new()),
        );
        registry
    }

    /// Register a tool.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateTool` if the id is taken.
    pub fn register(&mut self, tool: Box<dyn StaticAnalysisTool>) -> Result<(), RegistryError> {
        let id = tool.id().clone();
        if self.tools.contains_key(&id) {
            return Err(RegistryError::DuplicateTool(id));
        }
        log::debug!("registered tool '{}' ({})", id, tool.display_name());
        self.tools.insert(id, tool);
        Ok(())
    }

    /// Look up a tool by id.
    pub fn get(&self, id: &str) -> Option<&dyn StaticAnalysisTool> {
        // Strings that are not valid ids cannot be registered.
        let id = ToolId::new(id).ok()?;
        self.tools.get(&id).map(|tool| tool.as_ref())
    }

    /// Look up a tool by id, failing with the list of known ids.
    pub fn require(&self, id: &str) -> Result<&dyn StaticAnalysisTool, RegistryError> {
        self.get(id).ok_or_else(|| RegistryError::UnknownTool {
            id: id.to_string(),
            known: self
                .tools
                .keys()
                .map(ToolId::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// All tools, sorted by id.
    pub fn iter(&self) -> impl Iterator<Item = &dyn StaticAnalysisTool> {
        self.tools.values().map(|tool| tool.as_ref())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
