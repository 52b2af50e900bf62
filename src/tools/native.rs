//! tools::native
//!
//! Built-in tool reading issues from the JSON issue format used by history
//! snapshots (an array of issue objects).

use crate::core::issues::IssueSet;
use crate::core::types::ToolId;

use super::{IssueParser, ParseError, StaticAnalysisTool};

/// The native JSON issue format.
pub struct NativeFormat {
    id: ToolId,
}

impl NativeFormat {
    const ID: &'static str = "native";

    pub fn new() -> Self {
        Self {
            id: Self::id_value(),
        }
    }

    pub(crate) fn id_value() -> ToolId {
        ToolId::new(Self::ID).expect("built-in tool id is valid")
    }
}

impl Default for NativeFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticAnalysisTool for NativeFormat {
    fn id(&self) -> &ToolId {
        &self.id
    }

    fn display_name(&self) -> &str {
        "Native Analysis Format"
    }

    fn create_parser(&self) -> Box<dyn IssueParser> {
        Box::new(NativeParser)
    }

    fn can_scan_console_log(&self) -> bool {
        false
    }
}

struct NativeParser;

impl IssueParser for NativeParser {
    fn parse(&self, report: &str) -> Result<IssueSet, ParseError> {
        serde_json::from_str(report).map_err(|e| ParseError::Malformed {
            format: NativeFormat::ID.to_string(),
            message: e.to_string(),
        })
    }
}
