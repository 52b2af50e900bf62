//! reference::selector
//!
//! Lookup of the outcome a specific tool recorded on a build.

use crate::core::types::ToolId;
use crate::history::{AnalysisOutcome, Build};

/// Selects the analysis outcome of one tool on a build.
///
/// Implementations must be pure: the same build always yields the same
/// answer. `None` means the tool has no recorded outcome on that build,
/// whatever the reason (not run, disabled, data deleted).
///
/// Any `Fn(&Build) -> Option<AnalysisOutcome>` is a selector, including
/// plain functions:
///
/// ```
/// use refscope::history::{AnalysisOutcome, Build};
/// use refscope::reference::ResultSelector;
///
/// fn first_outcome<'h>(build: &Build<'h>) -> Option<AnalysisOutcome<'h>> {
///     build.outcomes().next()
/// }
///
/// fn takes_selector<'h>(_: &impl ResultSelector<'h>) {}
/// takes_selector(&first_outcome);
/// ```
pub trait ResultSelector<'h> {
    /// Return the outcome recorded on `build`, if any.
    fn select(&self, build: &Build<'h>) -> Option<AnalysisOutcome<'h>>;
}

impl<'h, F> ResultSelector<'h> for F
where
    F: Fn(&Build<'h>) -> Option<AnalysisOutcome<'h>>,
{
    fn select(&self, build: &Build<'h>) -> Option<AnalysisOutcome<'h>> {
        self(build)
    }
}

/// Selects outcomes by tool id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByIdResultSelector {
    tool: ToolId,
}

impl ByIdResultSelector {
    pub fn new(tool: ToolId) -> Self {
        Self { tool }
    }

    pub fn tool(&self) -> &ToolId {
        &self.tool
    }
}

impl<'h> ResultSelector<'h> for ByIdResultSelector {
    fn select(&self, build: &Build<'h>) -> Option<AnalysisOutcome<'h>> {
        build.outcome(&self.tool)
    }
}
