//! history
//!
//! In-memory build history of one job.
//!
//! # Architecture
//!
//! [`BuildHistory`] owns every [`BuildRecord`] of a job, keyed by build
//! number. Callers navigate it through lightweight `Copy` handles:
//!
//! - [`Build`] - one execution; knows its predecessor and overall result
//! - [`AnalysisOutcome`] - what one tool recorded on a build
//!
//! Handles borrow the history, so they are valid exactly as long as the
//! history is and can be shared freely between threads.
//!
//! # Invariants
//!
//! - A predecessor is added before its successor and has a smaller number,
//!   so the chain is acyclic and finite by construction
//! - The history is a single chain: one build without predecessor, and no
//!   build is the predecessor of two others
//! - Every build has at most one outcome per tool
//! - `outcome.owner()` is the build the outcome was read from

pub mod snapshot;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use thiserror::Error;

use crate::core::issues::IssueSet;
use crate::core::types::{BuildNumber, BuildResult, ToolId};

/// Errors from building or loading a history.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to read history file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse history: {0}")]
    Parse(String),

    #[error("build {0} appears more than once")]
    DuplicateBuild(BuildNumber),

    #[error("build {build} references unknown predecessor {previous}")]
    UnknownPredecessor {
        build: BuildNumber,
        previous: BuildNumber,
    },

    #[error("build {build} cannot follow newer build {previous}")]
    PredecessorNotOlder {
        build: BuildNumber,
        previous: BuildNumber,
    },

    #[error("build {build} cannot follow {previous}, which build {successor} already follows")]
    PredecessorTaken {
        build: BuildNumber,
        previous: BuildNumber,
        successor: BuildNumber,
    },

    #[error("build {build} has no predecessor, but build {root} already starts the history")]
    SecondRoot { build: BuildNumber, root: BuildNumber },

    #[error("build {build} records tool '{tool}' more than once")]
    DuplicateTool { build: BuildNumber, tool: ToolId },
}

/// Issues one tool produced on one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult {
    issues: IssueSet,
}

impl AnalysisResult {
    pub fn new(issues: IssueSet) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &IssueSet {
        &self.issues
    }
}

/// Stored outcome of one tool on one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Tool that produced the outcome
    pub tool: ToolId,
    /// Whether the tool's own run passed its criteria (e.g. quality gates)
    pub successful: bool,
    /// Recorded issues; absent when the result data was not kept
    #[serde(default, rename = "issues")]
    pub result: Option<AnalysisResult>,
}

/// Stored data of one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub number: BuildNumber,
    /// Overall result; absent while the build is running
    #[serde(default)]
    pub result: Option<BuildResult>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Number of the immediately preceding build
    #[serde(default)]
    pub previous: Option<BuildNumber>,
    #[serde(default)]
    pub analyses: Vec<AnalysisRecord>,
}

impl BuildRecord {
    /// Create a finished build without analyses.
    pub fn new(number: BuildNumber, result: Option<BuildResult>) -> Self {
        Self {
            number,
            result,
            timestamp: None,
            previous: None,
            analyses: Vec::new(),
        }
    }

    /// Set the predecessor.
    pub fn after(mut self, previous: BuildNumber) -> Self {
        self.previous = Some(previous);
        self
    }

    /// Attach a tool outcome.
    pub fn with_analysis(
        mut self,
        tool: ToolId,
        successful: bool,
        result: Option<AnalysisResult>,
    ) -> Self {
        self.analyses.push(AnalysisRecord {
            tool,
            successful,
            result,
        });
        self
    }
}

/// All builds of one job.
#[derive(Debug, Clone, Default)]
pub struct BuildHistory {
    job: String,
    builds: BTreeMap<BuildNumber, BuildRecord>,
    /// predecessor -> successor
    successors: HashMap<BuildNumber, BuildNumber>,
}

impl BuildHistory {
    /// Create an empty history for a job.
    pub fn new(job: impl Into<String>) -> Self {
        Self {
            job: job.into(),
            builds: BTreeMap::new(),
            successors: HashMap::new(),
        }
    }

    /// Name of the job this history belongs to.
    pub fn job(&self) -> &str {
        &self.job
    }

    /// Add a build.
    ///
    /// # Errors
    ///
    /// Rejects duplicate build numbers, predecessors that are unknown, not
    /// older or already followed by another build, a second build without
    /// predecessor, and builds recording the same tool twice.
    pub fn add_build(&mut self, record: BuildRecord) -> Result<(), HistoryError> {
        if self.builds.contains_key(&record.number) {
            return Err(HistoryError::DuplicateBuild(record.number));
        }

        if let Some(previous) = record.previous {
            if previous >= record.number {
                return Err(HistoryError::PredecessorNotOlder {
                    build: record.number,
                    previous,
                });
            }
            if !self.builds.contains_key(&previous) {
                return Err(HistoryError::UnknownPredecessor {
                    build: record.number,
                    previous,
                });
            }
            if let Some(&successor) = self.successors.get(&previous) {
                return Err(HistoryError::PredecessorTaken {
                    build: record.number,
                    previous,
                    successor,
                });
            }
        } else if let Some(&root) = self.builds.keys().next() {
            // The first build added is always the root.
            return Err(HistoryError::SecondRoot {
                build: record.number,
                root,
            });
        }

        let mut tools = HashSet::new();
        for analysis in &record.analyses {
            if !tools.insert(&analysis.tool) {
                return Err(HistoryError::DuplicateTool {
                    build: record.number,
                    tool: analysis.tool.clone(),
                });
            }
        }

        if let Some(previous) = record.previous {
            self.successors.insert(previous, record.number);
        }
        self.builds.insert(record.number, record);
        Ok(())
    }

    /// Look up a build by number.
    pub fn build(&self, number: BuildNumber) -> Option<Build<'_>> {
        self.builds.get(&number).map(|record| Build {
            history: self,
            record,
        })
    }

    /// The build with the highest number.
    pub fn latest(&self) -> Option<Build<'_>> {
        self.builds.values().next_back().map(|record| Build {
            history: self,
            record,
        })
    }

    /// All builds, newest first.
    pub fn builds(&self) -> impl Iterator<Item = Build<'_>> {
        self.builds.values().rev().map(move |record| Build {
            history: self,
            record,
        })
    }

    pub fn len(&self) -> usize {
        self.builds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }
}

/// Handle to one build of a [`BuildHistory`].
#[derive(Clone, Copy)]
pub struct Build<'h> {
    history: &'h BuildHistory,
    record: &'h BuildRecord,
}

impl<'h> Build<'h> {
    pub fn number(&self) -> BuildNumber {
        self.record.number
    }

    /// Overall result, `None` while the build is running.
    pub fn result(&self) -> Option<BuildResult> {
        self.record.result
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.record.timestamp
    }

    /// The immediately preceding build, if any.
    pub fn predecessor(&self) -> Option<Build<'h>> {
        self.record
            .previous
            .and_then(|previous| self.history.build(previous))
    }

    /// All earlier builds, nearest first.
    ///
    /// # Example
    ///
    /// ```
    /// use refscope::core::types::{BuildNumber, BuildResult};
    /// use refscope::history::{BuildHistory, BuildRecord};
    ///
    /// let n = |n| BuildNumber::new(n).unwrap();
    /// let mut history = BuildHistory::new("job");
    /// history.add_build(BuildRecord::new(n(1), Some(BuildResult::Success))).unwrap();
    /// history.add_build(BuildRecord::new(n(2), Some(BuildResult::Failure)).after(n(1))).unwrap();
    /// history.add_build(BuildRecord::new(n(3), None).after(n(2))).unwrap();
    ///
    /// let numbers: Vec<u32> = history
    ///     .latest()
    ///     .unwrap()
    ///     .predecessors()
    ///     .map(|b| b.number().get())
    ///     .collect();
    /// assert_eq!(numbers, vec![2, 1]);
    /// ```
    pub fn predecessors(&self) -> Predecessors<'h> {
        Predecessors {
            next: self.predecessor(),
        }
    }

    /// The outcome the given tool recorded on this build.
    pub fn outcome(&self, tool: &ToolId) -> Option<AnalysisOutcome<'h>> {
        self.outcomes().find(|outcome| outcome.tool() == tool)
    }

    /// All tool outcomes recorded on this build.
    pub fn outcomes(&self) -> impl Iterator<Item = AnalysisOutcome<'h>> {
        let owner = *self;
        let record: &'h BuildRecord = self.record;
        record
            .analyses
            .iter()
            .map(move |record| AnalysisOutcome { owner, record })
    }
}

impl PartialEq for Build<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.history, other.history) && self.record.number == other.record.number
    }
}

impl Eq for Build<'_> {}

impl std::fmt::Debug for Build<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Build")
            .field("job", &self.history.job)
            .field("number", &self.record.number)
            .field("result", &self.record.result)
            .finish()
    }
}

impl std::fmt::Display for Build<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.history.job, self.record.number)
    }
}

/// Iterator over the predecessors of a build, nearest first.
pub struct Predecessors<'h> {
    next: Option<Build<'h>>,
}

impl<'h> Iterator for Predecessors<'h> {
    type Item = Build<'h>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.predecessor();
        Some(current)
    }
}

/// Handle to the outcome one tool recorded on a build.
#[derive(Clone, Copy)]
pub struct AnalysisOutcome<'h> {
    owner: Build<'h>,
    record: &'h AnalysisRecord,
}

impl<'h> AnalysisOutcome<'h> {
    pub fn tool(&self) -> &'h ToolId {
        &self.record.tool
    }

    /// Whether the tool's own run passed its criteria.
    pub fn is_successful(&self) -> bool {
        self.record.successful
    }

    /// The recorded issues, if they were kept.
    pub fn result(&self) -> Option<&'h AnalysisResult> {
        self.record.result.as_ref()
    }

    /// The build this outcome belongs to.
    pub fn owner(&self) -> Build<'h> {
        self.owner
    }
}

impl std::fmt::Debug for AnalysisOutcome<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisOutcome")
            .field("owner", &self.owner.number())
            .field("tool", &self.record.tool)
            .field("successful", &self.record.successful)
            .field("has_result", &self.record.result.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::issues::IssueBuilder;

    fn n(number: u32) -> BuildNumber {
        BuildNumber::new(number).unwrap()
    }

    fn tool() -> ToolId {
        ToolId::new("pmd").unwrap()
    }

    #[test]
    fn empty_history_has_no_latest() {
        let history = BuildHistory::new("job");
        assert!(history.latest().is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn first_build_has_no_predecessor() {
        let mut history = BuildHistory::new("job");
        history.add_build(BuildRecord::new(n(1), None)).unwrap();

        let build = history.latest().unwrap();
        assert!(build.predecessor().is_none());
        assert_eq!(build.predecessors().count(), 0);
    }

    #[test]
    fn unknown_predecessor_rejected() {
        let mut history = BuildHistory::new("job");
        let err = history
            .add_build(BuildRecord::new(n(2), None).after(n(1)))
            .unwrap_err();
        assert!(matches!(err, HistoryError::UnknownPredecessor { .. }));
    }

    #[test]
    fn newer_predecessor_rejected() {
        let mut history = BuildHistory::new("job");
        history.add_build(BuildRecord::new(n(5), None)).unwrap();
        let err = history
            .add_build(BuildRecord::new(n(3), None).after(n(5)))
            .unwrap_err();
        assert!(matches!(err, HistoryError::PredecessorNotOlder { .. }));

        let err = history
            .add_build(BuildRecord::new(n(5), None))
            .unwrap_err();
        assert!(matches!(err, HistoryError::DuplicateBuild(_)));
    }

    #[test]
    fn forked_chain_rejected() {
        let mut history = BuildHistory::new("job");
        history.add_build(BuildRecord::new(n(1), None)).unwrap();
        history.add_build(BuildRecord::new(n(2), None).after(n(1))).unwrap();

        let err = history
            .add_build(BuildRecord::new(n(3), None).after(n(1)))
            .unwrap_err();
        assert!(matches!(
            err,
            HistoryError::PredecessorTaken { successor, .. } if successor == n(2)
        ));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn second_root_rejected() {
        let mut history = BuildHistory::new("job");
        history.add_build(BuildRecord::new(n(1), None)).unwrap();

        let err = history.add_build(BuildRecord::new(n(2), None)).unwrap_err();
        assert!(matches!(err, HistoryError::SecondRoot { root, .. } if root == n(1)));
    }

    #[test]
    fn duplicate_tool_rejected() {
        let mut history = BuildHistory::new("job");
        let record = BuildRecord::new(n(1), None)
            .with_analysis(tool(), true, None)
            .with_analysis(tool(), false, None);
        let err = history.add_build(record).unwrap_err();
        assert!(matches!(err, HistoryError::DuplicateTool { .. }));
        assert!(history.is_empty());
    }

    #[test]
    fn outcome_owner_is_build() {
        let mut history = BuildHistory::new("job");
        let issues = IssueSet::from_vec(vec![IssueBuilder::new().set_category("x").build()]);
        history
            .add_build(BuildRecord::new(n(1), Some(BuildResult::Success)).with_analysis(
                tool(),
                true,
                Some(AnalysisResult::new(issues.clone())),
            ))
            .unwrap();

        let build = history.build(n(1)).unwrap();
        let outcome = build.outcome(&tool()).unwrap();
        assert_eq!(outcome.owner(), build);
        assert!(outcome.is_successful());
        assert_eq!(outcome.result().unwrap().issues(), &issues);
        assert!(build.outcome(&ToolId::new("cpd").unwrap()).is_none());
    }

    #[test]
    fn builds_from_different_histories_differ() {
        let mut a = BuildHistory::new("job");
        let mut b = BuildHistory::new("job");
        a.add_build(BuildRecord::new(n(1), None)).unwrap();
        b.add_build(BuildRecord::new(n(1), None)).unwrap();

        assert_ne!(a.latest().unwrap(), b.latest().unwrap());
        assert_eq!(a.latest().unwrap(), a.build(n(1)).unwrap());
    }

    #[test]
    fn builds_iterate_newest_first() {
        let mut history = BuildHistory::new("job");
        history.add_build(BuildRecord::new(n(1), None)).unwrap();
        history.add_build(BuildRecord::new(n(4), None).after(n(1))).unwrap();

        let numbers: Vec<u32> = history.builds().map(|b| b.number().get()).collect();
        assert_eq!(numbers, vec![4, 1]);
    }

    #[test]
    fn history_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BuildHistory>();
        assert_send_sync::<Build<'static>>();
    }
}
