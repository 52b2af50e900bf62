//! reference::finder
//!
//! Selection of the reference build for a baseline.
//!
//! # Walk
//!
//! The search starts at the baseline's predecessor and moves backward one
//! build at a time:
//!
//! - no outcome for the tool: skip
//! - outcome not successful: skip
//! - outcome successful but rejected by the policy: skip
//! - otherwise: the outcome's owner is the reference
//!
//! The walk ends at the first accepted build or when history runs out. It is
//! repeated on every call; nothing is cached.
//!
//! # Absence
//!
//! "No reference" is the normal state of a job's first analysed build, so it
//! is never an error: [`ReferenceFinder::analysis_run`] returns `None` and
//! [`ReferenceFinder::issues`] returns an empty set.

use crate::core::issues::IssueSet;
use crate::core::types::BuildResult;
use crate::history::{AnalysisOutcome, Build};

use super::selector::ResultSelector;

/// Rule deciding which earlier builds may serve as reference.
///
/// Both policies only ever consider builds whose tool outcome was successful;
/// the policy adds a further condition on the build itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// The nearest earlier build with a successful tool outcome, whatever
    /// the overall build result.
    PreviousRun,
    /// Like `PreviousRun`, optionally restricted to builds whose overall
    /// result is SUCCESS.
    StablePlugin {
        /// Only accept builds that passed overall
        require_overall_success: bool,
    },
}

impl ReferencePolicy {
    /// Map the two configuration flags onto a policy.
    ///
    /// `use_overall_result_as_reference` only matters for the stable policy.
    pub fn from_flags(
        use_stable_build_as_reference: bool,
        use_overall_result_as_reference: bool,
    ) -> Self {
        if use_stable_build_as_reference {
            ReferencePolicy::StablePlugin {
                require_overall_success: use_overall_result_as_reference,
            }
        } else {
            ReferencePolicy::PreviousRun
        }
    }

    /// Whether `build` is acceptable under this policy.
    pub fn accepts(&self, build: &Build<'_>) -> bool {
        match self {
            ReferencePolicy::PreviousRun => true,
            ReferencePolicy::StablePlugin {
                require_overall_success,
            } => !require_overall_success || build.result() == Some(BuildResult::Success),
        }
    }
}

impl std::fmt::Display for ReferencePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferencePolicy::PreviousRun => f.write_str("previous run"),
            ReferencePolicy::StablePlugin {
                require_overall_success: false,
            } => f.write_str("last successful analysis"),
            ReferencePolicy::StablePlugin {
                require_overall_success: true,
            } => f.write_str("last successful analysis of a successful build"),
        }
    }
}

/// Finds the reference build for a baseline.
///
/// Created per lookup and discarded afterwards.
///
/// # Example
///
/// ```
/// use refscope::core::types::{BuildNumber, BuildResult, ToolId};
/// use refscope::history::{AnalysisResult, BuildHistory, BuildRecord};
/// use refscope::reference::{ByIdResultSelector, ReferenceFinder};
///
/// let n = |n| BuildNumber::new(n).unwrap();
/// let pmd = ToolId::new("pmd").unwrap();
///
/// let mut history = BuildHistory::new("job");
/// history.add_build(
///     BuildRecord::new(n(1), Some(BuildResult::Success))
///         .with_analysis(pmd.clone(), true, Some(AnalysisResult::default())),
/// ).unwrap();
/// history.add_build(
///     BuildRecord::new(n(2), Some(BuildResult::Failure))
///         .after(n(1))
///         .with_analysis(pmd.clone(), false, None),
/// ).unwrap();
/// history.add_build(BuildRecord::new(n(3), None).after(n(2))).unwrap();
///
/// let finder = ReferenceFinder::create(
///     history.latest(),
///     Some(ByIdResultSelector::new(pmd)),
///     false,
///     false,
/// );
///
/// assert_eq!(finder.analysis_run().map(|b| b.number()), Some(n(1)));
/// assert!(finder.issues().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ReferenceFinder<'h, S> {
    baseline: Option<Build<'h>>,
    selector: Option<S>,
    policy: ReferencePolicy,
}

impl<'h, S> ReferenceFinder<'h, S>
where
    S: ResultSelector<'h>,
{
    /// Create a finder with an explicit policy.
    pub fn new(baseline: Option<Build<'h>>, selector: Option<S>, policy: ReferencePolicy) -> Self {
        Self {
            baseline,
            selector,
            policy,
        }
    }

    /// Create a finder from the two configuration flags.
    ///
    /// Uses [`ReferencePolicy::StablePlugin`] when
    /// `use_stable_build_as_reference` is set, otherwise
    /// [`ReferencePolicy::PreviousRun`]. Missing baseline or selector is
    /// allowed and simply yields no reference.
    pub fn create(
        baseline: Option<Build<'h>>,
        selector: Option<S>,
        use_stable_build_as_reference: bool,
        use_overall_result_as_reference: bool,
    ) -> Self {
        Self::new(
            baseline,
            selector,
            ReferencePolicy::from_flags(
                use_stable_build_as_reference,
                use_overall_result_as_reference,
            ),
        )
    }

    pub fn policy(&self) -> ReferencePolicy {
        self.policy
    }

    pub fn baseline(&self) -> Option<Build<'h>> {
        self.baseline
    }

    /// The reference build, or `None` if no earlier build qualifies.
    pub fn analysis_run(&self) -> Option<Build<'h>> {
        self.reference_outcome().map(|outcome| outcome.owner())
    }

    /// Issues of the reference build.
    ///
    /// Empty when there is no reference, or when the reference outcome kept
    /// no result data.
    pub fn issues(&self) -> IssueSet {
        let (Some(selector), Some(run)) = (self.selector.as_ref(), self.analysis_run()) else {
            return IssueSet::new();
        };

        selector
            .select(&run)
            .and_then(|outcome| outcome.result())
            .map(|result| result.issues().clone())
            .unwrap_or_default()
    }

    /// Walk history and return the outcome of the accepted build.
    fn reference_outcome(&self) -> Option<AnalysisOutcome<'h>> {
        let baseline = self.baseline?;
        let selector = self.selector.as_ref()?;

        for build in baseline.predecessors() {
            let Some(outcome) = selector.select(&build) else {
                log::debug!("{}: no analysis outcome, skipping", build.number());
                continue;
            };

            if !outcome.is_successful() {
                log::debug!("{}: analysis outcome not successful, skipping", build.number());
                continue;
            }

            if !self.policy.accepts(&build) {
                log::debug!(
                    "{}: rejected by policy '{}' (result {})",
                    build.number(),
                    self.policy,
                    build
                        .result()
                        .map_or_else(|| "none".to_string(), |r| r.to_string())
                );
                continue;
            }

            log::info!(
                "reference for {} is {} ({})",
                baseline.number(),
                outcome.owner().number(),
                self.policy
            );
            return Some(outcome);
        }

        log::info!("no reference found for {}", baseline.number());
        None
    }
}
