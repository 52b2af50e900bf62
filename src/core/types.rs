//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`BuildNumber`] - Positive build number within one job
//! - [`ToolId`] - Validated static analysis tool identifier
//! - [`BuildResult`] - Overall outcome of a finished build
//! - [`Fingerprint`] - Stable hash identifying an issue across builds
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use refscope::core::types::{BuildNumber, BuildResult, ToolId};
//!
//! let number = BuildNumber::new(42).unwrap();
//! let tool = ToolId::new("checkstyle").unwrap();
//! let result: BuildResult = "UNSTABLE".parse().unwrap();
//!
//! assert_eq!(number.to_string(), "#42");
//! assert_eq!(tool.as_str(), "checkstyle");
//! assert!(result.is_worse_than(BuildResult::Success));
//!
//! // Invalid constructions fail at creation time
//! assert!(BuildNumber::new(0).is_err());
//! assert!(ToolId::new("Check Style").is_err());
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid build number: {0}")]
    InvalidBuildNumber(String),

    #[error("invalid tool id: {0}")]
    InvalidToolId(String),

    #[error("invalid build result: {0}")]
    InvalidBuildResult(String),
}

/// A build number within a job.
///
/// Build numbers start at 1 and grow with every execution, so a predecessor
/// always carries a smaller number than its successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BuildNumber(u32);

impl BuildNumber {
    /// Create a new build number.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBuildNumber` for zero.
    pub fn new(number: u32) -> Result<Self, TypeError> {
        if number == 0 {
            return Err(TypeError::InvalidBuildNumber(
                "build numbers start at 1".into(),
            ));
        }
        Ok(Self(number))
    }

    /// Get the raw number.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for BuildNumber {
    type Error = TypeError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<BuildNumber> for u32 {
    fn from(number: BuildNumber) -> Self {
        number.0
    }
}

impl FromStr for BuildNumber {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix('#').unwrap_or(s);
        let n = trimmed
            .parse::<u32>()
            .map_err(|e| TypeError::InvalidBuildNumber(format!("'{s}': {e}")))?;
        Self::new(n)
    }
}

impl std::fmt::Display for BuildNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A validated static analysis tool identifier.
///
/// Tool ids are used as lookup keys for the outcome a tool recorded on a
/// build, so they are restricted to a URL and file-name safe alphabet:
/// - Cannot be empty
/// - Lowercase ASCII letters, digits, `-`, `_` and `.` only
/// - Must start with a letter or digit
///
/// # Example
///
/// ```
/// use refscope::core::types::ToolId;
///
/// assert!(ToolId::new("spotbugs").is_ok());
/// assert!(ToolId::new("eslint-2.x").is_ok());
///
/// assert!(ToolId::new("").is_err());
/// assert!(ToolId::new("-pmd").is_err());
/// assert!(ToolId::new("PMD").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolId(String);

impl ToolId {
    /// Create a new validated tool id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidToolId` if the id violates the rules above.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    fn validate(id: &str) -> Result<(), TypeError> {
        let first = id
            .chars()
            .next()
            .ok_or_else(|| TypeError::InvalidToolId("tool id cannot be empty".into()))?;

        if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
            return Err(TypeError::InvalidToolId(format!(
                "tool id '{id}' must start with a lowercase letter or digit"
            )));
        }

        if let Some(c) = id
            .chars()
            .find(|&c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.')))
        {
            return Err(TypeError::InvalidToolId(format!(
                "tool id '{id}' cannot contain '{c}'"
            )));
        }

        Ok(())
    }

    /// Get the tool id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ToolId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ToolId> for String {
    fn from(id: ToolId) -> Self {
        id.0
    }
}

impl FromStr for ToolId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ToolId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Overall outcome of a finished build.
///
/// A build that is still running has no result; that state is modelled as
/// `Option<BuildResult>` by the history types rather than as a variant here.
///
/// Variants are ordered from best to worst, matching the order CI servers use
/// when combining results (`SUCCESS < UNSTABLE < FAILURE < NOT_BUILT < ABORTED`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    /// The build finished without problems.
    Success,
    /// The build finished but tests or quality gates reported problems.
    Unstable,
    /// The build failed.
    Failure,
    /// The build was skipped, e.g. because an upstream stage failed.
    NotBuilt,
    /// The build was interrupted.
    Aborted,
}

impl BuildResult {
    /// All results, best first.
    pub const ALL: [BuildResult; 5] = [
        BuildResult::Success,
        BuildResult::Unstable,
        BuildResult::Failure,
        BuildResult::NotBuilt,
        BuildResult::Aborted,
    ];

    /// Canonical upper-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            BuildResult::Success => "SUCCESS",
            BuildResult::Unstable => "UNSTABLE",
            BuildResult::Failure => "FAILURE",
            BuildResult::NotBuilt => "NOT_BUILT",
            BuildResult::Aborted => "ABORTED",
        }
    }

    /// Whether this result is at least as good as `other`.
    pub fn is_better_or_equal_to(self, other: BuildResult) -> bool {
        self <= other
    }

    /// Whether this result is strictly worse than `other`.
    pub fn is_worse_than(self, other: BuildResult) -> bool {
        self > other
    }
}

impl FromStr for BuildResult {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuildResult::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypeError::InvalidBuildResult(s.to_string()))
    }
}

impl std::fmt::Display for BuildResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stable hash identifying an issue independent of its position.
///
/// Line numbers shift between builds as code is edited around a finding, so
/// the fingerprint is computed over the fields that survive such edits: the
/// file, category, type and message. Two issues with equal fingerprints are
/// considered the same finding when computing deltas.
///
/// # Example
///
/// ```
/// use refscope::core::types::Fingerprint;
///
/// let a = Fingerprint::compute(&["src/lib.rs", "style", "LineLength", "line too long"]);
/// let b = Fingerprint::compute(&["src/lib.rs", "style", "LineLength", "line too long"]);
/// assert_eq!(a, b);
/// assert_eq!(a.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute a fingerprint from an ordered list of identity fields.
    ///
    /// Fields are separated by a NUL byte so that `["ab", "c"]` and
    /// `["a", "bc"]` hash differently.
    pub fn compute(fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for field in fields {
            hasher.update(field.as_bytes());
            hasher.update(b"\0");
        }

        Self(hex::encode(hasher.finalize()))
    }

    /// Wrap an externally supplied fingerprint, e.g. one recorded by a parser.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Get the fingerprint as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
