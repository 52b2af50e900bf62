//! core::issues
//!
//! Static analysis findings and the ordered sets that hold them.
//!
//! # Equality
//!
//! Every [`Issue`] carries a random `id` so that a single finding can be
//! addressed in reports, but the id is not part of equality: two issues are
//! equal when their content (location, category, type, severity, message,
//! fingerprint) is equal. [`IssueSet`] equality is element-wise in order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::types::Fingerprint;

/// Severity of a finding, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "HIGH")]
    WarningHigh,
    #[serde(rename = "NORMAL")]
    WarningNormal,
    #[serde(rename = "LOW")]
    WarningLow,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::WarningNormal
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Error => "ERROR",
            Severity::WarningHigh => "HIGH",
            Severity::WarningNormal => "NORMAL",
            Severity::WarningLow => "LOW",
        };
        f.write_str(name)
    }
}

/// A single static analysis finding.
///
/// Construct via [`IssueBuilder`]. Deserialized issues pass through the
/// builder too, so parsed and built findings normalize the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawIssue")]
pub struct Issue {
    id: Uuid,
    file_name: String,
    category: String,
    #[serde(rename = "type")]
    issue_type: String,
    severity: Severity,
    line_start: u32,
    line_end: u32,
    column_start: u32,
    column_end: u32,
    message: String,
    fingerprint: Fingerprint,
}

/// Wire form of an [`Issue`]; every field is optional.
#[derive(Deserialize)]
struct RawIssue {
    #[serde(default)]
    id: Option<Uuid>,
    #[serde(default)]
    file_name: String,
    #[serde(default)]
    category: String,
    #[serde(default, rename = "type")]
    issue_type: String,
    #[serde(default)]
    severity: Severity,
    #[serde(default)]
    line_start: u32,
    #[serde(default)]
    line_end: u32,
    #[serde(default)]
    column_start: u32,
    #[serde(default)]
    column_end: u32,
    #[serde(default)]
    message: String,
    #[serde(default)]
    fingerprint: Option<Fingerprint>,
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        let mut builder = IssueBuilder::new()
            .set_file_name(raw.file_name)
            .set_category(raw.category)
            .set_type(raw.issue_type)
            .set_severity(raw.severity)
            .set_line_start(raw.line_start)
            .set_line_end(raw.line_end)
            .set_column_start(raw.column_start)
            .set_column_end(raw.column_end)
            .set_message(raw.message);
        if let Some(fingerprint) = raw.fingerprint {
            builder = builder.set_fingerprint(fingerprint);
        }

        let mut issue = builder.build();
        if let Some(id) = raw.id {
            issue.id = id;
        }
        issue
    }
}

impl Issue {
    /// Unique id of this finding. Not part of equality.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn issue_type(&self) -> &str {
        &self.issue_type
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn line_start(&self) -> u32 {
        self.line_start
    }

    pub fn line_end(&self) -> u32 {
        self.line_end
    }

    pub fn column_start(&self) -> u32 {
        self.column_start
    }

    pub fn column_end(&self) -> u32 {
        self.column_end
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The recorded fingerprint, or the one computed from file, category,
    /// type and message when none was given.
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
}

impl PartialEq for Issue {
    fn eq(&self, other: &Self) -> bool {
        self.file_name == other.file_name
            && self.category == other.category
            && self.issue_type == other.issue_type
            && self.severity == other.severity
            && self.line_start == other.line_start
            && self.line_end == other.line_end
            && self.column_start == other.column_start
            && self.column_end == other.column_end
            && self.message == other.message
            && self.fingerprint() == other.fingerprint()
    }
}

impl Eq for Issue {}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file_name, self.line_start)?;
        if self.line_end > self.line_start {
            write!(f, "-{}", self.line_end)?;
        }
        write!(f, " [{}]", self.severity)?;
        if !self.category.is_empty() {
            write!(f, " {}", self.category)?;
        }
        if !self.issue_type.is_empty() {
            write!(f, "/{}", self.issue_type)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

/// Fluent builder for [`Issue`].
///
/// Unset line ends default to the line start, and a fingerprint is computed
/// from the identity fields unless one was supplied.
///
/// # Example
///
/// ```
/// use refscope::core::issues::{IssueBuilder, Severity};
///
/// let issue = IssueBuilder::new()
///     .set_file_name("src/main.rs")
///     .set_category("style")
///     .set_line_start(10)
///     .set_severity(Severity::WarningHigh)
///     .build();
///
/// assert_eq!(issue.line_end(), 10);
/// assert_eq!(issue.severity(), Severity::WarningHigh);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IssueBuilder {
    file_name: String,
    category: String,
    issue_type: String,
    severity: Severity,
    line_start: u32,
    line_end: u32,
    column_start: u32,
    column_end: u32,
    message: String,
    fingerprint: Option<Fingerprint>,
}

impl IssueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn set_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn set_type(mut self, issue_type: impl Into<String>) -> Self {
        self.issue_type = issue_type.into();
        self
    }

    pub fn set_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn set_line_start(mut self, line: u32) -> Self {
        self.line_start = line;
        self
    }

    pub fn set_line_end(mut self, line: u32) -> Self {
        self.line_end = line;
        self
    }

    pub fn set_column_start(mut self, column: u32) -> Self {
        self.column_start = column;
        self
    }

    pub fn set_column_end(mut self, column: u32) -> Self {
        self.column_end = column;
        self
    }

    pub fn set_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn set_fingerprint(mut self, fingerprint: Fingerprint) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    /// Build the issue with a fresh id.
    pub fn build(self) -> Issue {
        let fingerprint = self.fingerprint.unwrap_or_else(|| {
            Fingerprint::compute(&[
                &self.file_name,
                &self.category,
                &self.issue_type,
                &self.message,
            ])
        });
        Issue {
            id: Uuid::new_v4(),
            file_name: self.file_name,
            category: self.category,
            issue_type: self.issue_type,
            severity: self.severity,
            line_start: self.line_start,
            line_end: self.line_end.max(self.line_start),
            column_start: self.column_start,
            column_end: self.column_end.max(self.column_start),
            message: self.message,
            fingerprint,
        }
    }
}

/// An ordered collection of issues reported for one build and tool.
///
/// An empty set is the neutral value for "no reference": callers never have
/// to distinguish a missing reference from one without findings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueSet {
    issues: Vec<Issue>,
}

impl IssueSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set from issues, keeping their order.
    pub fn from_vec(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// Append an issue.
    pub fn add(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.issues.iter()
    }

    /// Number of issues with the given severity.
    pub fn size_of(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Issue counts per severity, most severe first. Severities without
    /// issues are omitted.
    pub fn by_severity(&self) -> BTreeMap<Severity, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            *counts.entry(issue.severity).or_insert(0) += 1;
        }
        counts
    }
}

impl FromIterator<Issue> for IssueSet {
    fn from_iter<T: IntoIterator<Item = Issue>>(iter: T) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl IntoIterator for IssueSet {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl<'a> IntoIterator for &'a IssueSet {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(category: &str, line: u32) -> Issue {
        IssueBuilder::new()
            .set_file_name("Main.java")
            .set_category(category)
            .set_line_start(line)
            .build()
    }

    #[test]
    fn equality_ignores_id() {
        let a = issue("testCompany", 1);
        let b = issue("testCompany", 1);
        assert_ne!(a.id(), b.id());
        assert_eq!(a, b);
    }

    #[test]
    fn equality_includes_location() {
        assert_ne!(issue("style", 1), issue("style", 2));
    }

    #[test]
    fn line_end_defaults_to_line_start() {
        let issue = IssueBuilder::new().set_line_start(12).build();
        assert_eq!(issue.line_end(), 12);

        let ranged = IssueBuilder::new().set_line_start(12).set_line_end(15).build();
        assert_eq!(ranged.line_end(), 15);
    }

    #[test]
    fn fingerprint_ignores_lines() {
        assert_eq!(issue("style", 1).fingerprint(), issue("style", 40).fingerprint());
        assert_ne!(issue("style", 1).fingerprint(), issue("naming", 1).fingerprint());
    }

    #[test]
    fn empty_sets_are_equal() {
        assert_eq!(IssueSet::new(), IssueSet::default());
        assert!(IssueSet::new().is_empty());
    }

    #[test]
    fn set_equality_is_ordered_content() {
        let a = IssueSet::from_vec(vec![issue("a", 1), issue("b", 2)]);
        let b = IssueSet::from_vec(vec![issue("a", 1), issue("b", 2)]);
        let reversed = IssueSet::from_vec(vec![issue("b", 2), issue("a", 1)]);
        assert_eq!(a, b);
        assert_ne!(a, reversed);
    }

    #[test]
    fn counts_by_severity() {
        let mut set = IssueSet::new();
        set.add(IssueBuilder::new().set_severity(Severity::Error).build());
        set.add(IssueBuilder::new().set_severity(Severity::WarningLow).build());
        set.add(IssueBuilder::new().set_severity(Severity::WarningLow).build());

        assert_eq!(set.len(), 3);
        assert_eq!(set.size_of(Severity::WarningLow), 2);
        assert_eq!(set.size_of(Severity::WarningHigh), 0);

        let counts = set.by_severity();
        assert_eq!(counts.get(&Severity::Error), Some(&1));
        assert_eq!(counts.keys().next(), Some(&Severity::Error));
    }

    #[test]
    fn deserializes_without_id_or_fingerprint() {
        let json = r#"[{"file_name": "a.c", "category": "cert", "line_start": 3, "severity": "HIGH"}]"#;
        let set: IssueSet = serde_json::from_str(json).unwrap();
        let first = set.iter().next().unwrap();

        assert_eq!(first.severity(), Severity::WarningHigh);
        assert_eq!(
            first.fingerprint(),
            IssueBuilder::new()
                .set_file_name("a.c")
                .set_category("cert")
                .build()
                .fingerprint()
        );
    }

    #[test]
    fn parsed_issue_equals_built_issue() {
        let json = r#"[{"file_name": "a.rs", "line_start": 10, "column_start": 4}]"#;
        let set: IssueSet = serde_json::from_str(json).unwrap();
        let parsed = set.iter().next().unwrap();

        let built = IssueBuilder::new()
            .set_file_name("a.rs")
            .set_line_start(10)
            .set_column_start(4)
            .build();

        assert_eq!(parsed.line_end(), 10);
        assert_eq!(parsed.column_end(), 4);
        assert_eq!(parsed, &built);
    }

    #[test]
    fn serialized_issue_keeps_id_and_fingerprint() {
        let issue = IssueBuilder::new()
            .set_file_name("a.rs")
            .set_fingerprint(Fingerprint::from_raw("custom"))
            .build();
        let json = serde_json::to_string(&issue).unwrap();
        let reparsed: Issue = serde_json::from_str(&json).unwrap();

        assert_eq!(reparsed.id(), issue.id());
        assert_eq!(reparsed.fingerprint().as_str(), "custom");
        assert_eq!(reparsed, issue);
    }

    #[test]
    fn display_includes_range_and_message() {
        let issue = IssueBuilder::new()
            .set_file_name("a.c")
            .set_line_start(3)
            .set_line_end(5)
            .set_category("cert")
            .set_type("INT31")
            .set_message("narrowing conversion")
            .build();
        assert_eq!(
            issue.to_string(),
            "a.c:3-5 [NORMAL] cert/INT31: narrowing conversion"
        );
    }
}
