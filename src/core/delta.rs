//! core::delta
//!
//! Comparison of a build's issues against the issues of its reference build.
//!
//! # Matching
//!
//! Each current issue is matched against the reference issues in two passes:
//!
//! 1. Equal content (location, category, type, severity, message)
//! 2. Equal fingerprint, which survives line shifts
//!
//! A reference issue is consumed by at most one match. Unmatched current
//! issues are *new*, unmatched reference issues are *fixed*, matched current
//! issues are *outstanding*.

use serde::Serialize;

use super::issues::{Issue, IssueSet};

/// New, fixed and outstanding issues of a build relative to its reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueDelta {
    /// Issues of the current build without counterpart in the reference.
    pub new: IssueSet,
    /// Issues of the reference build that disappeared.
    pub fixed: IssueSet,
    /// Issues present in both builds (taken from the current build).
    pub outstanding: IssueSet,
}

impl IssueDelta {
    /// Partition `current` against `reference`.
    ///
    /// An empty reference (no reference build found) marks every current
    /// issue as new.
    pub fn compute(current: &IssueSet, reference: &IssueSet) -> Self {
        let current: Vec<&Issue> = current.iter().collect();
        let mut remaining: Vec<Option<&Issue>> = reference.iter().map(Some).collect();
        let mut matched = vec![false; current.len()];

        // Pass 1: exact content
        for (i, issue) in current.iter().enumerate() {
            if let Some(slot) = remaining.iter_mut().find(|r| r.is_some_and(|r| r == *issue)) {
                *slot = None;
                matched[i] = true;
            }
        }

        // Pass 2: fingerprint
        for (i, issue) in current.iter().enumerate() {
            if matched[i] {
                continue;
            }
            let fingerprint = issue.fingerprint();
            if let Some(slot) = remaining
                .iter_mut()
                .find(|r| r.is_some_and(|r| r.fingerprint() == fingerprint))
            {
                *slot = None;
                matched[i] = true;
            }
        }

        let mut delta = IssueDelta::default();
        for (issue, matched) in current.into_iter().zip(matched) {
            if matched {
                delta.outstanding.add(issue.clone());
            } else {
                delta.new.add(issue.clone());
            }
        }
        delta.fixed = remaining.into_iter().flatten().cloned().collect();

        log::debug!(
            "delta: {} new, {} fixed, {} outstanding",
            delta.new.len(),
            delta.fixed.len(),
            delta.outstanding.len()
        );

        delta
    }

    /// Whether the build introduced no new issues.
    pub fn is_clean(&self) -> bool {
        self.new.is_empty()
    }
}
