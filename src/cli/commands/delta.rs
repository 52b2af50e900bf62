//! delta command - Compare a build's issues against its reference

use anyhow::Result;
use serde::Serialize;

use super::selection::Selection;
use crate::cli::args::SelectionArgs;
use crate::cli::Context;
use crate::core::delta::IssueDelta;
use crate::core::issues::IssueSet;
use crate::reference::ResultSelector;
use crate::ui::output::{self, Verbosity};

#[derive(Serialize)]
struct DeltaReport<'a> {
    baseline: Option<u32>,
    reference: Option<u32>,
    #[serde(flatten)]
    delta: &'a IssueDelta,
}

/// Print new, fixed and outstanding issues of the baseline.
pub fn delta(ctx: &Context, args: &SelectionArgs) -> Result<()> {
    let selection = Selection::resolve(ctx, args)?;
    let finder = selection.finder()?;
    let selector = selection.selector();

    // The baseline's own issues; a baseline without result compares as empty.
    let current = finder
        .baseline()
        .and_then(|baseline| selector.select(&baseline))
        .and_then(|outcome| outcome.result())
        .map(|result| result.issues().clone())
        .unwrap_or_else(IssueSet::new);

    let reference = finder.analysis_run();
    let delta = IssueDelta::compute(&current, &finder.issues());

    if selection.json {
        output::json(&DeltaReport {
            baseline: finder.baseline().map(|b| b.number().get()),
            reference: reference.map(|b| b.number().get()),
            delta: &delta,
        })?;
        return Ok(());
    }

    let verbosity = ctx.verbosity();
    match reference {
        Some(run) => output::print(format!("Reference: {}", run.number()), verbosity),
        None => output::print("Reference: no reference build", verbosity),
    }
    output::print(
        format!(
            "New: {}  Fixed: {}  Outstanding: {}",
            delta.new.len(),
            delta.fixed.len(),
            delta.outstanding.len()
        ),
        verbosity,
    );

    if verbosity == Verbosity::Quiet {
        return Ok(());
    }

    if delta.is_clean() {
        println!("No new issues");
    } else {
        let counts: Vec<String> = delta
            .new
            .by_severity()
            .into_iter()
            .map(|(severity, count)| format!("{} {}", severity, count))
            .collect();
        println!("New by severity: {}", counts.join(", "));
    }

    for (prefix, issues) in [("+ ", &delta.new), ("- ", &delta.fixed)] {
        if !issues.is_empty() {
            println!("{}", output::format_issues(issues, prefix));
        }
    }
    if verbosity == Verbosity::Debug && !delta.outstanding.is_empty() {
        println!("{}", output::format_issues(&delta.outstanding, "  "));
    }

    Ok(())
}
