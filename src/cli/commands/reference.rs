//! reference and issues commands - Show the reference build and its issues

use anyhow::Result;
use serde::Serialize;

use super::selection::Selection;
use crate::cli::args::SelectionArgs;
use crate::cli::Context;
use crate::core::types::BuildResult;
use crate::ui::output::{self, Verbosity};

#[derive(Serialize)]
struct ReferenceReport {
    job: String,
    tool: String,
    policy: String,
    baseline: Option<u32>,
    reference: Option<u32>,
    reference_result: Option<BuildResult>,
    reference_issues: usize,
}

/// Print the reference build of the baseline.
///
/// In quiet mode only the build number is printed, or nothing when there is
/// no reference.
pub fn reference(ctx: &Context, args: &SelectionArgs) -> Result<()> {
    let selection = Selection::resolve(ctx, args)?;
    let finder = selection.finder()?;
    let run = finder.analysis_run();

    if selection.json {
        output::json(&ReferenceReport {
            job: selection.history.job().to_string(),
            tool: selection.tool.to_string(),
            policy: selection.policy.to_string(),
            baseline: finder.baseline().map(|b| b.number().get()),
            reference: run.map(|b| b.number().get()),
            reference_result: run.and_then(|b| b.result()),
            reference_issues: finder.issues().len(),
        })?;
        return Ok(());
    }

    if ctx.verbosity() == Verbosity::Quiet {
        if let Some(run) = run {
            println!("{}", run.number().get());
        }
        return Ok(());
    }

    let verbosity = ctx.verbosity();
    match finder.baseline() {
        Some(baseline) => output::print(format!("Baseline:  {}", baseline), verbosity),
        None => output::print("Baseline:  (history is empty)", verbosity),
    }
    output::print(format!("Policy:    {}", selection.policy), verbosity);

    match run {
        Some(run) => {
            let result = run
                .result()
                .map_or_else(|| "running".to_string(), |r| r.to_string());
            output::print(format!("Reference: {} ({})", run.number(), result), verbosity);
        }
        None => output::print("Reference: no reference build", verbosity),
    }

    Ok(())
}

/// Print the issues of the reference build.
///
/// Prints nothing (exit 0) when there is no reference.
pub fn issues(ctx: &Context, args: &SelectionArgs) -> Result<()> {
    let selection = Selection::resolve(ctx, args)?;
    let issues = selection.finder()?.issues();

    if selection.json {
        output::json(&issues)?;
    } else if !issues.is_empty() {
        println!("{}", output::format_issues(&issues, ""));
    }

    Ok(())
}
