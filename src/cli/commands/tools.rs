//! tools and scan commands - Inspect registered tools

use anyhow::{bail, Context as _, Result};
use std::path::Path;

use crate::cli::Context;
use crate::tools::ToolRegistry;
use crate::ui::output::{self, Verbosity};

/// List registered tools.
pub fn tools(ctx: &Context) -> Result<()> {
    let registry = ToolRegistry::builtin();

    for tool in registry.iter() {
        if ctx.verbosity() == Verbosity::Quiet {
            println!("{}", tool.id());
        } else {
            let console = if tool.can_scan_console_log() {
                ""
            } else {
                " (report files only)"
            };
            println!("{:<12} {}{}", tool.id(), tool.display_name(), console);
        }
    }

    Ok(())
}

/// Parse a report with a registered tool and print the issues found.
pub fn scan(ctx: &Context, report: &Path, tool: &str, console: bool) -> Result<()> {
    let registry = ToolRegistry::builtin();
    let tool = registry.require(tool)?;

    if console && !tool.can_scan_console_log() {
        bail!(crate::tools::ParseError::ConsoleLogUnsupported(tool.id().clone()));
    }

    let path = ctx.project_dir()?.join(report);
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read report {}", path.display()))?;
    let issues = tool.create_parser().parse(&contents)?;

    output::print(
        format!("{}: {} issues", tool.display_name(), issues.len()),
        ctx.verbosity(),
    );
    if !issues.is_empty() {
        println!("{}", output::format_issues(&issues, ""));
    }

    Ok(())
}
