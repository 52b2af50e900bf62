//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--history <file>`: Build history snapshot to read
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// refscope - Reference build selection for static analysis trends
#[derive(Parser, Debug)]
#[command(name = "refscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if refscope was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Build history snapshot (JSON); defaults to the configured path
    #[arg(long, global = true, value_name = "FILE")]
    pub history: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Options shared by the commands that select a reference build.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Tool whose results are compared; defaults to the configured tool
    #[arg(long, short = 't', value_name = "ID")]
    pub tool: Option<String>,

    /// Baseline build number; defaults to the newest build
    #[arg(long, short = 'b', value_name = "N")]
    pub build: Option<String>,

    /// Use the stable policy, which honours --overall-success
    #[arg(long, conflicts_with = "previous")]
    pub stable: bool,

    /// Use the previous-run policy, which ignores the overall build result
    #[arg(long)]
    pub previous: bool,

    /// With --stable, also require the overall build result to be SUCCESS
    #[arg(long, conflicts_with = "no_overall_success")]
    pub overall_success: bool,

    /// With --stable, accept any overall build result (overrides the config)
    #[arg(long)]
    pub no_overall_success: bool,

    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the reference build for a baseline
    #[command(
        name = "reference",
        long_about = "Show the reference build for a baseline.\n\n\
            Walks backward from the build before the baseline and picks the \
            nearest build whose analysis outcome for the tool was successful. \
            With --stable and --overall-success the build must also have passed \
            overall. Prints 'no reference build' when nothing qualifies, which \
            is the normal state for the first analysed build.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Reference of the newest build for checkstyle
    refscope reference --tool checkstyle

    # Reference of build 42, only considering fully green builds
    refscope reference --tool checkstyle --build 42 --stable --overall-success

    # Machine-readable output
    refscope reference --tool checkstyle --json"
    )]
    Reference {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Print the issues of the reference build
    #[command(name = "issues")]
    Issues {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Compare a build's issues against its reference
    #[command(
        name = "delta",
        long_about = "Compare a build's issues against its reference build.\n\n\
            Issues are reported as new (only in the baseline), fixed (only in the \
            reference) or outstanding (in both). Without a reference build every \
            issue of the baseline is new.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Summary for the newest build
    refscope delta --tool pmd

    # Fail a CI step when new issues appear
    refscope delta --tool pmd --stable --json | jq -e '.new | length == 0'"
    )]
    Delta {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// List registered tools
    #[command(name = "tools")]
    Tools,

    /// Parse a tool report and print its issues
    #[command(name = "scan")]
    Scan {
        /// Report file to parse
        report: PathBuf,

        /// Tool whose parser reads the report
        #[arg(long, short = 't', value_name = "ID")]
        tool: String,

        /// The report is a console log
        #[arg(long)]
        console: bool,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for refscope commands.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    refscope completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    refscope completion zsh >> ~/.zshrc

    # Fish
    refscope completion fish > ~/.config/fish/completions/refscope.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn selection_flags_parse() {
        let cli = Cli::try_parse_from([
            "refscope",
            "--history",
            "h.json",
            "reference",
            "--tool",
            "pmd",
            "--build",
            "7",
            "--stable",
            "--overall-success",
        ])
        .unwrap();

        assert_eq!(cli.history, Some(PathBuf::from("h.json")));
        match cli.command {
            Command::Reference { selection } => {
                assert_eq!(selection.tool.as_deref(), Some("pmd"));
                assert_eq!(selection.build.as_deref(), Some("7"));
                assert!(selection.stable);
                assert!(selection.overall_success);
                assert!(!selection.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn overall_success_flags_conflict() {
        let result = Cli::try_parse_from([
            "refscope",
            "reference",
            "--overall-success",
            "--no-overall-success",
        ]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["refscope", "reference", "--no-overall-success"]).unwrap();
        match cli.command {
            Command::Reference { selection } => {
                assert!(selection.no_overall_success);
                assert!(!selection.overall_success);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn stable_conflicts_with_previous() {
        let result = Cli::try_parse_from(["refscope", "delta", "--stable", "--previous"]);
        assert!(result.is_err());
    }
}
