//! cli
//!
//! Command-line interface layer for refscope.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Initialise logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, resolves defaults
//! from [`crate::core::config`], and hands the loaded history to
//! [`crate::reference`] for the actual selection.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::{Context as _, Result};
use log::LevelFilter;
use std::path::PathBuf;

use crate::ui::output::Verbosity;

/// Execution context shared by all commands.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override
    pub cwd: Option<PathBuf>,
    /// History snapshot override
    pub history: Option<PathBuf>,
    /// Debug output enabled
    pub debug: bool,
    /// Minimal output
    pub quiet: bool,
}

impl Context {
    /// The directory config and relative paths are resolved against.
    pub fn project_dir(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(cwd) => Ok(cwd.clone()),
            None => std::env::current_dir().context("Failed to determine current directory"),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(cli.debug, cli.quiet);

    let ctx = Context {
        cwd: cli.cwd.clone(),
        history: cli.history.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Configure `env_logger` from the global flags. `RUST_LOG` still wins.
fn init_logging(debug: bool, quiet: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };

    // A second init (e.g. from tests calling `run`) is harmless.
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
