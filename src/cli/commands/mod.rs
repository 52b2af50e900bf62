//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves its arguments against the loaded configuration
//! 2. Loads the build history and selects the reference
//! 3. Formats and displays output
//!
//! Handlers never modify the history.

mod completion;
mod delta;
mod reference;
mod selection;
mod tools;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use delta::delta;
pub use reference::{issues, reference};
pub use tools::{scan, tools};

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Reference { selection } => reference(ctx, &selection),
        Command::Issues { selection } => issues(ctx, &selection),
        Command::Delta { selection } => delta(ctx, &selection),
        Command::Tools => tools(ctx),
        Command::Scan {
            report,
            tool,
            console,
        } => scan(ctx, &report, &tool, console),
        Command::Completion { shell } => completion(shell),
    }
}
