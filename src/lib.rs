//! refscope - Reference build selection for static analysis trends
//!
//! refscope answers one question for a CI job: which earlier build should
//! a build's static analysis issues be compared against? The chosen build
//! is the *reference*; the issues of the current build are then split into
//! new, fixed and outstanding relative to it.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to the library)
//! - [`core`] - Domain types, issues, deltas and configuration
//! - [`history`] - Read-only build history and per-tool analysis outcomes
//! - [`reference`] - Result selectors and the reference finder
//! - [`tools`] - Static analysis tools and their report parsers
//! - [`ui`] - Output formatting
//!
//! # Correctness Invariants
//!
//! 1. A build is never its own reference
//! 2. The reference is the nearest qualifying predecessor of the baseline
//! 3. Reference lookup never modifies the history
//! 4. A missing reference is a normal state, not an error

pub mod cli;
pub mod core;
pub mod history;
pub mod reference;
pub mod tools;
pub mod ui;
