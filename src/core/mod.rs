//! core
//!
//! Core domain types, schemas, and operations for refscope.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BuildNumber, ToolId, BuildResult, Fingerprint
//! - [`issues`] - Issues and issue sets
//! - [`delta`] - New/fixed/outstanding classification against a reference
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing

pub mod config;
pub mod delta;
pub mod issues;
pub mod types;
