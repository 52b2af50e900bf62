//! reference
//!
//! Selection of the reference build whose issues a baseline is compared to.
//!
//! # Modules
//!
//! - [`selector`] - Lookup of a tool's outcome on a build
//! - [`finder`] - History walk and reference policies
//!
//! # Design
//!
//! The walk is implemented once in [`ReferenceFinder`]; policies are a plain
//! enum matched inside the walk. Absence at any step (no baseline, no
//! predecessor, no outcome, no result) is a value, never an error.

pub mod finder;
pub mod selector;

pub use finder::{ReferenceFinder, ReferencePolicy};
pub use selector::{ByIdResultSelector, ResultSelector};
