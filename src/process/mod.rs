//! Build orchestration and artifact output.
//!
//! - [`Pipeline`] - runs every stage and writes the artifacts
//! - [`write_artifacts`] - stage-then-rename persistence

mod output;
mod pipeline;

pub use output::write_artifacts;
pub use pipeline::{BuildReport, Compilation, Pipeline, Stage};
