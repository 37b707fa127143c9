//! Build errors and their human-readable rendering.

mod error;
mod format;

pub use error::{Result, TokenError};
pub use format::{DiagnosticOptions, DisplayStyle, render};
