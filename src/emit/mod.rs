//! Artifact emitters.
//!
//! Two pure consumers of the same formatted light/dark sets:
//!
//! - [`web`] - custom-property stylesheet with a dark override block
//! - [`native`] - flattened constant tables plus a theme selector
//!
//! Neither emitter touches the filesystem; writing is the pipeline's job.

mod native;
mod web;

use crate::codegen::FormattedTheme;

pub use native::{NativeTables, emit_tables};
pub use web::{Declaration, Stylesheet, emit_stylesheet};

/// Default header line for both artifacts.
pub const DEFAULT_HEADER: &str = "Generated by tokensmith. Do not edit.";

/// Default selector of the dark override block.
pub const DEFAULT_DARK_SELECTOR: &str = "[data-theme=\"dark\"]";

/// Rendering options shared by both emitters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Comment line at the top of each artifact; empty for none.
    pub header: String,
    /// Selector wrapping the dark overrides.
    pub dark_selector: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            header: DEFAULT_HEADER.to_string(),
            dark_selector: DEFAULT_DARK_SELECTOR.to_string(),
        }
    }
}

/// The in-memory output of one compiler run.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    /// Web stylesheet.
    pub stylesheet: Stylesheet,
    /// Native tables.
    pub native: NativeTables,
}

impl Artifacts {
    /// Stylesheet text.
    pub fn css(&self) -> String {
        self.stylesheet.render()
    }

    /// Native module text.
    pub fn native_module(&self) -> String {
        self.native.render_module()
    }

    /// Native tables as pretty JSON, newline-terminated.
    pub fn native_json(&self) -> String {
        format!("{:#}\n", self.native.to_json())
    }
}

/// Run both emitters.
///
/// With the `parallel` feature the emitters run on the rayon pool; they share
/// only immutable inputs.
pub fn emit(light: &FormattedTheme, dark: &FormattedTheme, options: &EmitOptions) -> Artifacts {
    #[cfg(feature = "parallel")]
    let (stylesheet, native) = rayon::join(
        || emit_stylesheet(light, dark, options),
        || emit_tables(light, dark, options),
    );

    #[cfg(not(feature = "parallel"))]
    let (stylesheet, native) = (
        emit_stylesheet(light, dark, options),
        emit_tables(light, dark, options),
    );

    Artifacts { stylesheet, native }
}
