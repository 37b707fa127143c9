//! Literal parsing and per-target value formatting.
//!
//! # Modules
//!
//! - [`literal`] - colour/number parsing and the shared type check
//! - [`format`] - resolved value → stylesheet literal + native literal

mod format;
mod literal;

// Literals
pub use literal::{Color, format_number, format_rounded, matches_type, parse_color};

// Formatting
pub use format::{
    DEFAULT_DIMENSION_BASE, DEFAULT_DIMENSION_UNIT, FormattedTheme, FormattedToken, NativeValue, TypeFormatter,
};
