//! Human-readable error reports.
//!
//! ```text
//! error[CyclicReferenceError]: cyclic reference in light: a -> b -> a
//!   ┌─ light
//!   │ a
//!   ╰─ b
//!   ╰─ a
//!   = help: replace one reference in the cycle with a literal value
//! ```

use std::fmt::Write;

use super::error::{MISSING_LIGHT_DEFAULT, TokenError};

// ============================================================================
// Options
// ============================================================================

/// Display style for rendered errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayStyle {
    /// Header plus theme, path trail and hint.
    #[default]
    Rich,
    /// `kind: message` on a single line.
    Short,
}

/// Options for [`render`].
///
/// ```ignore
/// let opts = DiagnosticOptions::plain().with_hints(false);
/// eprintln!("{}", render(&err, &opts));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticOptions {
    /// Whether to use ANSI colours.
    pub colored: bool,
    /// Rich or short output.
    pub style: DisplayStyle,
    /// Whether to append a help line.
    pub hints: bool,
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        Self {
            colored: true,
            style: DisplayStyle::Rich,
            hints: true,
        }
    }
}

impl DiagnosticOptions {
    /// Coloured rich output.
    pub fn colored() -> Self {
        Self::default()
    }

    /// Rich output without ANSI colours.
    pub fn plain() -> Self {
        Self {
            colored: false,
            ..Self::default()
        }
    }

    /// Single-line output.
    pub fn short() -> Self {
        Self {
            style: DisplayStyle::Short,
            hints: false,
            ..Self::default()
        }
    }

    /// Set whether to use colours.
    pub fn with_colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Set the display style.
    pub fn with_style(mut self, style: DisplayStyle) -> Self {
        self.style = style;
        self
    }

    /// Set whether to include hints.
    pub fn with_hints(mut self, hints: bool) -> Self {
        self.hints = hints;
        self
    }
}

// ============================================================================
// Gutter Characters
// ============================================================================

mod gutter {
    pub const HEADER: &str = "┌─";
    pub const BAR: &str = "│";
    pub const STEP: &str = "╰─";
}

// ============================================================================
// Coloring
// ============================================================================

#[cfg(feature = "colored-diagnostics")]
fn colorize_error(text: &str) -> String {
    use owo_colors::OwoColorize;
    text.red().bold().to_string()
}

#[cfg(feature = "colored-diagnostics")]
fn colorize_help(text: &str) -> String {
    use owo_colors::OwoColorize;
    text.cyan().to_string()
}

#[cfg(not(feature = "colored-diagnostics"))]
fn colorize_error(text: &str) -> String {
    text.to_owned()
}

#[cfg(not(feature = "colored-diagnostics"))]
fn colorize_help(text: &str) -> String {
    text.to_owned()
}

fn paint(options: &DiagnosticOptions, text: &str, f: fn(&str) -> String) -> String {
    if options.colored { f(text) } else { text.to_owned() }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render `err` as a report.
pub fn render(err: &TokenError, options: &DiagnosticOptions) -> String {
    let mut out = String::new();
    let label = paint(options, &format!("error[{}]", err.kind()), colorize_error);

    if options.style == DisplayStyle::Short {
        let _ = write!(out, "{label}: {err}");
        return out;
    }

    let _ = writeln!(out, "{label}: {err}");
    if let Some(theme) = err.theme() {
        let _ = writeln!(out, "  {} {theme}", gutter::HEADER);
    }

    let trail = err.trail();
    if let Some((first, rest)) = trail.split_first() {
        let _ = writeln!(out, "  {} {first}", gutter::BAR);
        for path in rest {
            let _ = writeln!(out, "  {} {path}", gutter::STEP);
        }
    }

    if let Some(hint) = hint(err).filter(|_| options.hints) {
        let _ = writeln!(out, "  = {}: {hint}", paint(options, "help", colorize_help));
    }

    out
}

fn hint(err: &TokenError) -> Option<String> {
    let hint = match err {
        TokenError::MalformedSource { reason, .. } if reason == MISSING_LIGHT_DEFAULT => {
            "define the same path in the light document; light values are the default for both themes".to_string()
        }
        TokenError::MalformedSource { .. } => {
            "a token is an object with both `type` and `value`; categories contain only objects".to_string()
        }
        TokenError::UnresolvedReference { defined_in, .. } if !defined_in.is_empty() => {
            "move the target into the base document or define it in this theme too".to_string()
        }
        TokenError::UnresolvedReference { .. } => "check the spelling of the referenced path".to_string(),
        TokenError::CyclicReference { .. } => "replace one reference in the cycle with a literal value".to_string(),
        TokenError::TypeMismatch {
            terminal, declared, ..
        } => format!("'{terminal}' must hold a valid {declared} value"),
        TokenError::DuplicateKey { convention, .. } => {
            format!("rename one of the paths so their {convention} identifiers differ")
        }
        TokenError::Incomplete { .. } | TokenError::Json { .. } | TokenError::Io { .. } | TokenError::Config(_) => {
            return None;
        }
    };
    Some(hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Theme, TokenPath};
    use pretty_assertions::assert_eq;

    fn path(s: &str) -> TokenPath {
        TokenPath::parse(s).unwrap()
    }

    #[test]
    fn test_render_cycle() {
        let err = TokenError::CyclicReference {
            theme: Theme::Light,
            cycle: vec![path("a"), path("b"), path("a")],
        };
        let expected = "\
error[CyclicReferenceError]: cyclic reference in light: a -> b -> a
  ┌─ light
  │ a
  ╰─ b
  ╰─ a
  = help: replace one reference in the cycle with a literal value
";
        assert_eq!(render(&err, &DiagnosticOptions::plain()), expected);
    }

    #[test]
    fn test_render_short() {
        let err = TokenError::Config("dimension_base must be positive".into());
        assert_eq!(
            render(&err, &DiagnosticOptions::short().with_colored(false)),
            "error[ConfigError]: invalid configuration: dimension_base must be positive"
        );
    }

    #[test]
    fn test_unresolved_hint_names_cross_theme() {
        let err = TokenError::UnresolvedReference {
            theme: Theme::Dark,
            from: path("control.bg"),
            target: path("surface.primary"),
            defined_in: vec![Theme::Light],
        };
        let out = render(&err, &DiagnosticOptions::plain());
        assert!(out.contains("defined only in light"));
        assert!(out.contains("help: move the target into the base document"));
    }

    #[test]
    fn test_dark_only_hint() {
        let out = render(&TokenError::missing_light_default(&path("glow")), &DiagnosticOptions::plain());
        assert!(out.contains("glow"));
        assert!(out.contains("help: define the same path in the light document"));
    }

    #[test]
    fn test_no_hints() {
        let err = TokenError::CyclicReference {
            theme: Theme::Base,
            cycle: vec![path("a"), path("a")],
        };
        let out = render(&err, &DiagnosticOptions::plain().with_hints(false));
        assert!(!out.contains("help"));
    }
}
