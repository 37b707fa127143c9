//! Build error type.

use std::path::PathBuf;

use thiserror::Error;

use crate::normalize::Convention;
use crate::token::{format_chain, Theme, TokenPath, TokenType};

/// Result alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, TokenError>;

/// Error type for every stage of the token build.
///
/// All variants are fatal: the pipeline aborts on the first one and writes
/// no artifacts. Each variant carries enough path and chain context to fix
/// the source without re-running.
///
/// # Example
///
/// ```ignore
/// match Pipeline::new(config).build() {
///     Ok(report) => println!("{report}"),
///     Err(TokenError::CyclicReference { cycle, .. }) => {
///         eprintln!("cycle through {} tokens", cycle.len() - 1);
///     }
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum TokenError {
    /// A token entry is missing `type`/`value`, has an invalid shape,
    /// duplicates a path already defined in its theme's scope, or is a dark
    /// path with no light default.
    #[error("malformed source in {theme} at '{path}': {reason}")]
    MalformedSource {
        /// Theme of the offending document.
        theme: Theme,
        /// Dotted location within the document (may be partial).
        path: String,
        /// What is wrong with the entry.
        reason: String,
    },

    /// A reference points at a path absent from its theme's scope.
    #[error(
        "unresolved reference in {theme}: '{from}' refers to '{target}'{}",
        cross_theme_hint(.defined_in)
    )]
    UnresolvedReference {
        /// Theme being resolved.
        theme: Theme,
        /// Token holding the reference.
        from: TokenPath,
        /// Missing target path.
        target: TokenPath,
        /// Themes outside the scope that do define `target`.
        defined_in: Vec<Theme>,
    },

    /// The reference relation contains a cycle.
    #[error("cyclic reference in {theme}: {}", format_chain(.cycle))]
    CyclicReference {
        /// Theme being resolved.
        theme: Theme,
        /// Ordered cycle, first path repeated at the end.
        cycle: Vec<TokenPath>,
    },

    /// The terminal value does not match the originating token's type.
    #[error(
        "type mismatch in {theme}: '{path}' is declared {declared} but resolves to {value} (via {})",
        format_chain(.chain)
    )]
    TypeMismatch {
        /// Theme being resolved.
        theme: Theme,
        /// Declaring token.
        path: TokenPath,
        /// Declared type of `path`.
        declared: TokenType,
        /// Token holding the terminal literal.
        terminal: TokenPath,
        /// The offending terminal value, as written.
        value: String,
        /// Full resolution chain from `path` to `terminal`.
        chain: Vec<TokenPath>,
    },

    /// Two distinct paths flatten to the same identifier.
    #[error(
        "duplicate {convention} identifier '{identifier}' in {theme}: '{first}' and '{second}'"
    )]
    DuplicateKey {
        /// Theme being normalized.
        theme: Theme,
        /// Naming convention that collided.
        convention: Convention,
        /// The shared identifier.
        identifier: String,
        /// First path mapping to `identifier`.
        first: TokenPath,
        /// Second path mapping to `identifier`.
        second: TokenPath,
    },

    /// A stage finished without covering every node of its input.
    #[error("incomplete {stage} in {theme}: '{path}' has no value")]
    Incomplete {
        /// Stage that detected the gap.
        stage: &'static str,
        /// Theme being processed.
        theme: Theme,
        /// Path left without a value.
        path: TokenPath,
    },

    /// Source document is not valid JSON.
    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        /// Document path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Reason recorded for a dark path with no light counterpart.
pub(crate) const MISSING_LIGHT_DEFAULT: &str = "defined only in dark; every dark path needs a light default";

fn cross_theme_hint(defined_in: &[Theme]) -> String {
    if defined_in.is_empty() {
        return String::new();
    }
    let themes: Vec<&str> = defined_in.iter().map(|t| t.as_str()).collect();
    format!(
        " (defined only in {}; cross-theme references are not allowed)",
        themes.join(", ")
    )
}

impl TokenError {
    /// Create a malformed-source error.
    pub fn malformed(theme: Theme, path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedSource {
            theme,
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create the error for a dark path that light never defines.
    pub fn missing_light_default(path: &TokenPath) -> Self {
        Self::malformed(Theme::Dark, path.to_string(), MISSING_LIGHT_DEFAULT)
    }

    /// Create an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short machine-friendly name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedSource { .. } => "MalformedSourceError",
            Self::UnresolvedReference { .. } => "UnresolvedReferenceError",
            Self::CyclicReference { .. } => "CyclicReferenceError",
            Self::TypeMismatch { .. } => "TypeMismatchError",
            Self::DuplicateKey { .. } => "DuplicateKeyError",
            Self::Incomplete { .. } => "IncompleteResolutionError",
            Self::Json { .. } => "JsonError",
            Self::Io { .. } => "IoError",
            Self::Config(_) => "ConfigError",
        }
    }

    /// The theme the error was raised in, if any.
    pub fn theme(&self) -> Option<Theme> {
        match self {
            Self::MalformedSource { theme, .. }
            | Self::UnresolvedReference { theme, .. }
            | Self::CyclicReference { theme, .. }
            | Self::TypeMismatch { theme, .. }
            | Self::DuplicateKey { theme, .. }
            | Self::Incomplete { theme, .. } => Some(*theme),
            Self::Json { .. } | Self::Io { .. } | Self::Config(_) => None,
        }
    }

    /// Ordered path trail relevant to the error (cycle or resolution chain).
    pub fn trail(&self) -> &[TokenPath] {
        match self {
            Self::CyclicReference { cycle, .. } => cycle,
            Self::TypeMismatch { chain, .. } => chain,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> TokenPath {
        TokenPath::parse(s).unwrap()
    }

    #[test]
    fn test_cycle_message() {
        let err = TokenError::CyclicReference {
            theme: Theme::Light,
            cycle: vec![path("a"), path("b"), path("a")],
        };
        assert_eq!(err.to_string(), "cyclic reference in light: a -> b -> a");
        assert_eq!(err.kind(), "CyclicReferenceError");
        assert_eq!(err.trail().len(), 3);
    }

    #[test]
    fn test_unresolved_cross_theme_hint() {
        let err = TokenError::UnresolvedReference {
            theme: Theme::Dark,
            from: path("control.bg"),
            target: path("surface.primary"),
            defined_in: vec![Theme::Light],
        };
        let msg = err.to_string();
        assert!(msg.contains("'control.bg' refers to 'surface.primary'"));
        assert!(msg.contains("defined only in light"));
    }

    #[test]
    fn test_unresolved_without_hint() {
        let err = TokenError::UnresolvedReference {
            theme: Theme::Base,
            from: path("a"),
            target: path("missing"),
            defined_in: vec![],
        };
        assert_eq!(
            err.to_string(),
            "unresolved reference in base: 'a' refers to 'missing'"
        );
    }

    #[test]
    fn test_type_mismatch_names_both_ends() {
        let err = TokenError::TypeMismatch {
            theme: Theme::Light,
            path: path("button.bg"),
            declared: TokenType::Color,
            terminal: path("spacing.4"),
            value: "4".into(),
            chain: vec![path("button.bg"), path("spacing.4")],
        };
        let msg = err.to_string();
        assert!(msg.contains("'button.bg' is declared color"));
        assert!(msg.contains("button.bg -> spacing.4"));
        assert_eq!(err.theme(), Some(Theme::Light));
    }
}
