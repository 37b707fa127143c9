//! Token types, themes and raw values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::path::TokenPath;

// ============================================================================
// Theme
// ============================================================================

/// A theme variant.
///
/// `Base` holds theme-independent primitives; `Light` and `Dark` hold
/// semantic and component overlays layered over `Base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Theme-independent primitives.
    Base,
    /// Light overlay; also the default theme of every artifact.
    Light,
    /// Dark overlay.
    Dark,
}

impl Theme {
    /// All themes, base first.
    pub const ALL: [Theme; 3] = [Theme::Base, Theme::Light, Theme::Dark];

    /// The overlay themes that produce artifact tables.
    pub const OVERLAYS: [Theme; 2] = [Theme::Light, Theme::Dark];

    /// Themes whose tokens are visible to references made from this theme.
    pub fn scope(self) -> &'static [Theme] {
        match self {
            Theme::Base => &[Theme::Base],
            Theme::Light => &[Theme::Base, Theme::Light],
            Theme::Dark => &[Theme::Base, Theme::Dark],
        }
    }

    /// Lowercase name, as used in documents and artifacts.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Base => "base",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TokenType
// ============================================================================

/// Declared type of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Hex or functional colour.
    Color,
    /// Unitless scale value, unit applied per target.
    Dimension,
    /// Plain number (weights, opacities, line-height ratios).
    Number,
    /// Free-form string (font families, easing curves).
    String,
}

impl TokenType {
    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenType::Color => "color",
            TokenType::Dimension => "dimension",
            TokenType::Number => "number",
            TokenType::String => "string",
        }
    }
}

impl FromStr for TokenType {
    type Err = ();

    /// Parse a declared type.
    ///
    /// Besides the canonical names this accepts the category-style type names
    /// emitted by common design-tool token exporters (`spacing`, `fontSizes`,
    /// `fontWeights`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "color" => Ok(TokenType::Color),
            "dimension" | "spacing" | "sizing" | "borderRadius" | "borderWidth" | "fontSizes"
            | "paragraphSpacing" | "letterSpacing" => Ok(TokenType::Dimension),
            "number" | "opacity" | "fontWeights" | "lineHeights" => Ok(TokenType::Number),
            "string" | "fontFamilies" | "textCase" | "textDecoration" => Ok(TokenType::String),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Values
// ============================================================================

/// A concrete scalar as it appears in a source document.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// String literal (colours, font families, numeric strings).
    Text(String),
    /// Numeric literal.
    Number(f64),
}

impl Scalar {
    /// Interpret the scalar as a number, accepting numeric strings.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    /// The string content, if this is a text scalar.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            Scalar::Number(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => write!(f, "{s:?}"),
            Scalar::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A token's unresolved value: a literal or a reference to another path.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Concrete scalar.
    Literal(Scalar),
    /// Same-theme reference, written `{dotted.path}` in source.
    Reference(TokenPath),
}

impl RawValue {
    /// Parse a string value, recognising the `{dotted.path}` reference form.
    ///
    /// Returns `Err` with a reason when the string looks like a reference but
    /// is not a whole, well-formed one.
    pub fn parse_text(text: &str) -> Result<Self, String> {
        let trimmed = text.trim();
        let whole = trimmed
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .filter(|inner| !inner.contains(['{', '}']));
        if let Some(inner) = whole {
            return TokenPath::parse(inner.trim())
                .map(RawValue::Reference)
                .ok_or_else(|| format!("invalid reference path '{inner}'"));
        }
        if trimmed.contains(['{', '}']) {
            return Err(format!(
                "'{text}' embeds a reference; only whole-value references are supported"
            ));
        }
        Ok(RawValue::Literal(Scalar::Text(text.to_owned())))
    }

    /// The referenced path, if this value is a reference.
    pub fn reference(&self) -> Option<&TokenPath> {
        match self {
            RawValue::Reference(path) => Some(path),
            RawValue::Literal(_) => None,
        }
    }
}
