//! Type-directed value formatting for both targets.

use std::collections::BTreeMap;

use crate::diagnostic::{Result, TokenError};
use crate::normalize::NormalizedSet;
use crate::resolve::{ResolvedTheme, ResolvedToken};
use crate::token::{Scalar, Theme, TokenPath, TokenType};

use super::literal::{format_number, format_rounded, is_safe_string, parse_color};

/// Default physical units per dimension scale step.
pub const DEFAULT_DIMENSION_BASE: f64 = 4.0;

/// Default unit suffix for stylesheet dimensions.
pub const DEFAULT_DIMENSION_UNIT: &str = "px";

// 2^53, the largest integer JSON consumers read back exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A value as the native runtime receives it.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    /// Numeric constant.
    Number(f64),
    /// String constant (colours, font families).
    Text(String),
}

impl NativeValue {
    /// Render as a JavaScript/TypeScript literal.
    pub fn render(&self) -> String {
        match self {
            NativeValue::Number(n) => format_number(*n),
            NativeValue::Text(s) => serde_json::Value::String(s.clone()).to_string(),
        }
    }

    /// Convert to JSON.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            NativeValue::Number(n) => {
                let n = *n;
                if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
                    serde_json::Value::from(n as i64)
                } else {
                    serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
                }
            }
            NativeValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

/// A resolved token with its identifiers and per-target literals.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedToken {
    /// Source path.
    pub path: TokenPath,
    /// Theme the token is defined in.
    pub defined_in: Theme,
    /// Custom-property name, including the leading `--`.
    pub css_name: String,
    /// Native object key.
    pub key: String,
    /// Stylesheet literal.
    pub web: String,
    /// Native literal.
    pub native: NativeValue,
}

/// Formatted tokens of one theme, sorted by path.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedTheme {
    theme: Theme,
    tokens: BTreeMap<TokenPath, FormattedToken>,
}

impl FormattedTheme {
    /// Theme of this set.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Formatted token at `path`.
    pub fn get(&self, path: &TokenPath) -> Option<&FormattedToken> {
        self.tokens.get(path)
    }

    /// All tokens, sorted by path.
    pub fn iter(&self) -> impl Iterator<Item = &FormattedToken> {
        self.tokens.values()
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Converts resolved values into target literals.
#[derive(Debug, Clone)]
pub struct TypeFormatter {
    dimension_base: f64,
    dimension_unit: String,
}

impl Default for TypeFormatter {
    fn default() -> Self {
        Self {
            dimension_base: DEFAULT_DIMENSION_BASE,
            dimension_unit: DEFAULT_DIMENSION_UNIT.to_string(),
        }
    }
}

impl TypeFormatter {
    /// Create a formatter with the default `4px` scale step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the physical units per scale step.
    pub fn with_dimension_base(mut self, base: f64) -> Self {
        self.dimension_base = base;
        self
    }

    /// Set the stylesheet dimension unit.
    pub fn with_dimension_unit(mut self, unit: impl Into<String>) -> Self {
        self.dimension_unit = unit.into();
        self
    }

    /// Format one resolved token into `(web, native)` literals.
    ///
    /// This re-validates the value against its declared type; a failure here
    /// is a [`TokenError::TypeMismatch`] like the resolver's own check.
    pub fn format_value(&self, token: &ResolvedToken) -> Result<(String, NativeValue)> {
        let mismatch = || TokenError::TypeMismatch {
            theme: token.theme,
            path: token.path.clone(),
            declared: token.token_type,
            terminal: token.terminal().clone(),
            value: token.value.to_string(),
            chain: token.chain.clone(),
        };

        match token.token_type {
            TokenType::Color => {
                let color = token.value.as_text().and_then(parse_color).ok_or_else(mismatch)?;
                let rendered = color.render();
                Ok((rendered.clone(), NativeValue::Text(rendered)))
            }
            TokenType::Dimension => {
                let scale = token.value.as_number().filter(|n| n.is_finite()).ok_or_else(mismatch)?;
                let physical = scale * self.dimension_base;
                if !physical.is_finite() {
                    return Err(mismatch());
                }
                let web = format!("{}{}", format_rounded(physical), self.dimension_unit);
                Ok((web, NativeValue::Number(scale)))
            }
            TokenType::Number => {
                let n = token.value.as_number().filter(|n| n.is_finite()).ok_or_else(mismatch)?;
                Ok((format_number(n), NativeValue::Number(n)))
            }
            TokenType::String => match &token.value {
                Scalar::Text(s) if is_safe_string(s) => Ok((s.clone(), NativeValue::Text(s.clone()))),
                _ => Err(mismatch()),
            },
        }
    }

    /// Format every token of a resolved theme.
    pub fn format_theme(&self, resolved: &ResolvedTheme, ids: &NormalizedSet) -> Result<FormattedTheme> {
        let theme = resolved.theme();
        let mut tokens = BTreeMap::new();

        for token in resolved.iter() {
            let identifiers = ids.get(&token.path).ok_or_else(|| TokenError::Incomplete {
                stage: "normalization",
                theme,
                path: token.path.clone(),
            })?;
            let (web, native) = self.format_value(token)?;
            tokens.insert(
                token.path.clone(),
                FormattedToken {
                    path: token.path.clone(),
                    defined_in: token.defined_in,
                    css_name: format!("--{}", identifiers.css),
                    key: identifiers.key.clone(),
                    web,
                    native,
                },
            );
        }

        Ok(FormattedTheme { theme, tokens })
    }
}
