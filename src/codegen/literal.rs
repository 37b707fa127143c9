//! Literal parsing and rendering.
//!
//! Source values arrive as loosely typed scalars; the declared type decides
//! how they are read:
//!
//! - `#0EA5E9` / `#fff` / `#0EA5E980` → colour
//! - `rgb(14, 165, 233)` / `rgba(0, 0, 0, 0.5)` / `transparent` → colour
//! - `4` / `"1.5"` → number or dimension
//!
//! This module provides the parsers plus the shape check shared by the
//! resolver and the formatter.

use crate::token::{Scalar, TokenType};

/// Decimal places kept when rendering computed dimensions.
const NUMBER_PRECISION: f64 = 10_000.0;

/// Decimal places kept when rendering alpha channels.
const ALPHA_PRECISION: f64 = 1_000.0;

/// A parsed colour.
#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha in `0.0..=1.0`.
    pub alpha: f64,
    /// Source spelling when it already is a 6-digit hex (after expanding
    /// the 3-digit form); emitted byte-for-byte.
    canonical: Option<String>,
}

impl Color {
    /// Create an opaque colour from channels.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Create a colour with alpha.
    pub fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self {
            r,
            g,
            b,
            alpha: alpha.clamp(0.0, 1.0),
            canonical: None,
        }
    }

    /// Whether the colour is partially transparent.
    pub fn is_translucent(&self) -> bool {
        self.alpha < 1.0
    }

    /// Render the colour for an artifact.
    ///
    /// Opaque colours render as 6-digit hex, translucent ones as
    /// `rgba(r, g, b, a)`; 8-digit hex is never produced.
    pub fn render(&self) -> String {
        if self.is_translucent() {
            let alpha = (self.alpha * ALPHA_PRECISION).round() / ALPHA_PRECISION;
            return format!(
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                format_number(alpha)
            );
        }
        match &self.canonical {
            Some(hex) => hex.clone(),
            None => format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b),
        }
    }
}

/// Parse a colour literal.
///
/// Supports:
/// - `#rgb` (expanded to `#rrggbb`, case preserved)
/// - `#rrggbb`
/// - `#rrggbbaa`
/// - `rgb(r, g, b)` and `rgba(r, g, b, a)` with `a` as fraction or percentage
/// - `transparent`
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();

    if s.eq_ignore_ascii_case("transparent") {
        return Some(Color::rgba(0, 0, 0, 0.0));
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = s.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_args(args);
    }

    None
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        // #rgb → #rrggbb
        3 => {
            let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
            let mut color = parse_hex(&expanded)?;
            color.canonical = Some(format!("#{expanded}"));
            Some(color)
        }
        6 => {
            let mut color = Color::rgb(
                parse_hex_byte(&hex[0..2])?,
                parse_hex_byte(&hex[2..4])?,
                parse_hex_byte(&hex[4..6])?,
            );
            color.canonical = Some(format!("#{hex}"));
            Some(color)
        }
        8 => {
            let a = parse_hex_byte(&hex[6..8])?;
            Some(Color::rgba(
                parse_hex_byte(&hex[0..2])?,
                parse_hex_byte(&hex[2..4])?,
                parse_hex_byte(&hex[4..6])?,
                f64::from(a) / 255.0,
            ))
        }
        _ => None,
    }
}

fn parse_hex_byte(s: &str) -> Option<u8> {
    u8::from_str_radix(s, 16).ok()
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |s: &str| {
        s.parse::<f64>()
            .ok()
            .filter(|n| (0.0..=255.0).contains(n))
            .map(|n| n.round() as u8)
    };

    match parts.as_slice() {
        [r, g, b] => Some(Color::rgb(channel(r)?, channel(g)?, channel(b)?)),
        [r, g, b, a] => Some(Color::rgba(
            channel(r)?,
            channel(g)?,
            channel(b)?,
            parse_alpha(a)?,
        )),
        _ => None,
    }
}

fn parse_alpha(s: &str) -> Option<f64> {
    let alpha = match s.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().ok()? / 100.0,
        None => s.parse::<f64>().ok()?,
    };
    (0.0..=1.0).contains(&alpha).then_some(alpha)
}

/// Render a number as its shortest round-trip decimal.
///
/// Source numbers pass through unchanged; only `-0` is folded to `0`.
///
/// ```ignore
/// assert_eq!(format_number(16.0), "16");
/// assert_eq!(format_number(1.333333), "1.333333");
/// ```
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    n.to_string()
}

/// Render a computed number, dropping float noise past four decimals.
///
/// ```ignore
/// assert_eq!(format_rounded(0.1 + 0.2), "0.3");
/// ```
pub fn format_rounded(n: f64) -> String {
    let scaled = n * NUMBER_PRECISION;
    // past ~1e304 there is no fraction left to round
    if !scaled.is_finite() {
        return format_number(n);
    }
    format_number(scaled.round() / NUMBER_PRECISION)
}

/// Check whether a terminal scalar has the shape its declared type needs.
pub fn matches_type(token_type: TokenType, value: &Scalar) -> bool {
    match token_type {
        TokenType::Color => value.as_text().and_then(parse_color).is_some(),
        TokenType::Dimension | TokenType::Number => value.as_number().is_some(),
        TokenType::String => value.as_text().is_some_and(is_safe_string),
    }
}

/// Strings must embed cleanly in a declaration block.
pub(crate) fn is_safe_string(s: &str) -> bool {
    !s.chars().any(|c| c.is_control() || matches!(c, ';' | '{' | '}'))
}
