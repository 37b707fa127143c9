//! Hierarchical token paths.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered sequence of category segments, e.g. `button.primary.bg-default`.
///
/// Segments are restricted to ASCII alphanumerics, `-` and `_` so that every
/// path has a well-defined identifier under both flattening conventions.
/// Ordering is segment-wise lexicographic, which gives every map keyed by
/// paths a stable iteration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenPath(Vec<String>);

impl TokenPath {
    /// Parse a dotted path such as `color.primary.500`.
    ///
    /// Returns `None` for empty input, empty segments or segments containing
    /// characters outside `[A-Za-z0-9_-]`.
    pub fn parse(dotted: &str) -> Option<Self> {
        let segments: Vec<String> = dotted.split('.').map(str::to_owned).collect();
        Self::from_segments(segments)
    }

    /// Build a path from already-split segments.
    pub fn from_segments<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || !segments.iter().all(|s| is_valid_segment(s)) {
            return None;
        }
        Some(Self(segments))
    }

    /// Return a new path with `segment` appended.
    pub fn child(&self, segment: &str) -> Option<Self> {
        if !is_valid_segment(segment) {
            return None;
        }
        let mut segments = self.0.clone();
        segments.push(segment.to_owned());
        Some(Self(segments))
    }

    /// The path segments in order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The top-level category (first segment).
    pub fn category(&self) -> &str {
        &self.0[0]
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

/// Check whether a single segment is acceptable in a token path.
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

impl fmt::Display for TokenPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl TryFrom<String> for TokenPath {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid token path: '{value}'"))
    }
}

impl From<TokenPath> for String {
    fn from(path: TokenPath) -> Self {
        path.to_string()
    }
}

/// Format a sequence of paths as `a -> b -> c`.
pub fn format_chain(chain: &[TokenPath]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
