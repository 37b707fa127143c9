//! Path flattening into per-target identifiers.
//!
//! Every resolved path gets two parallel names:
//!
//! - **hyphenated-flat** (`button-primary-bg-default`) for stylesheet
//!   custom properties
//! - **concatenated-flat** (`buttonPrimaryBgDefault`) for native object keys
//!
//! Flattening is lossy (`a.b-c` and `a.b.c` both become `a-b-c`), so every
//! identifier is checked for collisions before any artifact exists.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use crate::diagnostic::{Result, TokenError};
use crate::token::{Theme, TokenPath};

/// Identifier naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    /// Segments joined with `-`.
    Hyphenated,
    /// camelCase concatenation.
    Concatenated,
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convention::Hyphenated => f.write_str("hyphenated-flat"),
            Convention::Concatenated => f.write_str("concatenated-flat"),
        }
    }
}

/// The two flattened names of one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifiers {
    /// Custom-property name without the leading `--`.
    pub css: String,
    /// Native object key.
    pub key: String,
}

/// Identifiers for every path across the checked themes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedSet {
    entries: BTreeMap<TokenPath, Identifiers>,
}

impl NormalizedSet {
    /// Identifiers for `path`.
    pub fn get(&self, path: &TokenPath) -> Option<&Identifiers> {
        self.entries.get(path)
    }

    /// All entries, sorted by path.
    pub fn iter(&self) -> impl Iterator<Item = (&TokenPath, &Identifiers)> {
        self.entries.iter()
    }

    /// Number of normalized paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no path was normalized.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flattens paths and detects identifier collisions.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    prefix: Option<String>,
    namespaces: BTreeMap<String, String>,
}

impl Normalizer {
    /// Create a normalizer with no prefix and identity namespaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every stylesheet identifier, e.g. `ll` gives `--ll-color-...`.
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    /// Rename top-level categories in stylesheet identifiers
    /// (e.g. `colors` → `color`).
    pub fn with_namespaces(mut self, namespaces: BTreeMap<String, String>) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Hyphenated-flat name of `path`, without the `--` marker.
    pub fn hyphenated(&self, path: &TokenPath) -> String {
        let segments = path.segments();
        let category = self
            .namespaces
            .get(path.category())
            .map_or(segments[0].as_str(), String::as_str);

        let mut parts: Vec<&str> = Vec::with_capacity(segments.len() + 1);
        if let Some(prefix) = &self.prefix {
            parts.push(prefix);
        }
        if !category.is_empty() {
            parts.push(category);
        }
        parts.extend(segments[1..].iter().map(String::as_str));
        parts.join("-")
    }

    /// Concatenated-flat name of `path`.
    ///
    /// Segments are further split on `-` and `_`; the first word has its
    /// first letter lowercased and every following word its first letter
    /// uppercased.
    pub fn concatenated(&self, path: &TokenPath) -> String {
        let mut key = String::new();
        let words = path
            .segments()
            .iter()
            .flat_map(|segment| segment.split(['-', '_']))
            .filter(|word| !word.is_empty());

        for (index, word) in words.enumerate() {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                if index == 0 {
                    key.extend(first.to_lowercase());
                } else {
                    key.extend(first.to_uppercase());
                }
                key.push_str(chars.as_str());
            }
        }
        key
    }

    /// Normalize the paths of several themes.
    ///
    /// Each theme's paths are checked for collisions on their own, then the
    /// union is checked as well, since the artifacts layer themes over one
    /// another and a cross-theme collision would silently alias two tokens.
    pub fn normalize<'a, I, P>(&self, themes: I) -> Result<NormalizedSet>
    where
        I: IntoIterator<Item = (Theme, P)>,
        P: IntoIterator<Item = &'a TokenPath>,
    {
        let mut set = NormalizedSet::default();
        let mut union = CollisionIndex::default();

        for (theme, paths) in themes {
            let mut scoped = CollisionIndex::default();
            for path in paths {
                let ids = match set.entries.get(path) {
                    Some(ids) => ids.clone(),
                    None => Identifiers {
                        css: self.hyphenated(path),
                        key: self.concatenated(path),
                    },
                };
                scoped.insert(theme, path, &ids)?;
                union.insert(theme, path, &ids)?;
                set.entries.entry(path.clone()).or_insert(ids);
            }
        }

        Ok(set)
    }
}

#[derive(Default)]
struct CollisionIndex {
    css: BTreeMap<String, TokenPath>,
    key: BTreeMap<String, TokenPath>,
}

impl CollisionIndex {
    fn insert(&mut self, theme: Theme, path: &TokenPath, ids: &Identifiers) -> Result<()> {
        claim(&mut self.css, theme, Convention::Hyphenated, &ids.css, path)?;
        claim(&mut self.key, theme, Convention::Concatenated, &ids.key, path)
    }
}

fn claim(
    index: &mut BTreeMap<String, TokenPath>,
    theme: Theme,
    convention: Convention,
    identifier: &str,
    path: &TokenPath,
) -> Result<()> {
    match index.entry(identifier.to_owned()) {
        Entry::Vacant(slot) => {
            slot.insert(path.clone());
            Ok(())
        }
        Entry::Occupied(slot) if slot.get() == path => Ok(()),
        Entry::Occupied(slot) => Err(TokenError::DuplicateKey {
            theme,
            convention,
            identifier: identifier.to_owned(),
            first: slot.get().clone(),
            second: path.clone(),
        }),
    }
}
