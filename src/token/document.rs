//! The unresolved token document.

use std::collections::BTreeMap;

use super::path::TokenPath;
use super::value::{RawValue, Theme, TokenType};

/// The atomic design value, as loaded from source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Unique path within the theme.
    pub path: TokenPath,
    /// Declared type.
    pub token_type: TokenType,
    /// Literal or reference.
    pub raw: RawValue,
    /// Theme the token was defined in.
    pub theme: Theme,
    /// Free-form description carried from the source, if any.
    pub description: Option<String>,
}

/// Mapping from `(theme, path)` to [`Token`].
///
/// Built once by the loader and never mutated afterwards; every later stage
/// borrows it immutably.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenDocument {
    themes: BTreeMap<Theme, BTreeMap<TokenPath, Token>>,
}

impl TokenDocument {
    /// Build a document from tokens.
    ///
    /// Returns the first duplicate `(theme, path)` as `Err`. Duplicates
    /// between an overlay and `base` are also rejected, because both are
    /// visible from the overlay's scope.
    pub fn from_tokens<I>(tokens: I) -> Result<Self, Box<Token>>
    where
        I: IntoIterator<Item = Token>,
    {
        let mut doc = Self::default();
        for token in tokens {
            doc.insert(token)?;
        }
        Ok(doc)
    }

    pub(crate) fn insert(&mut self, token: Token) -> Result<(), Box<Token>> {
        if self.lookup(token.theme, &token.path).is_some() || self.shadows_overlay(&token) {
            return Err(Box::new(token));
        }
        self.themes
            .entry(token.theme)
            .or_default()
            .insert(token.path.clone(), token);
        Ok(())
    }

    // A base token added after overlays would collide with them.
    fn shadows_overlay(&self, token: &Token) -> bool {
        token.theme == Theme::Base
            && Theme::OVERLAYS
                .iter()
                .any(|theme| self.get(*theme, &token.path).is_some())
    }

    /// Get a token defined directly in `theme`.
    pub fn get(&self, theme: Theme, path: &TokenPath) -> Option<&Token> {
        self.themes.get(&theme).and_then(|tokens| tokens.get(path))
    }

    /// Look a path up in the scope visible from `theme`.
    pub fn lookup(&self, theme: Theme, path: &TokenPath) -> Option<&Token> {
        theme
            .scope()
            .iter()
            .find_map(|scope| self.get(*scope, path))
    }

    /// Tokens defined directly in `theme`, sorted by path.
    pub fn tokens(&self, theme: Theme) -> impl Iterator<Item = &Token> {
        self.themes
            .get(&theme)
            .into_iter()
            .flat_map(|tokens| tokens.values())
    }

    /// Paths defined directly in `theme`, sorted.
    pub fn paths(&self, theme: Theme) -> impl Iterator<Item = &TokenPath> {
        self.themes
            .get(&theme)
            .into_iter()
            .flat_map(|tokens| tokens.keys())
    }

    /// Every token visible from `theme`, sorted by path.
    pub fn scoped_tokens(&self, theme: Theme) -> Vec<&Token> {
        let mut tokens: Vec<&Token> = theme
            .scope()
            .iter()
            .flat_map(|scope| self.tokens(*scope))
            .collect();
        tokens.sort_by(|a, b| a.path.cmp(&b.path));
        tokens
    }

    /// Themes other than `theme` that define `path` directly.
    pub fn defined_elsewhere(&self, theme: Theme, path: &TokenPath) -> Vec<Theme> {
        Theme::ALL
            .into_iter()
            .filter(|other| !theme.scope().contains(other))
            .filter(|other| self.get(*other, path).is_some())
            .collect()
    }

    /// Number of tokens defined directly in `theme`.
    pub fn count(&self, theme: Theme) -> usize {
        self.themes.get(&theme).map_or(0, BTreeMap::len)
    }

    /// Total number of tokens across all themes.
    pub fn len(&self) -> usize {
        self.themes.values().map(BTreeMap::len).sum()
    }

    /// Whether the document holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Scalar;

    fn token(theme: Theme, path: &str, value: &str) -> Token {
        Token {
            path: TokenPath::parse(path).unwrap(),
            token_type: TokenType::Color,
            raw: RawValue::parse_text(value).unwrap(),
            theme,
            description: None,
        }
    }

    #[test]
    fn test_lookup_sees_base_from_overlay() {
        let doc = TokenDocument::from_tokens([
            token(Theme::Base, "color.white", "#FFFFFF"),
            token(Theme::Light, "surface.primary", "{color.white}"),
        ])
        .unwrap();

        let white = TokenPath::parse("color.white").unwrap();
        assert!(doc.lookup(Theme::Light, &white).is_some());
        assert!(doc.lookup(Theme::Dark, &white).is_some());
        assert!(doc.get(Theme::Light, &white).is_none());
    }

    #[test]
    fn test_lookup_does_not_cross_overlays() {
        let doc = TokenDocument::from_tokens([token(Theme::Light, "surface.primary", "#FFFFFF")])
            .unwrap();
        let path = TokenPath::parse("surface.primary").unwrap();
        assert!(doc.lookup(Theme::Dark, &path).is_none());
        assert_eq!(doc.defined_elsewhere(Theme::Dark, &path), vec![Theme::Light]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = TokenDocument::from_tokens([
            token(Theme::Light, "surface.primary", "#FFFFFF"),
            token(Theme::Light, "surface.primary", "#000000"),
        ]);
        let dup = result.unwrap_err();
        assert_eq!(dup.path.to_string(), "surface.primary");
        assert_eq!(dup.raw, RawValue::Literal(Scalar::Text("#000000".into())));
    }

    #[test]
    fn test_overlay_cannot_shadow_base() {
        let result = TokenDocument::from_tokens([
            token(Theme::Base, "color.white", "#FFFFFF"),
            token(Theme::Dark, "color.white", "#000000"),
        ]);
        assert!(result.is_err());

        let result = TokenDocument::from_tokens([
            token(Theme::Dark, "color.white", "#000000"),
            token(Theme::Base, "color.white", "#FFFFFF"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_same_path_in_both_overlays() {
        let doc = TokenDocument::from_tokens([
            token(Theme::Light, "surface.primary", "#FFFFFF"),
            token(Theme::Dark, "surface.primary", "#0F172A"),
        ])
        .unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.scoped_tokens(Theme::Dark).len(), 1);
        let dark: Vec<String> = doc.paths(Theme::Dark).map(ToString::to_string).collect();
        assert_eq!(dark, ["surface.primary"]);
    }
}
