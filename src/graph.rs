//! Reference graph construction.
//!
//! One graph per theme. Nodes are every path visible from the theme (its own
//! tokens plus `base`), edges are "depends on" links from a reference token to
//! its target. A token holds a single raw value, so each node has at most one
//! outgoing edge; fan-in is unbounded.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::diagnostic::{Result, TokenError};
use crate::token::{Theme, TokenDocument, TokenPath};

/// Dependency graph of one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGraph {
    theme: Theme,
    nodes: BTreeSet<TokenPath>,
    edges: BTreeMap<TokenPath, TokenPath>,
    dependents: BTreeMap<TokenPath, BTreeSet<TokenPath>>,
}

impl TokenGraph {
    /// Build the graph for `theme`.
    ///
    /// Fails with [`TokenError::UnresolvedReference`] as soon as a reference
    /// targets a path outside the theme's scope. This is a structural check;
    /// cycles are left to the resolver.
    pub fn build(doc: &TokenDocument, theme: Theme) -> Result<Self> {
        let mut graph = Self {
            theme,
            nodes: BTreeSet::new(),
            edges: BTreeMap::new(),
            dependents: BTreeMap::new(),
        };

        for token in doc.scoped_tokens(theme) {
            graph.nodes.insert(token.path.clone());

            let Some(target) = token.raw.reference() else {
                continue;
            };
            if doc.lookup(theme, target).is_none() {
                return Err(TokenError::UnresolvedReference {
                    theme,
                    from: token.path.clone(),
                    target: target.clone(),
                    defined_in: doc.defined_elsewhere(theme, target),
                });
            }
            graph.edges.insert(token.path.clone(), target.clone());
            graph
                .dependents
                .entry(target.clone())
                .or_default()
                .insert(token.path.clone());
        }

        debug!(
            "event=graph theme={theme} nodes={} edges={}",
            graph.nodes.len(),
            graph.edges.len()
        );
        Ok(graph)
    }

    /// Theme this graph belongs to.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// All nodes, sorted.
    pub fn nodes(&self) -> impl Iterator<Item = &TokenPath> {
        self.nodes.iter()
    }

    /// Whether `path` is a node of this graph.
    pub fn contains(&self, path: &TokenPath) -> bool {
        self.nodes.contains(path)
    }

    /// The reference target of `path`, if it is a reference.
    pub fn target(&self, path: &TokenPath) -> Option<&TokenPath> {
        self.edges.get(path)
    }

    /// All edges as `(from, to)`, sorted by `from`.
    pub fn edges(&self) -> impl Iterator<Item = (&TokenPath, &TokenPath)> {
        self.edges.iter()
    }

    /// Paths whose reference points directly at `path`.
    pub fn dependents(&self, path: &TokenPath) -> impl Iterator<Item = &TokenPath> {
        self.dependents.get(path).into_iter().flatten()
    }

    /// Nodes with no outgoing edge (literal values).
    pub fn leaves(&self) -> impl Iterator<Item = &TokenPath> {
        self.nodes.iter().filter(|p| !self.edges.contains_key(*p))
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{RawValue, Token, TokenType};

    fn path(s: &str) -> TokenPath {
        TokenPath::parse(s).unwrap()
    }

    fn token(theme: Theme, p: &str, value: &str) -> Token {
        Token {
            path: path(p),
            token_type: TokenType::Color,
            raw: RawValue::parse_text(value).unwrap(),
            theme,
            description: None,
        }
    }

    #[test]
    fn test_edges_and_dependents() {
        let doc = TokenDocument::from_tokens([
            token(Theme::Base, "color.primary.500", "#0EA5E9"),
            token(Theme::Light, "button.bg", "{color.primary.500}"),
            token(Theme::Light, "link.fg", "{color.primary.500}"),
        ])
        .unwrap();

        let graph = TokenGraph::build(&doc, Theme::Light).unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.target(&path("button.bg")), Some(&path("color.primary.500")));
        let dependents: Vec<_> = graph.dependents(&path("color.primary.500")).collect();
        assert_eq!(dependents, [&path("button.bg"), &path("link.fg")]);
        let leaves: Vec<_> = graph.leaves().collect();
        assert_eq!(leaves, [&path("color.primary.500")]);
    }

    #[test]
    fn test_base_graph_excludes_overlays() {
        let doc = TokenDocument::from_tokens([
            token(Theme::Base, "color.white", "#FFFFFF"),
            token(Theme::Dark, "surface.primary", "{color.white}"),
        ])
        .unwrap();
        let graph = TokenGraph::build(&doc, Theme::Base).unwrap();
        assert_eq!(graph.len(), 1);
        assert!(!graph.contains(&path("surface.primary")));
    }

    #[test]
    fn test_missing_target() {
        let doc = TokenDocument::from_tokens([token(Theme::Light, "button.bg", "{color.nope}")]).unwrap();
        let err = TokenGraph::build(&doc, Theme::Light).unwrap_err();
        match err {
            TokenError::UnresolvedReference {
                from,
                target,
                defined_in,
                ..
            } => {
                assert_eq!(from, path("button.bg"));
                assert_eq!(target, path("color.nope"));
                assert!(defined_in.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cross_theme_reference_rejected() {
        let doc = TokenDocument::from_tokens([
            token(Theme::Light, "surface.primary", "#FFFFFF"),
            token(Theme::Dark, "control.bg", "{surface.primary}"),
        ])
        .unwrap();

        assert!(TokenGraph::build(&doc, Theme::Light).is_ok());
        let err = TokenGraph::build(&doc, Theme::Dark).unwrap_err();
        assert!(matches!(
            err,
            TokenError::UnresolvedReference { ref defined_in, .. } if defined_in == &[Theme::Light]
        ));
    }

    #[test]
    fn test_self_reference_is_an_edge() {
        // structurally valid; the resolver reports the cycle
        let doc = TokenDocument::from_tokens([token(Theme::Base, "a", "{a}")]).unwrap();
        let graph = TokenGraph::build(&doc, Theme::Base).unwrap();
        assert_eq!(graph.target(&path("a")), Some(&path("a")));
    }
}
