//! Reference resolution.
//!
//! Depth-first walk with an explicit stack per theme:
//!
//! ```text
//! resolve(p):
//!   resolved[p]        → cached value (each path resolved at most once)
//!   p in in_progress   → CyclicReference(stack[first p ..] + p)
//!   otherwise          → push p, follow the edge or take the literal,
//!                        then pop and memoize every path on the stack
//! ```
//!
//! A token holds one raw value, so following references is a chain walk and
//! the stack never branches. Paths are visited in sorted order; memoized
//! results do not depend on that order.

use std::collections::BTreeMap;

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::codegen::matches_type;
use crate::diagnostic::{Result, TokenError};
use crate::graph::TokenGraph;
use crate::token::{RawValue, Scalar, Theme, TokenDocument, TokenPath, TokenType};

/// A token with its terminal value.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedToken {
    /// Path of the token.
    pub path: TokenPath,
    /// Theme it was resolved in.
    pub theme: Theme,
    /// Theme the token is defined in (`base` for primitives).
    pub defined_in: Theme,
    /// Declared type of the token.
    pub token_type: TokenType,
    /// Terminal scalar.
    pub value: Scalar,
    /// Paths traversed from `path` to the terminal literal, both included.
    pub chain: Vec<TokenPath>,
}

impl ResolvedToken {
    /// The token holding the terminal literal.
    pub fn terminal(&self) -> &TokenPath {
        self.chain.last().unwrap_or(&self.path)
    }

    /// Whether the value came through at least one reference.
    pub fn is_alias(&self) -> bool {
        self.chain.len() > 1
    }
}

/// Fully resolved tokens of one theme, sorted by path.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTheme {
    theme: Theme,
    tokens: BTreeMap<TokenPath, ResolvedToken>,
}

impl ResolvedTheme {
    /// Theme of this set.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Resolved token at `path`.
    pub fn get(&self, path: &TokenPath) -> Option<&ResolvedToken> {
        self.tokens.get(path)
    }

    /// Resolution chain of `path`, for diagnostics.
    pub fn chain(&self, path: &TokenPath) -> Option<&[TokenPath]> {
        self.tokens.get(path).map(|t| t.chain.as_slice())
    }

    /// All resolved tokens, sorted by path.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedToken> {
        self.tokens.values()
    }

    /// All resolved paths, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &TokenPath> {
        self.tokens.keys()
    }

    /// Number of resolved tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Check that every node of `graph` and every edge target has a value.
    pub fn verify(&self, graph: &TokenGraph) -> Result<()> {
        let missing = graph
            .nodes()
            .chain(graph.edges().map(|(_, to)| to))
            .find(|path| !self.tokens.contains_key(*path));

        match missing {
            Some(path) => Err(TokenError::Incomplete {
                stage: "resolution",
                theme: self.theme,
                path: path.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
struct Resolution {
    value: Scalar,
    chain: Vec<TokenPath>,
}

/// Resolver state for one theme.
pub struct Resolver<'a> {
    doc: &'a TokenDocument,
    graph: &'a TokenGraph,
    resolved: FxHashMap<TokenPath, Resolution>,
    in_progress: FxHashSet<TokenPath>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over the graph of one theme.
    pub fn new(doc: &'a TokenDocument, graph: &'a TokenGraph) -> Self {
        Self {
            doc,
            graph,
            resolved: FxHashMap::default(),
            in_progress: FxHashSet::default(),
        }
    }

    fn theme(&self) -> Theme {
        self.graph.theme()
    }

    /// Resolve every node of the graph, then check type consistency.
    pub fn resolve_all(mut self) -> Result<ResolvedTheme> {
        let theme = self.theme();
        let doc = self.doc;
        let graph = self.graph;
        for path in graph.nodes() {
            self.resolve_path(path)?;
        }

        let mut tokens = BTreeMap::new();
        for path in graph.nodes() {
            let token = doc.lookup(theme, path).ok_or_else(|| TokenError::Incomplete {
                stage: "resolution",
                theme,
                path: path.clone(),
            })?;
            let resolution = self.resolved.remove(path).ok_or_else(|| TokenError::Incomplete {
                stage: "resolution",
                theme,
                path: path.clone(),
            })?;

            let resolved = ResolvedToken {
                path: path.clone(),
                theme,
                defined_in: token.theme,
                token_type: token.token_type,
                value: resolution.value,
                chain: resolution.chain,
            };
            check_type(&resolved)?;
            tokens.insert(path.clone(), resolved);
        }

        debug!(
            "event=resolve theme={theme} tokens={} aliases={}",
            tokens.len(),
            tokens.values().filter(|t: &&ResolvedToken| t.is_alias()).count()
        );
        Ok(ResolvedTheme { theme, tokens })
    }

    /// Resolve one path, memoizing it and every path traversed on the way.
    fn resolve_path(&mut self, start: &TokenPath) -> Result<()> {
        if self.resolved.contains_key(start) {
            return Ok(());
        }

        let theme = self.theme();
        let doc = self.doc;
        let graph = self.graph;
        let mut stack: Vec<TokenPath> = Vec::new();
        let mut current = start.clone();

        // (terminal value, chain of the first already-resolved path past the stack)
        let (value, suffix) = loop {
            if let Some(done) = self.resolved.get(&current) {
                break (done.value.clone(), done.chain.clone());
            }
            if self.in_progress.contains(&current) {
                let from = stack.iter().position(|p| *p == current).unwrap_or(0);
                let mut cycle = stack.split_off(from);
                cycle.push(current);
                return Err(TokenError::CyclicReference { theme, cycle });
            }

            let token = doc
                .lookup(theme, &current)
                .ok_or_else(|| TokenError::UnresolvedReference {
                    theme,
                    from: stack.last().cloned().unwrap_or_else(|| current.clone()),
                    target: current.clone(),
                    defined_in: doc.defined_elsewhere(theme, &current),
                })?;

            self.in_progress.insert(current.clone());
            stack.push(current.clone());

            match (graph.target(&current), &token.raw) {
                (Some(target), _) => current = target.clone(),
                (None, RawValue::Literal(scalar)) => break (scalar.clone(), Vec::new()),
                (None, RawValue::Reference(target)) => {
                    // reference without a graph edge: the graph is stale
                    return Err(TokenError::UnresolvedReference {
                        theme,
                        from: current.clone(),
                        target: target.clone(),
                        defined_in: Vec::new(),
                    });
                }
            }
        };

        let walked = stack.len();
        let mut full = stack;
        full.extend(suffix);
        for i in 0..walked {
            self.in_progress.remove(&full[i]);
            self.resolved.insert(
                full[i].clone(),
                Resolution {
                    value: value.clone(),
                    chain: full[i..].to_vec(),
                },
            );
        }
        Ok(())
    }
}

fn check_type(token: &ResolvedToken) -> Result<()> {
    if matches_type(token.token_type, &token.value) {
        return Ok(());
    }
    Err(TokenError::TypeMismatch {
        theme: token.theme,
        path: token.path.clone(),
        declared: token.token_type,
        terminal: token.terminal().clone(),
        value: token.value.to_string(),
        chain: token.chain.clone(),
    })
}

/// Build and resolve the graph of `theme`.
pub fn resolve_theme(doc: &TokenDocument, graph: &TokenGraph) -> Result<ResolvedTheme> {
    let resolved = Resolver::new(doc, graph).resolve_all()?;
    resolved.verify(graph)?;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token;

    fn path(s: &str) -> TokenPath {
        TokenPath::parse(s).unwrap()
    }

    fn token(theme: Theme, ty: TokenType, p: &str, value: &str) -> Token {
        Token {
            path: path(p),
            token_type: ty,
            raw: RawValue::parse_text(value).unwrap(),
            theme,
            description: None,
        }
    }

    fn color(theme: Theme, p: &str, value: &str) -> Token {
        token(theme, TokenType::Color, p, value)
    }

    fn resolve(doc: &TokenDocument, theme: Theme) -> Result<ResolvedTheme> {
        let graph = TokenGraph::build(doc, theme)?;
        resolve_theme(doc, &graph)
    }

    #[test]
    fn test_chain_resolution() {
        let doc = TokenDocument::from_tokens([
            color(Theme::Base, "primary.500", "#0EA5E9"),
            color(Theme::Light, "button.bg", "{primary.500}"),
        ])
        .unwrap();

        let resolved = resolve(&doc, Theme::Light).unwrap();
        let bg = resolved.get(&path("button.bg")).unwrap();
        assert_eq!(bg.value, Scalar::Text("#0EA5E9".into()));
        assert_eq!(bg.chain, [path("button.bg"), path("primary.500")]);
        assert_eq!(bg.defined_in, Theme::Light);
        assert_eq!(bg.terminal(), &path("primary.500"));
        assert!(bg.is_alias());

        let primary = resolved.get(&path("primary.500")).unwrap();
        assert_eq!(primary.defined_in, Theme::Base);
        assert!(!primary.is_alias());
    }

    #[test]
    fn test_transitive_chain_memoized() {
        let doc = TokenDocument::from_tokens([
            color(Theme::Base, "a", "{b}"),
            color(Theme::Base, "b", "{c}"),
            color(Theme::Base, "c", "{d}"),
            color(Theme::Base, "d", "#000000"),
            color(Theme::Base, "e", "{b}"),
        ])
        .unwrap();

        let resolved = resolve(&doc, Theme::Base).unwrap();
        assert_eq!(resolved.len(), 5);
        assert_eq!(
            resolved.chain(&path("a")).unwrap(),
            [path("a"), path("b"), path("c"), path("d")]
        );
        assert_eq!(
            resolved.chain(&path("e")).unwrap(),
            [path("e"), path("b"), path("c"), path("d")]
        );
        for token in resolved.iter() {
            assert_eq!(token.value, Scalar::Text("#000000".into()));
        }
    }

    #[test]
    fn test_two_cycle() {
        let doc = TokenDocument::from_tokens([
            color(Theme::Base, "a", "{b}"),
            color(Theme::Base, "b", "{a}"),
        ])
        .unwrap();

        match resolve(&doc, Theme::Base).unwrap_err() {
            TokenError::CyclicReference { cycle, theme } => {
                assert_eq!(theme, Theme::Base);
                assert_eq!(cycle, [path("a"), path("b"), path("a")]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cycle_reached_through_tail() {
        let doc = TokenDocument::from_tokens([
            color(Theme::Light, "entry", "{x}"),
            color(Theme::Light, "x", "{y}"),
            color(Theme::Light, "y", "{z}"),
            color(Theme::Light, "z", "{x}"),
        ])
        .unwrap();

        match resolve(&doc, Theme::Light).unwrap_err() {
            TokenError::CyclicReference { cycle, .. } => {
                assert_eq!(cycle, [path("x"), path("y"), path("z"), path("x")]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_cycle() {
        let doc = TokenDocument::from_tokens([color(Theme::Base, "a", "{a}")]).unwrap();
        match resolve(&doc, Theme::Base).unwrap_err() {
            TokenError::CyclicReference { cycle, .. } => assert_eq!(cycle, [path("a"), path("a")]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_type_mismatch_through_alias() {
        let doc = TokenDocument::from_tokens([
            token(Theme::Base, TokenType::Dimension, "spacing.4", "4"),
            color(Theme::Light, "button.bg", "{spacing.4}"),
        ])
        .unwrap();

        match resolve(&doc, Theme::Light).unwrap_err() {
            TokenError::TypeMismatch {
                path: p,
                declared,
                terminal,
                chain,
                ..
            } => {
                assert_eq!(p, path("button.bg"));
                assert_eq!(declared, TokenType::Color);
                assert_eq!(terminal, path("spacing.4"));
                assert_eq!(chain, [path("button.bg"), path("spacing.4")]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_type_mismatch_literal() {
        let doc = TokenDocument::from_tokens([color(Theme::Base, "color.bad", "not-a-color")]).unwrap();
        assert!(matches!(
            resolve(&doc, Theme::Base).unwrap_err(),
            TokenError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_overlays_resolve_independently() {
        let doc = TokenDocument::from_tokens([
            color(Theme::Base, "color.white", "#FFFFFF"),
            color(Theme::Base, "color.slate.900", "#0F172A"),
            color(Theme::Light, "surface.primary", "{color.white}"),
            color(Theme::Dark, "surface.primary", "{color.slate.900}"),
        ])
        .unwrap();

        let light = resolve(&doc, Theme::Light).unwrap();
        let dark = resolve(&doc, Theme::Dark).unwrap();
        assert_eq!(
            light.get(&path("surface.primary")).unwrap().value,
            Scalar::Text("#FFFFFF".into())
        );
        assert_eq!(
            dark.get(&path("surface.primary")).unwrap().value,
            Scalar::Text("#0F172A".into())
        );
    }

    #[test]
    fn test_deterministic() {
        let doc = TokenDocument::from_tokens([
            color(Theme::Base, "z", "{m}"),
            color(Theme::Base, "m", "{a}"),
            color(Theme::Base, "a", "#123456"),
        ])
        .unwrap();
        assert_eq!(resolve(&doc, Theme::Base).unwrap(), resolve(&doc, Theme::Base).unwrap());
    }
}
