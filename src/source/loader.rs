//! Schema walk from [`SourceNode`] trees to a [`TokenDocument`].
//!
//! Documents are nested categories bottoming out in leaf entries:
//!
//! ```text
//! {
//!   "color": {
//!     "primary": {
//!       "500": { "type": "color", "value": "#0EA5E9" }
//!     }
//!   },
//!   "button": {
//!     "bg": { "type": "color", "value": "{color.primary.500}" }
//!   }
//! }
//! ```
//!
//! An object is a leaf as soon as it carries `type` or `value`. Keys starting
//! with `$` are metadata and skipped at every level.

use log::debug;

use crate::diagnostic::{Result, TokenError};
use crate::token::{RawValue, Scalar, Theme, Token, TokenDocument, TokenPath, TokenType};

use super::node::SourceNode;
use super::SourceSet;

const TYPE_KEY: &str = "type";
const VALUE_KEY: &str = "value";
const DESCRIPTION_KEY: &str = "description";

/// Load every document of `sources` into one [`TokenDocument`].
///
/// Documents are loaded base first so that overlay duplicates of base paths
/// are reported against the overlay.
pub fn load(sources: &SourceSet) -> Result<TokenDocument> {
    let mut doc = TokenDocument::default();

    for theme in Theme::ALL {
        let Some(source) = sources.get(theme) else {
            continue;
        };
        let mut tokens = Vec::new();
        walk_root(theme, &source.root, &mut tokens)?;
        debug!(
            "event=load theme={theme} origin={} tokens={}",
            source.origin.display(),
            tokens.len()
        );

        for token in tokens {
            doc.insert(token).map_err(|dup| {
                TokenError::malformed(
                    theme,
                    dup.path.to_string(),
                    "duplicate definition of a path already visible in this theme",
                )
            })?;
        }
    }

    check_category_collisions(&doc)?;
    Ok(doc)
}

fn walk_root(theme: Theme, root: &SourceNode, out: &mut Vec<Token>) -> Result<()> {
    let Some(entries) = root.entries() else {
        return Err(TokenError::malformed(
            theme,
            "<root>",
            format!("document root must be an object, found {}", root.kind()),
        ));
    };
    if is_leaf(root) {
        return Err(TokenError::malformed(
            theme,
            "<root>",
            "document root cannot be a token entry",
        ));
    }

    check_unique_keys(theme, "<root>", entries)?;
    for (key, child) in entries {
        if key.starts_with('$') {
            continue;
        }
        let path = TokenPath::from_segments([key.as_str()])
            .ok_or_else(|| invalid_segment(theme, key, key))?;
        walk(theme, &path, child, out)?;
    }
    Ok(())
}

fn walk(theme: Theme, path: &TokenPath, node: &SourceNode, out: &mut Vec<Token>) -> Result<()> {
    let Some(entries) = node.entries() else {
        return Err(TokenError::malformed(
            theme,
            path.to_string(),
            format!(
                "expected a category or a {{ type, value }} entry, found {}",
                node.kind()
            ),
        ));
    };

    check_unique_keys(theme, &path.to_string(), entries)?;

    if is_leaf(node) {
        out.push(parse_leaf(theme, path, entries)?);
        return Ok(());
    }

    for (key, child) in entries {
        if key.starts_with('$') {
            continue;
        }
        let child_path = path
            .child(key)
            .ok_or_else(|| invalid_segment(theme, &format!("{path}.{key}"), key))?;
        walk(theme, &child_path, child, out)?;
    }
    Ok(())
}

fn is_leaf(node: &SourceNode) -> bool {
    node.get(TYPE_KEY).is_some() || node.get(VALUE_KEY).is_some()
}

fn parse_leaf(theme: Theme, path: &TokenPath, entries: &[(String, SourceNode)]) -> Result<Token> {
    let malformed = |reason: String| TokenError::malformed(theme, path.to_string(), reason);

    let mut declared = None;
    let mut value = None;
    let mut description = None;

    for (key, child) in entries {
        match key.as_str() {
            TYPE_KEY => declared = Some(child),
            VALUE_KEY => value = Some(child),
            DESCRIPTION_KEY => description = Some(child),
            _ if key.starts_with('$') => {}
            _ if child.entries().is_some() => {
                return Err(malformed(format!(
                    "category '{key}' collides with the token defined at this path"
                )));
            }
            _ => {}
        }
    }

    let declared = declared.ok_or_else(|| malformed("missing 'type'".into()))?;
    let value = value.ok_or_else(|| malformed("missing 'value'".into()))?;

    let token_type = match declared {
        SourceNode::Text(name) => name
            .parse::<TokenType>()
            .map_err(|()| malformed(format!("unknown type '{name}'")))?,
        other => return Err(malformed(format!("'type' must be a string, found {}", other.kind()))),
    };

    let raw = match value {
        SourceNode::Text(text) => RawValue::parse_text(text).map_err(malformed)?,
        SourceNode::Number(n) if n.is_finite() => RawValue::Literal(Scalar::Number(*n)),
        other => {
            return Err(malformed(format!(
                "'value' must be a string, number or reference, found {}",
                other.kind()
            )));
        }
    };

    let description = match description {
        Some(SourceNode::Text(text)) => Some(text.clone()),
        _ => None,
    };

    Ok(Token {
        path: path.clone(),
        token_type,
        raw,
        theme,
        description,
    })
}

fn check_unique_keys(theme: Theme, at: &str, entries: &[(String, SourceNode)]) -> Result<()> {
    let mut seen = rustc_hash::FxHashSet::default();
    for (key, _) in entries {
        if !seen.insert(key.as_str()) {
            return Err(TokenError::malformed(
                theme,
                at,
                format!("duplicate key '{key}'"),
            ));
        }
    }
    Ok(())
}

fn invalid_segment(theme: Theme, at: &str, segment: &str) -> TokenError {
    TokenError::malformed(
        theme,
        at,
        format!("invalid path segment '{segment}': only [A-Za-z0-9_-] are allowed"),
    )
}

/// Reject a token whose path is a strict prefix of another visible token.
///
/// `color.primary` as a token and `color.primary.soft` as a token in the same
/// scope would make `color.primary` both a value and a category.
fn check_category_collisions(doc: &TokenDocument) -> Result<()> {
    for theme in Theme::ALL {
        for token in doc.tokens(theme) {
            let segments = token.path.segments();
            for len in 1..token.path.depth() {
                let Some(prefix) = TokenPath::from_segments(segments[..len].iter().cloned()) else {
                    continue;
                };
                if doc.lookup(theme, &prefix).is_some() {
                    return Err(TokenError::malformed(
                        theme,
                        token.path.to_string(),
                        format!("category '{prefix}' collides with an existing token at the same path"),
                    ));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sources(base: serde_json::Value, light: serde_json::Value, dark: serde_json::Value) -> SourceSet {
        SourceSet::from_nodes(base.into(), light.into(), dark.into())
    }

    fn path(s: &str) -> TokenPath {
        TokenPath::parse(s).unwrap()
    }

    fn reason(err: TokenError) -> (String, String) {
        match err {
            TokenError::MalformedSource { path, reason, .. } => (path, reason),
            other => panic!("expected MalformedSource, got {other}"),
        }
    }

    #[test]
    fn test_load_nested_categories() {
        let set = sources(
            json!({
                "$schema": "ignored",
                "color": { "primary": { "500": { "type": "color", "value": "#0EA5E9" } } },
                "spacing": { "4": { "type": "dimension", "value": 4 } }
            }),
            json!({ "button": { "bg": { "type": "color", "value": "{color.primary.500}", "description": "Primary fill" } } }),
            json!({}),
        );
        let doc = load(&set).unwrap();

        assert_eq!(doc.count(Theme::Base), 2);
        assert_eq!(doc.count(Theme::Light), 1);
        assert_eq!(doc.count(Theme::Dark), 0);

        let bg = doc.get(Theme::Light, &path("button.bg")).unwrap();
        assert_eq!(bg.token_type, TokenType::Color);
        assert_eq!(bg.raw, RawValue::Reference(path("color.primary.500")));
        assert_eq!(bg.description.as_deref(), Some("Primary fill"));

        let spacing = doc.get(Theme::Base, &path("spacing.4")).unwrap();
        assert_eq!(spacing.raw, RawValue::Literal(Scalar::Number(4.0)));
    }

    #[test]
    fn test_missing_value() {
        let set = sources(json!({ "color": { "white": { "type": "color" } } }), json!({}), json!({}));
        let (at, why) = reason(load(&set).unwrap_err());
        assert_eq!(at, "color.white");
        assert!(why.contains("missing 'value'"));
    }

    #[test]
    fn test_missing_type() {
        let set = sources(json!({}), json!({ "surface": { "primary": { "value": "#fff" } } }), json!({}));
        let (at, why) = reason(load(&set).unwrap_err());
        assert_eq!(at, "surface.primary");
        assert!(why.contains("missing 'type'"));
    }

    #[test]
    fn test_unknown_type() {
        let set = sources(json!({ "x": { "type": "shadow", "value": "0 0 1px" } }), json!({}), json!({}));
        let (_, why) = reason(load(&set).unwrap_err());
        assert!(why.contains("unknown type 'shadow'"));
    }

    #[test]
    fn test_leaf_with_child_category() {
        let set = sources(
            json!({ "color": { "white": { "type": "color", "value": "#fff", "soft": { "type": "color", "value": "#eee" } } } }),
            json!({}),
            json!({}),
        );
        let (at, why) = reason(load(&set).unwrap_err());
        assert_eq!(at, "color.white");
        assert!(why.contains("category 'soft' collides"));
    }

    #[test]
    fn test_prefix_collision_across_documents() {
        let set = sources(
            json!({ "color": { "primary": { "type": "color", "value": "#0EA5E9" } } }),
            json!({ "color": { "primary": { "soft": { "type": "color", "value": "#E0F2FE" } } } }),
            json!({}),
        );
        let (at, why) = reason(load(&set).unwrap_err());
        assert_eq!(at, "color.primary.soft");
        assert!(why.contains("category 'color.primary' collides"));
    }

    #[test]
    fn test_overlay_redefines_base_path() {
        let set = sources(
            json!({ "color": { "white": { "type": "color", "value": "#fff" } } }),
            json!({}),
            json!({ "color": { "white": { "type": "color", "value": "#000" } } }),
        );
        let err = load(&set).unwrap_err();
        assert_eq!(err.theme(), Some(Theme::Dark));
        let (at, why) = reason(err);
        assert_eq!(at, "color.white");
        assert!(why.contains("duplicate definition"));
    }

    #[test]
    fn test_duplicate_json_key() {
        let base = SourceNode::from_json(
            r##"{ "color": { "white": { "type": "color", "value": "#fff" }, "white": { "type": "color", "value": "#fafafa" } } }"##,
        )
        .unwrap();
        let set = SourceSet::from_nodes(base, json!({}).into(), json!({}).into());
        let (at, why) = reason(load(&set).unwrap_err());
        assert_eq!(at, "color");
        assert!(why.contains("duplicate key 'white'"));
    }

    #[test]
    fn test_non_object_category() {
        let set = sources(json!({ "color": "#fff" }), json!({}), json!({}));
        let (at, why) = reason(load(&set).unwrap_err());
        assert_eq!(at, "color");
        assert!(why.contains("found string"));
    }

    #[test]
    fn test_invalid_segment() {
        let set = sources(json!({ "color": { "gray 100": { "type": "color", "value": "#fff" } } }), json!({}), json!({}));
        let (at, why) = reason(load(&set).unwrap_err());
        assert_eq!(at, "color.gray 100");
        assert!(why.contains("invalid path segment"));
    }

    #[test]
    fn test_bad_value_kinds() {
        let set = sources(json!({ "flag": { "type": "number", "value": true } }), json!({}), json!({}));
        let (_, why) = reason(load(&set).unwrap_err());
        assert!(why.contains("found boolean"));

        let set = sources(json!({ "x": { "type": "string", "value": "a {b.c}" } }), json!({}), json!({}));
        let (_, why) = reason(load(&set).unwrap_err());
        assert!(why.contains("whole-value references"));
    }
}
