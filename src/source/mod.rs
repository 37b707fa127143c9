//! Source documents and the loader.
//!
//! - [`SourceSet`] - the raw base/light/dark documents, read eagerly
//! - [`SourceNode`] - order-preserving JSON tree
//! - [`load`] - schema walk producing a [`TokenDocument`](crate::token::TokenDocument)

mod loader;
mod node;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostic::{Result, TokenError};
use crate::token::Theme;

pub use loader::load;
pub use node::SourceNode;

/// One parsed source document.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    /// Where the document came from (`<inline>` for in-memory documents).
    pub origin: PathBuf,
    /// Parsed tree.
    pub root: SourceNode,
}

/// The primitives document plus one overlay document per theme.
///
/// All reads happen here, before graph construction; later stages never
/// touch the filesystem.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSet {
    documents: BTreeMap<Theme, SourceDocument>,
}

impl SourceSet {
    /// Build a set from in-memory trees.
    pub fn from_nodes(base: SourceNode, light: SourceNode, dark: SourceNode) -> Self {
        let mut set = Self::default();
        for (theme, root) in [(Theme::Base, base), (Theme::Light, light), (Theme::Dark, dark)] {
            set.documents.insert(
                theme,
                SourceDocument {
                    origin: PathBuf::from("<inline>"),
                    root,
                },
            );
        }
        set
    }

    /// Build a set from JSON strings.
    pub fn from_json_strs(base: &str, light: &str, dark: &str) -> Result<Self> {
        let parse = |text: &str, theme: Theme| {
            SourceNode::from_json(text).map_err(|source| TokenError::Json {
                path: PathBuf::from(format!("<inline:{theme}>")),
                source,
            })
        };
        Ok(Self::from_nodes(
            parse(base, Theme::Base)?,
            parse(light, Theme::Light)?,
            parse(dark, Theme::Dark)?,
        ))
    }

    /// Read and parse the three documents from disk.
    pub fn read(base: &Path, light: &Path, dark: &Path) -> Result<Self> {
        let mut set = Self::default();
        for (theme, path) in [(Theme::Base, base), (Theme::Light, light), (Theme::Dark, dark)] {
            set.documents.insert(theme, read_document(path)?);
        }
        Ok(set)
    }

    /// The document for `theme`, if present.
    pub fn get(&self, theme: Theme) -> Option<&SourceDocument> {
        self.documents.get(&theme)
    }
}

fn read_document(path: &Path) -> Result<SourceDocument> {
    let text = fs::read_to_string(path).map_err(|e| TokenError::io(path, e))?;
    let root = SourceNode::from_json(&text).map_err(|source| TokenError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SourceDocument {
        origin: path.to_path_buf(),
        root,
    })
}
