//! Stylesheet emitter.
//!
//! ```text
//! /* header */
//! :root {
//!   --color-primary-500: #0EA5E9;      every base + light path
//! }
//!
//! [data-theme="dark"] {
//!   --surface-primary: #0F172A;        only dark paths that differ
//! }
//! ```

use std::fmt::Write;

use crate::codegen::FormattedTheme;
use crate::token::Theme;

use super::EmitOptions;

/// One custom-property declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name including `--`.
    pub name: String,
    /// Formatted value.
    pub value: String,
}

/// The stylesheet artifact, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    header: String,
    dark_selector: String,
    root: Vec<Declaration>,
    dark: Vec<Declaration>,
}

impl Stylesheet {
    /// Declarations of the `:root` block, sorted by name.
    pub fn root(&self) -> &[Declaration] {
        &self.root
    }

    /// Declarations of the dark override block, sorted by name.
    pub fn dark_overrides(&self) -> &[Declaration] {
        &self.dark
    }

    /// Find a `:root` declaration by property name.
    pub fn root_value(&self, name: &str) -> Option<&str> {
        find(&self.root, name)
    }

    /// Find a dark override by property name.
    pub fn dark_value(&self, name: &str) -> Option<&str> {
        find(&self.dark, name)
    }

    /// Render the stylesheet text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.header.is_empty() {
            let _ = writeln!(out, "/* {} */", self.header);
        }
        write_block(&mut out, ":root", &self.root);
        if !self.dark.is_empty() {
            out.push('\n');
            write_block(&mut out, &self.dark_selector, &self.dark);
        }
        out
    }
}

fn find<'a>(declarations: &'a [Declaration], name: &str) -> Option<&'a str> {
    declarations
        .binary_search_by(|d| d.name.as_str().cmp(name))
        .ok()
        .map(|i| declarations[i].value.as_str())
}

fn write_block(out: &mut String, selector: &str, declarations: &[Declaration]) {
    let _ = writeln!(out, "{selector} {{");
    for Declaration { name, value } in declarations {
        let _ = writeln!(out, "  {name}: {value};");
    }
    out.push_str("}\n");
}

/// Build the stylesheet from the formatted light and dark themes.
///
/// The `:root` block carries the full light set (which includes `base`). The
/// override block carries only tokens defined by the dark overlay whose value
/// is absent from or different to the light value.
pub fn emit_stylesheet(light: &FormattedTheme, dark: &FormattedTheme, options: &EmitOptions) -> Stylesheet {
    let mut root: Vec<Declaration> = light
        .iter()
        .map(|t| Declaration {
            name: t.css_name.clone(),
            value: t.web.clone(),
        })
        .collect();

    let mut overrides: Vec<Declaration> = dark
        .iter()
        .filter(|t| t.defined_in == Theme::Dark)
        .filter(|t| light.get(&t.path).is_none_or(|l| l.web != t.web))
        .map(|t| Declaration {
            name: t.css_name.clone(),
            value: t.web.clone(),
        })
        .collect();

    root.sort_by(|a, b| a.name.cmp(&b.name));
    overrides.sort_by(|a, b| a.name.cmp(&b.name));

    Stylesheet {
        header: options.header.clone(),
        dark_selector: options.dark_selector.clone(),
        root,
        dark: overrides,
    }
}
