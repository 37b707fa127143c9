//! Native constant-table emitter.
//!
//! Both tables are closed over the same key set: the dark table starts from
//! the light table and takes dark's values on top. This layering happens
//! only here; resolution never satisfies a dark reference with a light value.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::codegen::{FormattedTheme, NativeValue};
use crate::token::Theme;

use super::EmitOptions;

/// Flattened key → value tables for the native runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeTables {
    header: String,
    light: BTreeMap<String, NativeValue>,
    dark: BTreeMap<String, NativeValue>,
}

impl NativeTables {
    /// The light table.
    pub fn light(&self) -> &BTreeMap<String, NativeValue> {
        &self.light
    }

    /// The dark table.
    pub fn dark(&self) -> &BTreeMap<String, NativeValue> {
        &self.dark
    }

    /// The table for `theme`. `base` has no table of its own and selects light.
    pub fn table(&self, theme: Theme) -> &BTreeMap<String, NativeValue> {
        match theme {
            Theme::Dark => &self.dark,
            Theme::Base | Theme::Light => &self.light,
        }
    }

    /// Theme lookup by name, mirroring the emitted `getTokens`.
    pub fn select(&self, name: &str) -> Option<&BTreeMap<String, NativeValue>> {
        match name {
            "light" => Some(&self.light),
            "dark" => Some(&self.dark),
            _ => None,
        }
    }

    /// Render the TypeScript module.
    pub fn render_module(&self) -> String {
        let mut out = String::new();
        if !self.header.is_empty() {
            let _ = writeln!(out, "// {}", self.header);
            out.push('\n');
        }
        write_table(&mut out, "light", &self.light);
        out.push('\n');
        write_table(&mut out, "dark", &self.dark);
        out.push_str(
            "\nexport type ThemeName = \"light\" | \"dark\";\n\
             \n\
             export const themes = { light, dark } as const;\n\
             \n\
             export function getTokens(theme: ThemeName) {\n\
             \x20 return themes[theme];\n\
             }\n",
        );
        out
    }

    /// Both tables as JSON: `{"dark": {...}, "light": {...}}`.
    pub fn to_json(&self) -> serde_json::Value {
        let table = |t: &BTreeMap<String, NativeValue>| {
            t.iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect::<serde_json::Map<_, _>>()
        };
        serde_json::json!({
            "light": table(&self.light),
            "dark": table(&self.dark),
        })
    }
}

fn write_table(out: &mut String, name: &str, table: &BTreeMap<String, NativeValue>) {
    let _ = writeln!(out, "export const {name} = {{");
    for (key, value) in table {
        let _ = writeln!(out, "  {}: {},", render_key(key), value.render());
    }
    out.push_str("} as const;\n");
}

fn render_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_owned()
    } else {
        serde_json::Value::String(key.to_owned()).to_string()
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Build both tables from the formatted light and dark themes.
///
/// Every dark key must also be a light key; the pipeline rejects dark-only
/// paths before emission.
pub fn emit_tables(light: &FormattedTheme, dark: &FormattedTheme, options: &EmitOptions) -> NativeTables {
    let light_table: BTreeMap<String, NativeValue> = light
        .iter()
        .map(|t| (t.key.clone(), t.native.clone()))
        .collect();

    let mut dark_table = light_table.clone();
    dark_table.extend(dark.iter().map(|t| (t.key.clone(), t.native.clone())));

    NativeTables {
        header: options.header.clone(),
        light: light_table,
        dark: dark_table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::tests::formatted;
    use pretty_assertions::assert_eq;

    fn tables() -> NativeTables {
        let (light, dark) = formatted(
            r##"{ "color": { "primary": { "500": { "type": "color", "value": "#0EA5E9" } } },
                 "spacing": { "4": { "type": "dimension", "value": 4 } } }"##,
            r##"{ "surface": { "primary": { "type": "color", "value": "#FFFFFF" } },
                 "button": { "bg": { "type": "color", "value": "{color.primary.500}" } } }"##,
            r##"{ "surface": { "primary": { "type": "color", "value": "#0F172A" } } }"##,
        );
        emit_tables(&light, &dark, &EmitOptions::default())
    }

    #[test]
    fn test_tables_share_keys() {
        let tables = tables();
        let light: Vec<_> = tables.light().keys().collect();
        let dark: Vec<_> = tables.dark().keys().collect();
        assert_eq!(light, dark);
        assert_eq!(
            tables.dark().get("surfacePrimary"),
            Some(&NativeValue::Text("#0F172A".into()))
        );
        assert_eq!(
            tables.dark().get("buttonBg"),
            Some(&NativeValue::Text("#0EA5E9".into()))
        );
    }

    #[test]
    fn test_select() {
        let tables = tables();
        assert_eq!(tables.select("dark"), Some(tables.dark()));
        assert_eq!(tables.select("light"), Some(tables.table(Theme::Light)));
        assert!(tables.select("sepia").is_none());
    }

    #[test]
    fn test_render_module() {
        let expected = "\
// Generated by tokensmith. Do not edit.

export const light = {
  buttonBg: \"#0EA5E9\",
  colorPrimary500: \"#0EA5E9\",
  spacing4: 4,
  surfacePrimary: \"#FFFFFF\",
} as const;

export const dark = {
  buttonBg: \"#0EA5E9\",
  colorPrimary500: \"#0EA5E9\",
  spacing4: 4,
  surfacePrimary: \"#0F172A\",
} as const;

export type ThemeName = \"light\" | \"dark\";

export const themes = { light, dark } as const;

export function getTokens(theme: ThemeName) {
  return themes[theme];
}
";
        assert_eq!(tables().render_module(), expected);
    }

    #[test]
    fn test_quoted_keys() {
        assert_eq!(render_key("spacing4"), "spacing4");
        assert_eq!(render_key("4xl"), "\"4xl\"");
        assert_eq!(render_key("a-b"), "\"a-b\"");
    }

    #[test]
    fn test_to_json() {
        let json = tables().to_json();
        assert_eq!(json["light"]["spacing4"], serde_json::json!(4));
        assert_eq!(json["dark"]["surfacePrimary"], serde_json::json!("#0F172A"));
    }
}
