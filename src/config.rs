//! Build configuration.
//!
//! A [`Config`] is passed explicitly to the pipeline. It can be built in code
//! with [`ConfigBuilder`] or read from a `tokensmith.json` file:
//!
//! ```json
//! {
//!   "base": "tokens/base.json",
//!   "light": "tokens/light.json",
//!   "dark": "tokens/dark.json",
//!   "css": "dist/tokens.css",
//!   "native": "dist/tokens.ts",
//!   "dimension_base": 4,
//!   "dimension_unit": "px"
//! }
//! ```
//!
//! Every key is optional. Relative paths in a file are taken relative to the
//! file's directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codegen::{DEFAULT_DIMENSION_BASE, DEFAULT_DIMENSION_UNIT, TypeFormatter};
use crate::diagnostic::{DiagnosticOptions, Result, TokenError};
use crate::emit::{DEFAULT_DARK_SELECTOR, DEFAULT_HEADER, EmitOptions};
use crate::normalize::Normalizer;
use crate::token::is_valid_segment;

/// File name looked up by [`Config::discover`].
pub const CONFIG_FILE: &str = "tokensmith.json";

/// Configuration of one compiler run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Primitives document.
    pub base: PathBuf,
    /// Light overlay document.
    pub light: PathBuf,
    /// Dark overlay document.
    pub dark: PathBuf,
    /// Stylesheet output.
    pub css: PathBuf,
    /// Native module output.
    pub native: PathBuf,
    /// Optional JSON rendering of the native tables.
    pub native_json: Option<PathBuf>,
    /// Physical units per dimension scale step.
    pub dimension_base: f64,
    /// Stylesheet dimension unit.
    pub dimension_unit: String,
    /// Selector of the dark override block.
    pub dark_selector: String,
    /// Prefix for every custom-property name.
    pub css_prefix: Option<String>,
    /// Top-level category renames for custom-property names.
    pub namespaces: BTreeMap<String, String>,
    /// Header comment written into both artifacts.
    pub header: String,
    /// Colour diagnostics.
    pub colored: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base: PathBuf::from("tokens/base.json"),
            light: PathBuf::from("tokens/light.json"),
            dark: PathBuf::from("tokens/dark.json"),
            css: PathBuf::from("dist/tokens.css"),
            native: PathBuf::from("dist/tokens.ts"),
            native_json: None,
            dimension_base: DEFAULT_DIMENSION_BASE,
            dimension_unit: DEFAULT_DIMENSION_UNIT.to_string(),
            dark_selector: DEFAULT_DARK_SELECTOR.to_string(),
            css_prefix: None,
            namespaces: BTreeMap::new(),
            header: DEFAULT_HEADER.to_string(),
            colored: true,
        }
    }
}

impl Config {
    /// Read a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| TokenError::io(path, e))?;
        let mut config: Config = serde_json::from_str(&text).map_err(|source| TokenError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            config.rebase(dir);
        }
        config.validate()?;
        Ok(config)
    }

    /// Load `tokensmith.json` from `dir` if it exists, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            return Self::load(&path);
        }
        let mut config = Self::default();
        config.rebase(dir);
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.dimension_base.is_finite() && self.dimension_base > 0.0) {
            return Err(TokenError::Config(format!(
                "dimension_base must be a positive number, got {}",
                self.dimension_base
            )));
        }
        if !self
            .dimension_unit
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '%')
        {
            return Err(TokenError::Config(format!(
                "dimension_unit '{}' is not a CSS unit",
                self.dimension_unit
            )));
        }
        if self.dark_selector.trim().is_empty() {
            return Err(TokenError::Config("dark_selector must not be empty".into()));
        }
        if self.header.contains("*/") || self.header.contains('\n') {
            return Err(TokenError::Config("header must be a single line without '*/'".into()));
        }
        if let Some(prefix) = self.css_prefix.as_deref().filter(|p| !is_valid_segment(p)) {
            return Err(TokenError::Config(format!(
                "css_prefix '{prefix}' may only contain letters, digits, '-' and '_'"
            )));
        }
        for (category, renamed) in &self.namespaces {
            if !is_valid_segment(category) || !(renamed.is_empty() || is_valid_segment(renamed)) {
                return Err(TokenError::Config(format!(
                    "namespace '{category}' -> '{renamed}' may only contain letters, digits, '-' and '_'"
                )));
            }
        }

        let mut outputs = vec![&self.css, &self.native];
        outputs.extend(&self.native_json);
        for (i, path) in outputs.iter().enumerate() {
            if outputs[..i].contains(path) {
                return Err(TokenError::Config(format!(
                    "output path {} is used for more than one artifact",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    fn rebase(&mut self, dir: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = dir.join(&*p);
            }
        };
        join(&mut self.base);
        join(&mut self.light);
        join(&mut self.dark);
        join(&mut self.css);
        join(&mut self.native);
        if let Some(p) = self.native_json.as_mut() {
            join(p);
        }
    }

    /// Value formatter for this configuration.
    pub fn formatter(&self) -> TypeFormatter {
        TypeFormatter::new()
            .with_dimension_base(self.dimension_base)
            .with_dimension_unit(self.dimension_unit.clone())
    }

    /// Identifier normalizer for this configuration.
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new()
            .with_prefix(self.css_prefix.clone())
            .with_namespaces(self.namespaces.clone())
    }

    /// Emitter options for this configuration.
    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            header: self.header.clone(),
            dark_selector: self.dark_selector.clone(),
        }
    }

    /// Diagnostic options for this configuration.
    pub fn diagnostic_options(&self) -> DiagnosticOptions {
        DiagnosticOptions::default().with_colored(self.colored)
    }
}

/// Configuration builder for fluent API.
///
/// ```ignore
/// let config = ConfigBuilder::new()
///     .sources("design/tokens")
///     .css("web/src/tokens.css")
///     .native("mobile/src/tokens.ts")
///     .dimension_base(0.25)
///     .dimension_unit("rem")
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `base.json`, `light.json` and `dark.json` from `dir`.
    pub fn sources(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.config.base = dir.join("base.json");
        self.config.light = dir.join("light.json");
        self.config.dark = dir.join("dark.json");
        self
    }

    /// Set the primitives document.
    pub fn base(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.base = path.into();
        self
    }

    /// Set the light overlay document.
    pub fn light(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.light = path.into();
        self
    }

    /// Set the dark overlay document.
    pub fn dark(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dark = path.into();
        self
    }

    /// Set the stylesheet output.
    pub fn css(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.css = path.into();
        self
    }

    /// Set the native module output.
    pub fn native(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.native = path.into();
        self
    }

    /// Also write the native tables as JSON.
    pub fn native_json(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.native_json = Some(path.into());
        self
    }

    /// Set the physical units per dimension scale step.
    pub fn dimension_base(mut self, base: f64) -> Self {
        self.config.dimension_base = base;
        self
    }

    /// Set the stylesheet dimension unit.
    pub fn dimension_unit(mut self, unit: impl Into<String>) -> Self {
        self.config.dimension_unit = unit.into();
        self
    }

    /// Set the dark override selector.
    pub fn dark_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.dark_selector = selector.into();
        self
    }

    /// Prefix every custom-property name.
    pub fn css_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.css_prefix = Some(prefix.into());
        self
    }

    /// Rename a top-level category in custom-property names.
    pub fn namespace(mut self, category: impl Into<String>, renamed: impl Into<String>) -> Self {
        self.config.namespaces.insert(category.into(), renamed.into());
        self
    }

    /// Set the artifact header line.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.config.header = header.into();
        self
    }

    /// Set whether diagnostics are coloured.
    pub fn colored(mut self, colored: bool) -> Self {
        self.config.colored = colored;
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
