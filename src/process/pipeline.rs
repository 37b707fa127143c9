//! Build orchestration.
//!
//! ```text
//! Loaded → GraphBuilt → Resolved → Normalized → Formatted → Emitted
//! ```
//!
//! Each transition is gated by the previous stage succeeding for every
//! theme. Artifacts are written only after `Emitted`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use log::{debug, info};

use crate::config::Config;
use crate::diagnostic::{Result, TokenError};
use crate::emit::{Artifacts, emit};
use crate::graph::TokenGraph;
use crate::resolve::resolve_theme;
use crate::source::{SourceSet, load};
use crate::token::{Theme, TokenDocument};

use super::output::write_artifacts;

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Sources parsed into a token document.
    Loaded,
    /// Reference graphs built for every theme.
    GraphBuilt,
    /// Every path resolved to a terminal value.
    Resolved,
    /// Identifiers assigned and checked for collisions.
    Normalized,
    /// Values rendered per target.
    Formatted,
    /// Artifacts produced in memory.
    Emitted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loaded => "loaded",
            Stage::GraphBuilt => "graph-built",
            Stage::Resolved => "resolved",
            Stage::Normalized => "normalized",
            Stage::Formatted => "formatted",
            Stage::Emitted => "emitted",
        };
        f.write_str(name)
    }
}

/// Result of a compile: artifacts plus counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    /// In-memory artifacts.
    pub artifacts: Artifacts,
    /// Summary counts.
    pub report: BuildReport,
}

/// Summary of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Resolved tokens per theme (overlays include base).
    pub tokens: BTreeMap<Theme, usize>,
    /// Declarations in the dark override block.
    pub dark_overrides: usize,
    /// Files written, in order.
    pub written: Vec<PathBuf>,
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = |theme: Theme| self.tokens.get(&theme).copied().unwrap_or(0);
        write!(
            f,
            "{} base, {} light, {} dark tokens; {} dark overrides",
            count(Theme::Base),
            count(Theme::Light),
            count(Theme::Dark),
            self.dark_overrides
        )?;
        if !self.written.is_empty() {
            let files: Vec<String> = self.written.iter().map(|p| p.display().to_string()).collect();
            write!(f, "; wrote {}", files.join(", "))?;
        }
        Ok(())
    }
}

/// The token compiler.
///
/// ```ignore
/// let config = Config::discover(Path::new("."))?;
/// let report = Pipeline::new(config).build()?;
/// println!("{report}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    /// Create a pipeline for `config`.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read the configured sources.
    pub fn read_sources(&self) -> Result<SourceSet> {
        SourceSet::read(&self.config.base, &self.config.light, &self.config.dark)
    }

    /// Read the sources and compile them in memory.
    pub fn compile(&self) -> Result<Artifacts> {
        let sources = self.read_sources()?;
        Ok(self.compile_sources(&sources)?.artifacts)
    }

    /// Compile an already loaded source set in memory.
    pub fn compile_sources(&self, sources: &SourceSet) -> Result<Compilation> {
        let doc = load(sources)?;
        advance(Stage::Loaded);

        let graphs = [
            TokenGraph::build(&doc, Theme::Base)?,
            TokenGraph::build(&doc, Theme::Light)?,
            TokenGraph::build(&doc, Theme::Dark)?,
        ];
        check_dark_defaults(&doc)?;
        advance(Stage::GraphBuilt);

        let [base, light, dark] = graphs.each_ref().map(|graph| resolve_theme(&doc, graph));
        let (base, light, dark) = (base?, light?, dark?);
        advance(Stage::Resolved);

        let ids = self.config.normalizer().normalize([
            (Theme::Base, base.paths()),
            (Theme::Light, light.paths()),
            (Theme::Dark, dark.paths()),
        ])?;
        advance(Stage::Normalized);

        let formatter = self.config.formatter();
        let light_values = formatter.format_theme(&light, &ids)?;
        let dark_values = formatter.format_theme(&dark, &ids)?;
        advance(Stage::Formatted);

        let artifacts = emit(&light_values, &dark_values, &self.config.emit_options());
        advance(Stage::Emitted);

        let report = BuildReport {
            tokens: [(Theme::Base, base.len()), (Theme::Light, light.len()), (Theme::Dark, dark.len())]
                .into_iter()
                .collect(),
            dark_overrides: artifacts.stylesheet.dark_overrides().len(),
            written: Vec::new(),
        };
        Ok(Compilation { artifacts, report })
    }

    /// Compile and write every configured artifact.
    ///
    /// Nothing is written unless the whole compile succeeded.
    pub fn build(&self) -> Result<BuildReport> {
        let sources = self.read_sources()?;
        let Compilation { artifacts, mut report } = self.compile_sources(&sources)?;

        let mut files = vec![
            (self.config.css.clone(), artifacts.css()),
            (self.config.native.clone(), artifacts.native_module()),
        ];
        if let Some(path) = &self.config.native_json {
            files.push((path.clone(), artifacts.native_json()));
        }

        report.written = write_artifacts(&files)?;
        info!("event=build {report}");
        Ok(report)
    }
}

fn advance(stage: Stage) {
    debug!("event=stage stage={stage}");
}

/// Every dark path needs a light default so both native tables share keys.
fn check_dark_defaults(doc: &TokenDocument) -> Result<()> {
    match doc.paths(Theme::Dark).find(|path| doc.get(Theme::Light, path).is_none()) {
        Some(path) => Err(TokenError::missing_light_default(path)),
        None => Ok(()),
    }
}
