//! Prelude module for convenient imports.
//!
//! ```ignore
//! use tokensmith::prelude::*;
//! ```

// Pipeline
pub use crate::process::{BuildReport, Compilation, Pipeline, Stage};

// Configuration
pub use crate::config::{Config, ConfigBuilder};

// Diagnostics
pub use crate::diagnostic::{DiagnosticOptions, DisplayStyle, Result, TokenError, render};

// Tokens
pub use crate::token::{Scalar, Theme, Token, TokenDocument, TokenPath, TokenType};
pub use crate::source::{SourceSet, load};

// Stages
pub use crate::graph::TokenGraph;
pub use crate::normalize::{Convention, Normalizer};
pub use crate::resolve::{ResolvedTheme, Resolver, resolve_theme};
pub use crate::codegen::{NativeValue, TypeFormatter};

// Artifacts
pub use crate::emit::{Artifacts, EmitOptions, NativeTables, Stylesheet};
