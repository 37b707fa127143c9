//! # tokensmith
//!
//! A design-token compiler. Raw design values (colours, spacing, typography,
//! semantic aliases, light/dark overlays) go in; two artifacts that always
//! agree come out:
//!
//! - a stylesheet of custom properties with a dark override block
//! - a flattened constant module for the native runtime
//!
//! ## Pipeline
//!
//! ```text
//! SourceSet ─ load ─▶ TokenDocument ─▶ TokenGraph ─▶ ResolvedTheme
//!                                                        │
//!             Artifacts ◀─ emit ◀─ FormattedTheme ◀─ NormalizedSet
//! ```
//!
//! Every stage must succeed for every theme before anything is written. A
//! missing reference, a cycle, a type mismatch or an identifier collision
//! aborts the run with a [`TokenError`] naming the offending path.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tokensmith::prelude::*;
//!
//! let config = ConfigBuilder::new()
//!     .sources("design/tokens")
//!     .css("web/src/tokens.css")
//!     .native("mobile/src/tokens.ts")
//!     .build()?;
//!
//! match Pipeline::new(config).build() {
//!     Ok(report) => println!("{report}"),
//!     Err(err) => eprintln!("{}", render(&err, &DiagnosticOptions::default())),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`token`]: paths, types, values and the per-theme token document
//! - [`source`]: JSON source documents and the schema loader
//! - [`graph`]: reference graph per theme
//! - [`resolve`]: alias resolution and cycle detection
//! - [`normalize`]: identifier flattening and collision checks
//! - [`codegen`]: literal parsing and per-target formatting
//! - [`emit`]: stylesheet and native emitters
//! - [`process`]: the staged pipeline and atomic output
//! - [`config`]: build configuration
//! - [`diagnostic`]: errors and their rendering

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod emit;
pub mod graph;
pub mod normalize;
pub mod prelude;
pub mod process;
pub mod resolve;
pub mod source;
pub mod token;

pub use config::{Config, ConfigBuilder};
pub use diagnostic::{DiagnosticOptions, Result, TokenError, render};
pub use emit::Artifacts;
pub use process::{BuildReport, Pipeline};
