//! Token data model.
//!
//! - [`TokenPath`] - dotted category path
//! - [`Theme`], [`TokenType`] - theme variant and declared type
//! - [`RawValue`], [`Scalar`] - literal or reference as written in source
//! - [`Token`], [`TokenDocument`] - the loaded, unresolved document

mod document;
mod path;
mod value;

pub use document::{Token, TokenDocument};
pub use path::{format_chain, is_valid_segment, TokenPath};
pub use value::{RawValue, Scalar, Theme, TokenType};
