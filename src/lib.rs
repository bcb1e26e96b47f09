//! # kicad-fields
//!
//! Lossless editing of KiCad schematic files and bulk field updates driven
//! by a component database.
//!
//! ## Module Structure
//!
//! ```text
//! schematic → Property / Symbol wrappers, bulk operations, diagnostics
//! db        → Component rows + ordered substring matcher
//! syntax    → Tokenizer, tree builder, printer (byte-exact round trip)
//! base      → Primitives (TextRange, LineIndex, FxIndexMap)
//! ```
//!
//! Only `base` is a strict bottom layer. The closed
//! [`Element`](syntax::Element) enum in `syntax::tree` carries the
//! [`Property`] and [`Symbol`] variants defined in `schematic`, while
//! `schematic` parses and edits through `syntax`. Likewise `schematic`
//! matches symbols against `db`, and `db::matcher` reads field values
//! straight from [`Property`] maps.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Foundation types: text ranges, line index, ordered maps
pub mod base;

/// Component database and matcher
pub mod db;

/// KiCad schematic model
pub mod schematic;

/// Lossless s-expression syntax
pub mod syntax;

pub use base::{FxIndexMap, LineCol, LineIndex, TextRange, TextSize};
pub use db::{ComponentDb, Row};
pub use schematic::{Property, Schematic, SchematicConfig, Symbol};
pub use syntax::{Document, Element, Node, SyntaxError, Token};

/// Errors that abort an operation.
///
/// Conditions that only affect a single symbol are reported as
/// [`schematic::Diagnostic`] values instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("{}: {source}", .path.display())]
    Parse { path: PathBuf, source: SyntaxError },

    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[cfg(feature = "csv")]
    #[error("malformed component table: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot rename {old} fields to {new} names")]
    RenameArity { old: usize, new: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
