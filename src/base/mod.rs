//! Foundation types shared by the syntax and schematic layers.
//!
//! - [`TextRange`], [`TextSize`] - byte positions in source text
//! - [`LineCol`], [`LineIndex`] - line/column conversion for error reporting
//! - [`FxIndexMap`] - insertion-ordered map with a fast hasher
//!
//! This module has NO dependencies on other crate modules.

mod span;

pub use span::{LineCol, LineIndex, TextRange, TextSize};

/// Insertion-ordered hash map using the Fx hasher.
///
/// Field names and property names are short strings where the default
/// SipHash is needlessly slow, but iteration order must follow the source.
pub type FxIndexMap<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;

// Re-export text-size types for convenience
pub use text_size;
