//! KiCad schematic model on top of the generic syntax tree.
//!
//! - [`Property`] - a `(property "Name" "Value" ...)` field
//! - [`Symbol`] - a component instance holding properties
//! - [`Schematic`] - a whole `.kicad_sch` file and its bulk operations

pub mod diagnostics;
mod document;
pub mod fields;
mod property;
mod symbol;

pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity, codes};
pub use document::{
    MatchRecord, RenameMode, Schematic, SchematicConfig, SchematicSpecializer, UpdateReport,
};
pub use property::{PROPERTY_TAG, Property};
pub use symbol::{FieldError, PropertyUpdate, SYMBOL_TAG, Symbol};
