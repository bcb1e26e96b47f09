//! Schematic-level bulk operations over top-level symbols.

use std::fmt;
use std::path::Path;

use smol_str::SmolStr;
use tracing::{error, info, warn};

use super::diagnostics::{Diagnostic, DiagnosticCollector, codes};
use super::fields::{REFERENCE, is_special_field};
use super::property::{PROPERTY_TAG, Property};
use super::symbol::{FieldError, SYMBOL_TAG, Symbol};
use crate::db::ComponentDb;
use crate::syntax::{Document, Element, Node, Specializer, SyntaxError};
use crate::{Error, Result};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// How [`Schematic::rename_fields`] renames a property.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenameMode {
    /// Change the name in place; position and identifier are kept.
    #[default]
    InPlace,
    /// Remove the property and add it back under the new name, so it moves
    /// to the end of the identifier order. Special fields, which cannot be
    /// removed, are renamed in place.
    Reinsert,
}

/// Run-level settings of a [`Schematic`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchematicConfig {
    /// Substring of Value marking a part as not populated.
    pub dnp_mark: SmolStr,
    /// Field written by [`Schematic::add_populate_fields`].
    pub populate_field: SmolStr,
    pub rename_mode: RenameMode,
}

impl Default for SchematicConfig {
    fn default() -> Self {
        Self {
            dnp_mark: SmolStr::new_static("DNP"),
            populate_field: SmolStr::new_static("Populate"),
            rename_mode: RenameMode::default(),
        }
    }
}

impl SchematicConfig {
    pub fn with_dnp_mark(mut self, mark: impl Into<SmolStr>) -> Self {
        self.dnp_mark = mark.into();
        self
    }

    pub fn with_populate_field(mut self, field: impl Into<SmolStr>) -> Self {
        self.populate_field = field.into();
        self
    }

    pub fn with_rename_mode(mut self, mode: RenameMode) -> Self {
        self.rename_mode = mode;
        self
    }
}

// ============================================================================
// SPECIALIZER
// ============================================================================

/// Wraps `property` and `symbol` groups in their schematic variants.
#[derive(Clone, Copy, Debug, Default)]
pub struct SchematicSpecializer;

impl Specializer for SchematicSpecializer {
    fn specialize(&self, node: Node) -> Element {
        match node.name() {
            PROPERTY_TAG => Property::from_node(node).map_or_else(Element::Node, Element::Property),
            SYMBOL_TAG => Symbol::from_node(node).map_or_else(Element::Node, Element::Symbol),
            _ => Element::Node(node),
        }
    }
}

// ============================================================================
// REPORTS
// ============================================================================

/// How one symbol was matched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchRecord {
    pub reference: String,
    /// Index of the key group that produced the match.
    pub group_index: usize,
    /// Index of the matched database row.
    pub row_index: usize,
}

/// Outcome of [`Schematic::update_fields_from_db`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub matched: Vec<MatchRecord>,
    /// References of special symbols that were not matched.
    pub skipped: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl UpdateReport {
    /// References of symbols that found no match.
    pub fn unmatched(&self) -> impl Iterator<Item = &str> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.code == codes::NO_MATCH)
            .map(|diag| diag.reference.as_str())
    }
}

// ============================================================================
// SCHEMATIC
// ============================================================================

/// A parsed schematic document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schematic {
    document: Document,
    config: SchematicConfig,
}

impl Schematic {
    pub fn parse(text: &str) -> std::result::Result<Self, SyntaxError> {
        Self::parse_with_config(text, SchematicConfig::default())
    }

    pub fn parse_with_config(
        text: &str,
        config: SchematicConfig,
    ) -> std::result::Result<Self, SyntaxError> {
        Ok(Self {
            document: Document::parse_with(text, &SchematicSpecializer)?,
            config,
        })
    }

    pub fn read_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_file_with_config(path, SchematicConfig::default())
    }

    pub fn read_file_with_config(path: impl AsRef<Path>, config: SchematicConfig) -> Result<Self> {
        Ok(Self {
            document: Document::read_file(path, &SchematicSpecializer)?,
            config,
        })
    }

    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.document.write_file(path)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &SchematicConfig {
        &self.config
    }

    /// Top-level symbols in document order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.document
            .root()
            .as_node()
            .into_iter()
            .flat_map(|root| root.children())
            .filter_map(Element::as_symbol)
    }

    pub fn symbols_mut(&mut self) -> impl Iterator<Item = &mut Symbol> {
        self.document
            .root_mut()
            .as_node_mut()
            .into_iter()
            .flat_map(|root| root.children_mut().iter_mut())
            .filter_map(Element::as_symbol_mut)
    }

    /// Copy database fields into every non-special symbol that matches.
    ///
    /// `key_groups` are tried in order, see [`crate::db::matcher`]. Symbols
    /// without a match are reported and left untouched.
    pub fn update_fields_from_db<G, K>(&mut self, db: &ComponentDb, key_groups: &[G]) -> UpdateReport
    where
        G: AsRef<[K]>,
        K: AsRef<str>,
    {
        self.update_symbols(db, key_groups, false)
    }

    /// Like [`Schematic::update_fields_from_db`], but strips each symbol's
    /// non-special fields right before matching it.
    pub fn update_fields_from_db_with_cleanup<G, K>(
        &mut self,
        db: &ComponentDb,
        key_groups: &[G],
    ) -> UpdateReport
    where
        G: AsRef<[K]>,
        K: AsRef<str>,
    {
        self.update_symbols(db, key_groups, true)
    }

    fn update_symbols<G, K>(&mut self, db: &ComponentDb, key_groups: &[G], cleanup: bool) -> UpdateReport
    where
        G: AsRef<[K]>,
        K: AsRef<str>,
    {
        let mut report = UpdateReport::default();
        let mut diagnostics = DiagnosticCollector::new();

        for symbol in self.symbols_mut() {
            let reference = symbol.reference().into_owned();
            if symbol.get_property(REFERENCE).is_none() {
                warn!("symbol without a Reference property");
                diagnostics.missing_reference();
            }

            if symbol.is_special() {
                info!("ignoring special symbol {reference}");
                report.skipped.push(reference);
                continue;
            }

            if cleanup {
                symbol.clean_properties();
            }

            let found = {
                let props = symbol.properties_dict();
                if props.len() < symbol.properties().count() {
                    for name in props.keys() {
                        if symbol.properties().filter(|p| p.name() == *name).count() > 1 {
                            warn!("{reference} has duplicate property {name}");
                            diagnostics.duplicate_property(&reference, name);
                        }
                    }
                }
                db.match_symbol(key_groups, &props)
            };

            let Some(found) = found else {
                error!("no match found for {reference}");
                diagnostics.no_match(&reference);
                continue;
            };

            let keys: Vec<&str> = key_groups[found.group_index]
                .as_ref()
                .iter()
                .map(|key| key.as_ref())
                .collect();
            info!("{reference} matched by ({})", keys.join(", "));
            for field in db.prop_names() {
                symbol.add_property(field, found.row.value(field));
            }
            report.matched.push(MatchRecord {
                reference,
                group_index: found.group_index,
                row_index: found.row_index,
            });
        }

        report.diagnostics = diagnostics.finish();
        report
    }

    /// Strip stale non-special fields from every symbol.
    ///
    /// Returns the number of properties removed.
    pub fn clean_symbol_properties(&mut self) -> usize {
        self.symbols_mut()
            .map(|symbol| symbol.clean_properties().len())
            .sum()
    }

    /// Rename fields pairwise: `old_names[i]` becomes `new_names[i]`.
    pub fn rename_fields<S: AsRef<str>>(
        &mut self,
        old_names: &[S],
        new_names: &[S],
    ) -> Result<Vec<Diagnostic>> {
        if old_names.len() != new_names.len() {
            return Err(Error::RenameArity {
                old: old_names.len(),
                new: new_names.len(),
            });
        }

        let mode = self.config.rename_mode;
        let mut diagnostics = DiagnosticCollector::new();

        for symbol in self.symbols_mut() {
            for (old, new) in old_names.iter().zip(new_names) {
                let (old, new) = (old.as_ref(), new.as_ref());
                if let Err(FieldError::Protected { field }) = rename_field(symbol, old, new, mode) {
                    diagnostics.protected_field(&symbol.reference(), &field);
                }
            }
        }

        Ok(diagnostics.finish())
    }

    /// Write the populate text field into every non-special symbol.
    ///
    /// Returns the number of symbols that received the field.
    pub fn add_populate_fields(&mut self) -> usize {
        let SchematicConfig {
            dnp_mark,
            populate_field,
            ..
        } = self.config.clone();

        self.symbols_mut()
            .filter_map(|symbol| symbol.add_populate_field(&dnp_mark, &populate_field))
            .count()
    }

    /// Recompute the `dnp` attribute of every non-special symbol.
    ///
    /// Returns the number of symbols marked do-not-populate.
    pub fn add_populate_attrs(&mut self) -> usize {
        let dnp_mark = self.config.dnp_mark.clone();
        self.symbols_mut()
            .filter_map(|symbol| symbol.add_populate_attr(&dnp_mark))
            .filter(|&dnp| dnp)
            .count()
    }

    /// Recompute the `in_bom` attribute of every symbol.
    ///
    /// Returns the number of symbols excluded from the BOM.
    pub fn add_in_bom_attrs(&mut self) -> usize {
        self.symbols_mut()
            .map(|symbol| symbol.add_in_bom_attr())
            .filter(|&in_bom| !in_bom)
            .count()
    }
}

fn rename_field(
    symbol: &mut Symbol,
    old: &str,
    new: &str,
    mode: RenameMode,
) -> std::result::Result<(), FieldError> {
    let Some(property) = symbol.get_property_mut(old) else {
        return Ok(());
    };

    if mode == RenameMode::InPlace || is_special_field(old) {
        property.set_name(new);
        return Ok(());
    }

    let value = property.value().into_owned();
    if symbol.remove_prop(old)? {
        symbol.insert_property(new, &value);
    } else {
        warn!("could not remove {old} from {}", symbol.reference());
    }
    Ok(())
}

impl fmt::Display for Schematic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.document, f)
    }
}
