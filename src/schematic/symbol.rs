//! `(symbol ...)` groups: component instances and their fields.

use std::borrow::Cow;
use std::ops::{Deref, DerefMut};

use thiserror::Error;
use tracing::{error, info};

use super::fields::{
    REFERENCE, SPECIAL_REFERENCES, SPECIAL_VALUES, VALUE, contains_any, is_read_only_field,
    is_reserved_field, is_special_field,
};
use super::property::Property;
use crate::base::FxIndexMap;
use crate::syntax::{Element, Node, Token};

pub const SYMBOL_TAG: &str = "symbol";
const DNP_TAG: &str = "dnp";
const IN_BOM_TAG: &str = "in_bom";

/// Groups after which a synthesized boolean attribute is inserted, so it
/// lands among the symbol's other flags rather than after its pins.
const ATTRIBUTE_ANCHORS: &[&str] = &[
    "lib_name",
    "lib_id",
    "at",
    "mirror",
    "unit",
    "convert",
    "exclude_from_sim",
    IN_BOM_TAG,
    "on_board",
    DNP_TAG,
];

/// Outcome of [`Symbol::add_property`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyUpdate {
    /// A new property was synthesized and inserted.
    Added,
    /// An existing property got a new value.
    Updated,
    /// The property already held this value.
    Unchanged,
    /// Read-only field with a non-empty value; left alone.
    ReadOnly,
    /// Empty input value; nothing to do.
    EmptyValue,
}

impl PropertyUpdate {
    /// Whether the symbol was modified.
    pub fn is_change(self) -> bool {
        matches!(self, PropertyUpdate::Added | PropertyUpdate::Updated)
    }
}

/// Refused field operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("cannot remove protected field '{field}'")]
    Protected { field: String },
}

/// A component instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol(Node);

impl Symbol {
    /// Wrap `node` if it is named `symbol`, otherwise hand it back.
    pub fn from_node(node: Node) -> Result<Self, Node> {
        if node.name() == SYMBOL_TAG { Ok(Self(node)) } else { Err(node) }
    }

    pub fn as_node(&self) -> &Node {
        &self.0
    }

    pub fn as_node_mut(&mut self) -> &mut Node {
        &mut self.0
    }

    pub fn into_node(self) -> Node {
        self.0
    }

    // ------------------------------------------------------------------------
    // Field lookup
    // ------------------------------------------------------------------------

    /// Child properties in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.0.children().iter().filter_map(Element::as_property)
    }

    pub fn properties_mut(&mut self) -> impl Iterator<Item = &mut Property> {
        self.0.children_mut().iter_mut().filter_map(Element::as_property_mut)
    }

    /// Properties keyed by name. A later duplicate replaces an earlier one.
    pub fn properties_dict(&self) -> FxIndexMap<Cow<'_, str>, &Property> {
        let mut dict = FxIndexMap::default();
        for property in self.properties() {
            dict.insert(property.name(), property);
        }
        dict
    }

    /// First property named `name`.
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties().find(|property| property.name() == name)
    }

    pub fn get_property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties_mut().find(|property| property.name() == name)
    }

    /// Value of the `Reference` field, empty if absent.
    pub fn reference(&self) -> Cow<'_, str> {
        self.field(REFERENCE)
    }

    /// Value of the `Value` field, empty if absent.
    pub fn value(&self) -> Cow<'_, str> {
        self.field(VALUE)
    }

    fn field(&self, name: &str) -> Cow<'_, str> {
        self.get_property(name)
            .map(|property| property.value())
            .unwrap_or_default()
    }

    /// The `x` and `y` tokens of the symbol's own `(at x y r)` child.
    pub fn position(&self) -> Option<(&Token, &Token)> {
        let at = self.0.child_named("at")?;
        Some((at.token(0)?, at.token(1)?))
    }

    // ------------------------------------------------------------------------
    // Field edits
    // ------------------------------------------------------------------------

    /// Set field `name` to `value`, adding the field if it does not exist.
    ///
    /// An empty `value` is a no-op. A read-only field is only written while
    /// it is empty. A new field is copied from the last existing property so
    /// it inherits its formatting, and takes the next free identifier.
    pub fn add_property(&mut self, name: &str, value: &str) -> PropertyUpdate {
        if value.is_empty() {
            return PropertyUpdate::EmptyValue;
        }

        if let Some(property) = self.get_property_mut(name) {
            let outcome = {
                let current = property.value();
                if is_read_only_field(name) && !current.is_empty() {
                    PropertyUpdate::ReadOnly
                } else if current == value {
                    PropertyUpdate::Unchanged
                } else {
                    PropertyUpdate::Updated
                }
            };
            if outcome == PropertyUpdate::Updated {
                property.set_value(value);
                info!("updating property {name} = {value}");
            }
            return outcome;
        }

        info!("adding property {name} = {value}");
        self.insert_property(name, value);
        PropertyUpdate::Added
    }

    /// Append a new property after the last existing one, whatever its
    /// value or name. Ids are renumbered afterwards.
    pub(crate) fn insert_property(&mut self, name: &str, value: &str) {
        let property = self.synthesize_property(name, value);
        let has_id = property.id().is_some();
        let index = self
            .0
            .children()
            .iter()
            .rposition(|child| child.as_property().is_some())
            .map_or(self.0.children().len(), |last| last + 1);
        self.0.insert(index, property);
        if has_id {
            self.renumber_ids();
        }
    }

    /// A property shaped like the last existing one, or a fresh hidden one
    /// at the symbol's position. Its id is provisional until the symbol's
    /// ids are renumbered.
    fn synthesize_property(&self, name: &str, value: &str) -> Property {
        let next_id = self.properties().filter_map(Property::id).max().map(|max| max + 1);

        if let Some(template) = self.properties().last() {
            let mut property = template.clone();
            property.set_name(name);
            property.set_value(value);
            if let Some(id) = next_id {
                property.set_id(id);
            }
            return property;
        }

        let leading = self.0.children().last().map_or(" ", Element::leading);
        let origin = Token::new("0", "");
        let at = self.position().unwrap_or((&origin, &origin));
        Property::new(name, value, next_id, at, leading)
    }

    /// Remove the first non-special property named `name`.
    ///
    /// Reserved-prefix fields are refused. Returns whether a property was
    /// removed; identifiers of the remaining non-special properties are
    /// renumbered to stay contiguous.
    pub fn remove_prop(&mut self, name: &str) -> Result<bool, FieldError> {
        if is_reserved_field(name) {
            error!("cannot delete protected property {name}");
            return Err(FieldError::Protected {
                field: name.to_owned(),
            });
        }
        if is_special_field(name) {
            return Ok(false);
        }

        let Some(index) = self
            .0
            .children()
            .iter()
            .position(|child| child.as_property().is_some_and(|p| p.name() == name))
        else {
            return Ok(false);
        };

        info!("removing {name} from {}", self.reference());
        self.0.remove(index);
        self.renumber_ids();
        Ok(true)
    }

    /// Remove every property that is neither special nor reserved.
    ///
    /// Returns the removed field names in document order.
    pub fn clean_properties(&mut self) -> Vec<String> {
        let reference = self.reference().into_owned();
        let mut removed = Vec::new();

        self.0.retain(|child| {
            let Some(property) = child.as_property() else {
                return true;
            };
            let name = property.name();
            if is_special_field(&name) || is_reserved_field(&name) {
                return true;
            }
            info!("removing {name} from {reference}");
            removed.push(name.into_owned());
            false
        });

        if !removed.is_empty() {
            self.renumber_ids();
        }
        removed
    }

    /// Special properties take ids `0..n` in document order; the other
    /// id-bearing properties follow from `n`. Properties without an id
    /// are left without one.
    fn renumber_ids(&mut self) {
        let special = self
            .properties()
            .filter(|property| property.id().is_some() && is_special_field(&property.name()))
            .count() as i64;

        let (mut next_special, mut next) = (0, special);
        for property in self.properties_mut() {
            if property.id().is_none() {
                continue;
            }
            let slot = if is_special_field(&property.name()) {
                &mut next_special
            } else {
                &mut next
            };
            property.set_id(*slot);
            *slot += 1;
        }
    }

    // ------------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------------

    /// Power/flag symbols, mounting holes, test points, logos and the like.
    pub fn is_special(&self) -> bool {
        contains_any(&self.reference(), SPECIAL_REFERENCES)
            || contains_any(&self.value(), SPECIAL_VALUES)
    }

    /// Whether the part gets assembled: not special and `dnp_mark` absent
    /// from the Value field.
    pub fn is_populated(&self, dnp_mark: &str) -> bool {
        !self.is_special() && !has_mark(&self.value(), dnp_mark)
    }

    /// Write `Y`/`N` into the `field` property. Special symbols are skipped.
    pub fn add_populate_field(&mut self, dnp_mark: &str, field: &str) -> Option<PropertyUpdate> {
        if self.is_special() {
            return None;
        }
        let flag = if self.is_populated(dnp_mark) { "Y" } else { "N" };
        Some(self.add_property(field, flag))
    }

    // ------------------------------------------------------------------------
    // Boolean attributes (`(dnp yes)`, `(in_bom no)`)
    // ------------------------------------------------------------------------

    /// A `(name yes|no)` attribute, `None` if absent or not a boolean.
    pub fn attribute(&self, name: &str) -> Option<bool> {
        match self.0.child_named(name)?.token(0)?.text() {
            "yes" => Some(true),
            "no" => Some(false),
            _ => None,
        }
    }

    /// Set a `(name yes|no)` attribute, inserting it among the symbol's
    /// other attributes when absent.
    pub fn set_attribute(&mut self, name: &str, value: bool) {
        let text = if value { "yes" } else { "no" };

        if let Some(node) = self.0.child_named_mut(name) {
            match node.token_mut(0) {
                Some(token) => token.set_text(text),
                None => node.push(Token::new(text, " ")),
            }
            return;
        }

        let index = self
            .0
            .children()
            .iter()
            .rposition(|child| ATTRIBUTE_ANCHORS.iter().any(|anchor| child.is_named(anchor)))
            .map_or(0, |last| last + 1);
        self.0.insert(index, Node::leaf(name, " ", &[text]));
    }

    /// The `dnp` attribute; absent means populated.
    pub fn dnp(&self) -> bool {
        self.attribute(DNP_TAG).unwrap_or(false)
    }

    /// The `in_bom` attribute; absent means included.
    pub fn in_bom(&self) -> bool {
        self.attribute(IN_BOM_TAG).unwrap_or(true)
    }

    /// Recompute the `dnp` attribute and strip `dnp_mark` out of Value.
    ///
    /// A symbol already marked `(dnp yes)` stays unpopulated, so running
    /// this again after the mark was stripped gives the same result.
    /// Returns the new `dnp` state, or `None` for special symbols.
    pub fn add_populate_attr(&mut self, dnp_mark: &str) -> Option<bool> {
        if self.is_special() {
            return None;
        }

        let value = self.value().into_owned();
        let dnp = self.dnp() || !self.is_populated(dnp_mark);
        self.set_attribute(DNP_TAG, dnp);

        if has_mark(&value, dnp_mark) {
            let stripped = value.replace(dnp_mark, "");
            let stripped = stripped.trim();
            if !stripped.is_empty() {
                if let Some(property) = self.get_property_mut(VALUE) {
                    property.set_value(stripped);
                }
            }
        }
        Some(dnp)
    }

    /// Whether the symbol belongs in the bill of materials: never for
    /// special symbols, otherwise whatever `in_bom` says.
    pub fn is_in_bom(&self) -> bool {
        !self.is_special() && self.in_bom()
    }

    /// Write [`Symbol::is_in_bom`] into the `in_bom` attribute.
    pub fn add_in_bom_attr(&mut self) -> bool {
        let in_bom = self.is_in_bom();
        self.set_attribute(IN_BOM_TAG, in_bom);
        in_bom
    }
}

fn has_mark(text: &str, mark: &str) -> bool {
    !mark.is_empty() && text.contains(mark)
}

impl Deref for Symbol {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.0
    }
}

impl DerefMut for Symbol {
    fn deref_mut(&mut self) -> &mut Node {
        &mut self.0
    }
}
