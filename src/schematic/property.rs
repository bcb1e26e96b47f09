//! `(property "Name" "Value" ...)` groups.

use std::borrow::Cow;
use std::ops::Deref;

use crate::syntax::{Element, Node, Token};

pub const PROPERTY_TAG: &str = "property";
const ID_TAG: &str = "id";

/// A named field of a symbol.
///
/// The first two children are always leaf tokens (name, then value); this
/// is checked by [`Property::from_node`] and kept by only exposing the
/// group immutably.
///
/// ```text
/// (property "Reference" "R1" (id 0) (at 100.33 48.26 0)
///   (effects (font (size 1.27 1.27)) (justify left))
/// )
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property(Node);

impl Property {
    /// Wrap `node` if it is a property with name and value tokens,
    /// otherwise hand it back unchanged.
    pub fn from_node(node: Node) -> Result<Self, Node> {
        let well_formed = node.name() == PROPERTY_TAG
            && node.children().len() >= 2
            && node.children()[..2].iter().all(|child| child.as_token().is_some());
        if well_formed { Ok(Self(node)) } else { Err(node) }
    }

    /// Build a fresh hidden property placed at `at` (`x`, `y`).
    ///
    /// Used when a symbol has no existing property to copy formatting from.
    pub fn new(name: &str, value: &str, id: Option<i64>, at: (&Token, &Token), leading: &str) -> Self {
        let mut node = Node::new(PROPERTY_TAG, leading)
            .with_child(Token::string(name, " "))
            .with_child(Token::string(value, " "));
        if let Some(id) = id {
            node.push(Node::new(ID_TAG, " ").with_child(Token::int(id, " ")));
        }

        node.push(Node::leaf("at", " ", &[at.0.text(), at.1.text(), "0"]));

        let font = Node::new("font", " ").with_child(Node::leaf("size", " ", &["1.27", "1.27"]));
        node.push(
            Node::new("effects", " ")
                .with_child(font)
                .with_child(Token::new("hide", " ")),
        );
        Self(node)
    }

    pub fn as_node(&self) -> &Node {
        &self.0
    }

    pub fn into_node(self) -> Node {
        self.0
    }

    /// Field name, unquoted.
    pub fn name(&self) -> Cow<'_, str> {
        self.positional(0).unquoted()
    }

    /// Field value, unquoted.
    pub fn value(&self) -> Cow<'_, str> {
        self.positional(1).unquoted()
    }

    pub fn set_name(&mut self, name: &str) {
        self.positional_mut(0).set_content(name);
    }

    pub fn set_value(&mut self, value: &str) {
        self.positional_mut(1).set_content(value);
    }

    /// Numeric identifier from the `(id n)` child, if this schema has one.
    pub fn id(&self) -> Option<i64> {
        self.0.child_named(ID_TAG)?.token(0)?.as_int()
    }

    /// Update the `(id n)` child. Returns false when there is none.
    pub fn set_id(&mut self, id: i64) -> bool {
        match self.0.child_named_mut(ID_TAG).and_then(|node| node.token_mut(0)) {
            Some(token) => {
                token.set_text(id.to_string());
                true
            }
            None => false,
        }
    }

    fn positional(&self, index: usize) -> &Token {
        match &self.0.children()[index] {
            Element::Token(token) => token,
            _ => unreachable!("property name and value are checked on construction"),
        }
    }

    fn positional_mut(&mut self, index: usize) -> &mut Token {
        match &mut self.0.children_mut()[index] {
            Element::Token(token) => token,
            _ => unreachable!("property name and value are checked on construction"),
        }
    }
}

impl Deref for Property {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.0
    }
}
