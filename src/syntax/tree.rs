//! Node model: parenthesized groups and their leaves.
//!
//! The tree is a closed set of variants ([`Element`]). Groups the document
//! context recognises by name are wrapped in richer variants
//! ([`Property`], [`Symbol`]) by a [`Specializer`] while parsing; everything
//! else stays a generic [`Node`]. All variants serialize the same way.

use smol_str::SmolStr;

use super::token::Token;
use crate::schematic::{Property, Symbol};

// ============================================================================
// ELEMENT
// ============================================================================

/// A child of a group: a leaf token or one of the group variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Element {
    Token(Token),
    Node(Node),
    Property(Property),
    Symbol(Symbol),
}

impl Element {
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Element::Token(token) => Some(token),
            _ => None,
        }
    }

    /// The underlying group of any non-leaf variant.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Element::Token(_) => None,
            Element::Node(node) => Some(node),
            Element::Property(property) => Some(property.as_node()),
            Element::Symbol(symbol) => Some(symbol.as_node()),
        }
    }

    /// Mutable access to the underlying group.
    ///
    /// Properties are excluded: their positional children may only change
    /// through [`Property`]'s own setters.
    pub fn as_node_mut(&mut self) -> Option<&mut Node> {
        match self {
            Element::Node(node) => Some(node),
            Element::Symbol(symbol) => Some(symbol.as_node_mut()),
            Element::Token(_) | Element::Property(_) => None,
        }
    }

    pub fn as_property(&self) -> Option<&Property> {
        match self {
            Element::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn as_property_mut(&mut self) -> Option<&mut Property> {
        match self {
            Element::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Element::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn as_symbol_mut(&mut self) -> Option<&mut Symbol> {
        match self {
            Element::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Whether this is a group named `name`.
    pub fn is_named(&self, name: &str) -> bool {
        self.as_node().is_some_and(|node| node.name() == name)
    }

    /// Leading formatting of the first token of this element.
    pub fn leading(&self) -> &str {
        match self {
            Element::Token(token) => token.leading(),
            _ => self.as_node().map_or("", |node| node.open().leading()),
        }
    }
}

impl From<Token> for Element {
    fn from(token: Token) -> Self {
        Element::Token(token)
    }
}

impl From<Node> for Element {
    fn from(node: Node) -> Self {
        Element::Node(node)
    }
}

impl From<Property> for Element {
    fn from(property: Property) -> Self {
        Element::Property(property)
    }
}

impl From<Symbol> for Element {
    fn from(symbol: Symbol) -> Self {
        Element::Symbol(symbol)
    }
}

// ============================================================================
// NODE
// ============================================================================

/// A parenthesized group: `(name child...)`.
///
/// The delimiter tokens are kept with their own leading formatting so an
/// untouched node prints back to its source bytes. `Clone` is a deep copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    open: Token,
    name: Token,
    children: Vec<Element>,
    close: Token,
}

impl Node {
    /// Assemble a node from parsed parts.
    pub fn from_parts(open: Token, name: Token, children: Vec<Element>, close: Token) -> Self {
        Self {
            open,
            name,
            children,
            close,
        }
    }

    /// A new empty group `(name)` whose opening delimiter is preceded by
    /// `leading`.
    pub fn new(name: &str, leading: impl Into<SmolStr>) -> Self {
        Self::from_parts(
            Token::l_paren(leading),
            Token::new(name, ""),
            Vec::new(),
            Token::r_paren(""),
        )
    }

    /// A group of leaf tokens on one line, e.g. `(at 10 20 0)`.
    ///
    /// Each argument is separated from the previous one by a single space.
    pub fn leaf(name: &str, leading: impl Into<SmolStr>, args: &[&str]) -> Self {
        let mut node = Self::new(name, leading);
        for arg in args {
            node.push(Token::new(*arg, " "));
        }
        node
    }

    /// Builder form of [`Node::push`].
    pub fn with_child(mut self, child: impl Into<Element>) -> Self {
        self.push(child);
        self
    }

    pub fn name(&self) -> &str {
        self.name.text()
    }

    pub fn name_token(&self) -> &Token {
        &self.name
    }

    pub fn open(&self) -> &Token {
        &self.open
    }

    pub fn open_mut(&mut self) -> &mut Token {
        &mut self.open
    }

    pub fn close(&self) -> &Token {
        &self.close
    }

    pub fn close_mut(&mut self) -> &mut Token {
        &mut self.close
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Element> {
        &mut self.children
    }

    /// Child groups named `name`, in order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children
            .iter()
            .filter_map(Element::as_node)
            .filter(move |node| node.name() == name)
    }

    /// First child group named `name`.
    pub fn child_named(&self, name: &str) -> Option<&Node> {
        self.children
            .iter()
            .filter_map(Element::as_node)
            .find(|node| node.name() == name)
    }

    /// First mutable child group named `name`.
    pub fn child_named_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children
            .iter_mut()
            .filter_map(Element::as_node_mut)
            .find(|node| node.name() == name)
    }

    /// Leaf tokens among the children, in order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(Element::as_token)
    }

    /// The `index`-th leaf token among the children.
    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens().nth(index)
    }

    pub fn token_mut(&mut self, index: usize) -> Option<&mut Token> {
        self.children
            .iter_mut()
            .filter_map(|child| match child {
                Element::Token(token) => Some(token),
                _ => None,
            })
            .nth(index)
    }

    pub fn push(&mut self, child: impl Into<Element>) {
        self.children.push(child.into());
    }

    pub fn insert(&mut self, index: usize, child: impl Into<Element>) {
        self.children.insert(index, child.into());
    }

    /// Remove and return the child at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Element {
        self.children.remove(index)
    }

    /// Keep only the children for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&Element) -> bool) {
        self.children.retain(keep);
    }
}

// ============================================================================
// SPECIALIZATION HOOK
// ============================================================================

/// Decides, for each completed group, which [`Element`] variant wraps it.
///
/// This is the single extension point of the parser: it is called once per
/// group, innermost first, after the group's closing delimiter is read.
pub trait Specializer {
    fn specialize(&self, node: Node) -> Element;
}

/// Keeps every group as a generic [`Node`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Generic;

impl Specializer for Generic {
    fn specialize(&self, node: Node) -> Element {
        Element::Node(node)
    }
}

impl<F> Specializer for F
where
    F: Fn(Node) -> Element,
{
    fn specialize(&self, node: Node) -> Element {
        self(node)
    }
}
