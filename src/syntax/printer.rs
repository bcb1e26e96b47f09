//! Serializer: the inverse of tokenizer + tree builder.
//!
//! Every token is written as its leading formatting followed by its raw
//! text, so a subtree that was never mutated prints back byte-for-byte.

use std::fmt::{self, Write};

use super::token::Token;
use super::tree::{Element, Node};

/// Append the serialization of `element` to `out`.
pub fn print_element(element: &Element, out: &mut impl Write) -> fmt::Result {
    match element {
        Element::Token(token) => print_token(token, out),
        _ => match element.as_node() {
            Some(node) => print_node(node, out),
            None => Ok(()),
        },
    }
}

pub fn print_node(node: &Node, out: &mut impl Write) -> fmt::Result {
    print_token(node.open(), out)?;
    print_token(node.name_token(), out)?;
    for child in node.children() {
        print_element(child, out)?;
    }
    print_token(node.close(), out)
}

pub fn print_token(token: &Token, out: &mut impl Write) -> fmt::Result {
    out.write_str(token.leading())?;
    out.write_str(token.text())
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        print_token(self, f)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        print_node(self, f)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        print_element(self, f)
    }
}
