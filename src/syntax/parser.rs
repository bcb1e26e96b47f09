//! Tree builder: tokens → [`Element`] tree.
//!
//! Groups are built with an explicit stack so nesting depth is bounded by
//! memory rather than by the call stack.

use std::vec;

use super::error::{SyntaxError, SyntaxErrorKind};
use super::lexer::{Lexeme, tokenize};
use super::token::{Token, TokenKind};
use super::tree::{Element, Node, Specializer};
use smol_str::SmolStr;

/// Result of parsing a whole document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parse {
    /// The single top-level group.
    pub root: Element,
    /// Whitespace after the root group's closing delimiter.
    pub trailing: SmolStr,
}

/// Parse `text` as one top-level parenthesized expression.
pub fn parse(text: &str, specializer: &impl Specializer) -> Result<Parse, SyntaxError> {
    let lexed = tokenize(text)?;
    let mut builder = TreeBuilder {
        text,
        lexemes: lexed.lexemes.into_iter(),
        specializer,
    };

    let first = builder.next()?;
    match first.token.kind() {
        TokenKind::LParen => {}
        TokenKind::RParen => return Err(builder.error(SyntaxErrorKind::UnexpectedClose, &first)),
        _ => return Err(builder.error(SyntaxErrorKind::ExpectedOpen, &first)),
    }

    let root = builder.group(first)?;

    if let Some(extra) = builder.lexemes.next() {
        let kind = if extra.token.kind() == TokenKind::RParen {
            SyntaxErrorKind::UnexpectedClose
        } else {
            SyntaxErrorKind::TrailingInput
        };
        return Err(builder.error(kind, &extra));
    }

    Ok(Parse {
        root,
        trailing: lexed.trailing,
    })
}

/// A group whose closing delimiter has not been read yet.
struct OpenGroup {
    open: Token,
    name: Token,
    children: Vec<Element>,
}

struct TreeBuilder<'a, S> {
    text: &'a str,
    lexemes: vec::IntoIter<Lexeme>,
    specializer: &'a S,
}

impl<S: Specializer> TreeBuilder<'_, S> {
    fn next(&mut self) -> Result<Lexeme, SyntaxError> {
        self.lexemes.next().ok_or_else(|| SyntaxError::eof(self.text))
    }

    fn error(&self, kind: SyntaxErrorKind, at: &Lexeme) -> SyntaxError {
        SyntaxError::at(kind, self.text, at.range.start())
    }

    /// Start a group after its `(`: the next token is the group name.
    fn open(&mut self, open: Lexeme) -> Result<OpenGroup, SyntaxError> {
        let name = self.next()?;
        if name.token.kind().is_delimiter() {
            return Err(self.error(SyntaxErrorKind::MissingName, &name));
        }
        Ok(OpenGroup {
            open: open.token,
            name: name.token,
            children: Vec::new(),
        })
    }

    /// Read a complete group starting at `open`, including every nested one.
    fn group(&mut self, open: Lexeme) -> Result<Element, SyntaxError> {
        let mut parents: Vec<OpenGroup> = Vec::new();
        let mut current = self.open(open)?;

        loop {
            let lexeme = self.next()?;
            match lexeme.token.kind() {
                TokenKind::LParen => {
                    let child = self.open(lexeme)?;
                    parents.push(std::mem::replace(&mut current, child));
                }
                TokenKind::RParen => {
                    let node =
                        Node::from_parts(current.open, current.name, current.children, lexeme.token);
                    let element = self.specializer.specialize(node);
                    match parents.pop() {
                        Some(parent) => {
                            current = parent;
                            current.children.push(element);
                        }
                        None => return Ok(element),
                    }
                }
                _ => current.children.push(Element::Token(lexeme.token)),
            }
        }
    }
}
