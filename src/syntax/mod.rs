//! Lossless s-expression syntax: tokens, tree, parser, printer.
//!
//! ```text
//! text ──tokenize──▶ tokens ──parse (+ Specializer)──▶ Element tree ──print──▶ text
//! ```
//!
//! Whitespace is attached to the token that follows it, so printing an
//! unmodified tree reproduces the input byte-for-byte.

pub mod document;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod token;
pub mod tree;

pub use document::Document;
pub use error::{SyntaxError, SyntaxErrorKind};
pub use lexer::{Lexed, Lexeme, tokenize};
pub use parser::{Parse, parse};
pub use token::{Token, TokenKind, Value, quote, unquote};
pub use tree::{Element, Generic, Node, Specializer};
