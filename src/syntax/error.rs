//! Fatal syntax errors.

use thiserror::Error;

use crate::base::{LineCol, LineIndex, TextSize};

/// What went wrong while reading the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum SyntaxErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected closing delimiter")]
    UnexpectedClose,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("expected a name after '('")]
    MissingName,
    #[error("expected '(' at start of document")]
    ExpectedOpen,
    #[error("unexpected input after the end of the document")]
    TrailingInput,
}

/// A malformed-input error. There is no recovery: the parse is abandoned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind} at {position}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    /// Byte offset of the offending token.
    pub offset: TextSize,
    /// Line/column of the offending token.
    pub position: LineCol,
}

impl SyntaxError {
    pub(crate) fn at(kind: SyntaxErrorKind, text: &str, offset: TextSize) -> Self {
        Self {
            kind,
            offset,
            position: LineIndex::new(text).line_col(offset),
        }
    }

    /// An end-of-input error pointing just past the last byte.
    pub(crate) fn eof(text: &str) -> Self {
        Self::at(SyntaxErrorKind::UnexpectedEof, text, TextSize::of(text))
    }
}
