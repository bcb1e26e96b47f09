//! Tokenizer: text → tokens carrying their leading whitespace.
//!
//! Whitespace is never a token of its own. It accumulates and is attached
//! to the next token as leading formatting; whatever follows the last token
//! is returned as trailing text. Concatenating every token's leading text
//! and raw text, then the trailing text, reproduces the input exactly.

use logos::Logos;
use smol_str::SmolStr;

use super::error::{SyntaxError, SyntaxErrorKind};
use super::token::{Token, TokenKind};
use crate::base::{TextRange, TextSize};

/// Raw lexical classes recognised by the scanner.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    // Backslash escapes any character, including a quote or a newline.
    #[regex(r#""([^"\\]|\\(.|\n))*""#)]
    String,

    #[regex(r#"[^\s()"]+"#)]
    Atom,

    #[regex(r"\s+")]
    Whitespace,
}

impl RawToken {
    fn kind(self) -> Option<TokenKind> {
        match self {
            RawToken::LParen => Some(TokenKind::LParen),
            RawToken::RParen => Some(TokenKind::RParen),
            RawToken::String => Some(TokenKind::String),
            RawToken::Atom => Some(TokenKind::Atom),
            RawToken::Whitespace => None,
        }
    }
}

/// A token together with where its text starts in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Token,
    /// Range of the token text, leading whitespace excluded.
    pub range: TextRange,
}

/// Output of [`tokenize`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lexed {
    pub lexemes: Vec<Lexeme>,
    /// Whitespace after the final token.
    pub trailing: SmolStr,
}

/// Split `text` into tokens.
///
/// The only lexical failure is a double quote with no closing quote.
pub fn tokenize(text: &str) -> Result<Lexed, SyntaxError> {
    let mut lexer = RawToken::lexer(text);
    let mut lexemes = Vec::new();
    let mut leading_start: Option<usize> = None;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let raw = result.map_err(|()| {
            SyntaxError::at(
                SyntaxErrorKind::UnterminatedString,
                text,
                TextSize::from(span.start as u32),
            )
        })?;

        let Some(kind) = raw.kind() else {
            leading_start.get_or_insert(span.start);
            continue;
        };

        let leading = match leading_start.take() {
            Some(start) => SmolStr::new(&text[start..span.start]),
            None => SmolStr::default(),
        };
        lexemes.push(Lexeme {
            token: Token::with_kind(kind, lexer.slice(), leading),
            range: TextRange::new(
                TextSize::from(span.start as u32),
                TextSize::from(span.end as u32),
            ),
        });
    }

    let trailing = leading_start
        .map(|start| SmolStr::new(&text[start..]))
        .unwrap_or_default();

    Ok(Lexed { lexemes, trailing })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lexed: &Lexed) -> Vec<(&str, &str)> {
        lexed
            .lexemes
            .iter()
            .map(|l| (l.token.leading(), l.token.text()))
            .collect()
    }

    #[test]
    fn test_parens_are_standalone() {
        let lexed = tokenize("(a(b)c)").unwrap();
        assert_eq!(
            texts(&lexed),
            vec![("", "("), ("", "a"), ("", "("), ("", "b"), ("", ")"), ("", "c"), ("", ")")]
        );
    }

    #[test]
    fn test_leading_whitespace_attaches_to_next_token() {
        let lexed = tokenize("(at 1.27\n\t  2.54 )\n").unwrap();
        assert_eq!(
            texts(&lexed),
            vec![("", "("), ("", "at"), (" ", "1.27"), ("\n\t  ", "2.54"), (" ", ")")]
        );
        assert_eq!(lexed.trailing, "\n");
    }

    #[test]
    fn test_string_is_one_token() {
        let lexed = tokenize(r#"(p "a (b) \"c\"")"#).unwrap();
        let string = &lexed.lexemes[2].token;
        assert_eq!(string.kind(), TokenKind::String);
        assert_eq!(string.text(), r#""a (b) \"c\"""#);
        assert_eq!(string.leading(), " ");
    }

    #[test]
    fn test_atoms_are_classified() {
        let lexed = tokenize("(x 1 -2.5 yes)").unwrap();
        let kinds: Vec<_> = lexed.lexemes.iter().map(|l| l.token.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::LParen,
                TokenKind::Atom,
                TokenKind::Int,
                TokenKind::Float,
                TokenKind::Atom,
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_ranges_exclude_leading() {
        let lexed = tokenize("  (ab)").unwrap();
        assert_eq!(lexed.lexemes[0].range, TextRange::new(2.into(), 3.into()));
        assert_eq!(lexed.lexemes[1].range, TextRange::new(3.into(), 5.into()));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("(p\n  \"open").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnterminatedString);
        assert_eq!(err.position.line_one_indexed(), 2);
        assert_eq!(err.position.col_one_indexed(), 3);
    }

    #[test]
    fn test_empty_input() {
        let lexed = tokenize("").unwrap();
        assert!(lexed.lexemes.is_empty());
        assert_eq!(lexed.trailing, "");
    }
}
