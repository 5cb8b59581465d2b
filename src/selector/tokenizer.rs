//! logos-based selector tokenizer.
//!
//! Whitespace is skipped, so the parser relies on token spans to tell
//! `button.primary` (one token chain) from `button .primary` (two nodes).

use std::ops::Range;

use logos::Logos;

/// Selector token produced by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    /// Type, class or id name. Digits are allowed anywhere so `#1` is a valid id.
    #[regex(r"[a-zA-Z0-9_][a-zA-Z0-9_-]*")]
    Ident,

    /// `.`
    #[token(".")]
    Dot,

    /// `#`
    #[token("#")]
    Hash,

    /// `>`
    #[token(">")]
    GreaterThan,

    /// `,`
    #[token(",")]
    Comma,
}

/// A token with its source text and byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<'a> {
    pub token: Token,
    pub text: &'a str,
    pub span: Range<usize>,
}

/// Tokenize a selector string.
///
/// Returns the byte offset of the first character the lexer rejects.
pub fn tokenize(input: &str) -> Result<Vec<Spanned<'_>>, usize> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(input).spanned() {
        match result {
            Ok(token) => tokens.push(Spanned {
                token,
                text: &input[span.clone()],
                span,
            }),
            Err(()) => return Err(span.start),
        }
    }
    Ok(tokens)
}
