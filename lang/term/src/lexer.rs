use logos::{Logos, SpannedIter};
use std::fmt::Display;

#[derive(Logos, Clone, Debug, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
#[logos(skip r"%%[^\n]*")]
pub enum Tok<'input> {
    #[regex(r"[A-Za-z_][A-Za-z0-9_'\-]*")]
    Ident(&'input str),
    #[regex(r"-?[0-9]+")]
    IntLit(&'input str),
    #[regex(r#""[^"\\]*(?:\\.[^"\\]*)*""#)]
    StrLit(&'input str),

    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token(",")]
    Comma,
}

impl Display for Tok<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            | Tok::Ident(s) => write!(f, "{s}"),
            | Tok::IntLit(s) => write!(f, "{s}"),
            | Tok::StrLit(s) => write!(f, "{s}"),
            | Tok::ParenOpen => write!(f, "("),
            | Tok::ParenClose => write!(f, ")"),
            | Tok::BracketOpen => write!(f, "["),
            | Tok::BracketClose => write!(f, "]"),
            | Tok::BraceOpen => write!(f, "{{"),
            | Tok::BraceClose => write!(f, "}}"),
            | Tok::Comma => write!(f, ","),
        }
    }
}

pub struct Lexer<'source> {
    inner: SpannedIter<'source, Tok<'source>>,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Self { inner: Tok::lexer(source).spanned() }
    }
}

/// Byte offset and lexing outcome of a token; `Err(())` marks an invalid token.
pub type Spanned<'source> = (usize, Result<Tok<'source>, ()>, usize);

impl<'source> Iterator for Lexer<'source> {
    type Item = Spanned<'source>;

    fn next(&mut self) -> Option<Self::Item> {
        let (tok, span) = self.inner.next()?;
        Some((span.start, tok, span.end))
    }
}
