//! A reader for textual ATerms.
//!
//! Open applications and lists are kept on an explicit stack, so nesting depth is bounded by
//! memory rather than by the call stack. Annotations (`t{a_1, ..., a_n}`) are read and
//! dropped; the term model carries none.

use crate::{
    err::ReadError,
    lexer::{Lexer, Tok},
    syntax::*,
};
use std::iter::Peekable;

type Result<T> = std::result::Result<T, ReadError>;

/// Read exactly one term from `source`.
pub fn read_term(source: &str) -> Result<Term> {
    let mut reader = Reader { source, tokens: Lexer::new(source).peekable() };
    let term = reader.term()?;
    match reader.tokens.next() {
        | None => Ok(term),
        | Some((start, tok, end)) => {
            let (line, col) = reader.position(start);
            Err(ReadError::ExtraToken { token: reader.text(tok, start, end), line, col })
        }
    }
}

struct Reader<'s> {
    source: &'s str,
    tokens: Peekable<Lexer<'s>>,
}

impl<'s> Reader<'s> {
    /// 1-indexed line and column of a byte offset.
    fn position(&self, offset: usize) -> (usize, usize) {
        let before = &self.source[..offset];
        let line = before.matches('\n').count() + 1;
        let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
        (line, col)
    }
    fn text(&self, tok: std::result::Result<Tok<'s>, ()>, start: usize, end: usize) -> String {
        match tok {
            | Ok(tok) => tok.to_string(),
            | Err(()) => self.source[start..end].to_owned(),
        }
    }
    fn next(&mut self, expected: &'static str) -> Result<(usize, Tok<'s>, usize)> {
        match self.tokens.next() {
            | None => Err(ReadError::UnrecognizedEof { expected }),
            | Some((start, Err(()), _)) => {
                let (line, col) = self.position(start);
                Err(ReadError::InvalidToken { offset: start, line, col })
            }
            | Some((start, Ok(tok), end)) => Ok((start, tok, end)),
        }
    }
    fn peek_is(&mut self, tok: &Tok<'_>) -> bool {
        matches!(self.tokens.peek(), Some((_, Ok(t), _)) if t == tok)
    }
    fn unexpected(&self, spanned: (usize, Tok<'s>, usize), expected: &'static str) -> ReadError {
        let (start, tok, _) = spanned;
        let (line, col) = self.position(start);
        ReadError::UnrecognizedToken { token: tok.to_string(), expected, line, col }
    }

    fn term(&mut self) -> Result<Term> {
        let mut stack: Vec<Open<'s>> = Vec::new();
        'term: loop {
            let mut term = match self.next("a term")? {
                | (_, Tok::Ident(cons), _) if self.peek_is(&Tok::ParenOpen) => {
                    self.next("`(`")?;
                    stack.push(Open::new(Frame::Appl(cons)));
                    match self.close_empty(&mut stack)? {
                        | Some(term) => term,
                        | None => continue 'term,
                    }
                }
                | (_, Tok::Ident(cons), _) => Term::appl(cons, []),
                | (_, Tok::BracketOpen, _) => {
                    stack.push(Open::new(Frame::List));
                    match self.close_empty(&mut stack)? {
                        | Some(term) => term,
                        | None => continue 'term,
                    }
                }
                | (_, Tok::StrLit(lit), _) => Term::Str(unescape(lit)),
                | (start, Tok::IntLit(text), _) => {
                    let value = text.parse::<i64>().map_err(|_| {
                        let (line, col) = self.position(start);
                        ReadError::IntOutOfRange { text: text.to_owned(), line, col }
                    })?;
                    Term::Int(value)
                }
                | spanned => Err(self.unexpected(spanned, "a term"))?,
            };
            // `term` is complete; hand it to the innermost open node, closing as many as the
            // input closes
            loop {
                if self.peek_is(&Tok::BraceOpen) {
                    self.next("`{`")?;
                    stack.push(Open::new(Frame::Annotated(term)));
                    match self.close_empty(&mut stack)? {
                        | Some(annotated) => {
                            term = annotated;
                            continue;
                        }
                        | None => continue 'term,
                    }
                }
                let Some(mut open) = stack.pop() else { return Ok(term) };
                open.items.push(term);
                match self.next(open.expected())? {
                    | (_, Tok::Comma, _) => {
                        stack.push(open);
                        continue 'term;
                    }
                    | (_, tok, _) if tok == open.close() => term = open.finish(),
                    | spanned => return Err(self.unexpected(spanned, open.expected()).into()),
                }
            }
        }
    }

    /// Close the innermost node right away if its closing token follows.
    fn close_empty(&mut self, stack: &mut Vec<Open<'s>>) -> Result<Option<Term>> {
        let Some(open) = stack.last() else { return Ok(None) };
        if !self.peek_is(&open.close()) {
            return Ok(None);
        }
        self.next(open.expected())?;
        Ok(stack.pop().map(Open::finish))
    }
}

/// A node whose closing token has not been read yet.
struct Open<'s> {
    frame: Frame<'s>,
    items: Vec<Term>,
}

enum Frame<'s> {
    Appl(&'s str),
    List,
    /// annotations of an already complete term; they are discarded
    Annotated(Term),
}

impl<'s> Open<'s> {
    fn new(frame: Frame<'s>) -> Self {
        Self { frame, items: Vec::new() }
    }
    fn close(&self) -> Tok<'static> {
        match self.frame {
            | Frame::Appl(_) => Tok::ParenClose,
            | Frame::List => Tok::BracketClose,
            | Frame::Annotated(_) => Tok::BraceClose,
        }
    }
    fn expected(&self) -> &'static str {
        match self.frame {
            | Frame::Appl(_) => "`,` or `)`",
            | Frame::List => "`,` or `]`",
            | Frame::Annotated(_) => "`,` or `}`",
        }
    }
    fn finish(self) -> Term {
        match self.frame {
            | Frame::Appl(cons) => Term::appl(cons, self.items),
            | Frame::List => Term::list(self.items),
            | Frame::Annotated(term) => term,
        }
    }
}

/// Drop the surrounding quotes of a string literal and resolve its escapes.
fn unescape(lit: &str) -> String {
    let inner = &lit[1..lit.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            | Some('n') => out.push('\n'),
            | Some('t') => out.push('\t'),
            | Some('r') => out.push('\r'),
            | Some(other) => out.push(other),
            | None => out.push('\\'),
        }
    }
    out
}
