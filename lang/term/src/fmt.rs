//! Textual ATerm output: compact via `Display`, width-bounded via [`Term::pretty`].

use crate::syntax::*;
use pretty::RcDoc;
use std::fmt;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            | '"' => out.push_str("\\\""),
            | '\\' => out.push_str("\\\\"),
            | '\n' => out.push_str("\\n"),
            | '\t' => out.push_str("\\t"),
            | '\r' => out.push_str("\\r"),
            | c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn children(f: &mut fmt::Formatter<'_>, terms: &im::Vector<Term>) -> fmt::Result {
            for (i, term) in terms.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{term}")?;
            }
            Ok(())
        }
        match self {
            | Term::Appl(Appl { cons, args }) if args.is_empty() => write!(f, "{cons}"),
            | Term::Appl(Appl { cons, args }) => {
                write!(f, "{cons}(")?;
                children(f, args)?;
                write!(f, ")")
            }
            | Term::List(List(elems)) => {
                write!(f, "[")?;
                children(f, elems)?;
                write!(f, "]")
            }
            | Term::Str(text) => write!(f, "{}", escape(text)),
            | Term::Int(value) => write!(f, "{value}"),
        }
    }
}

impl Term {
    pub fn to_doc(&self) -> RcDoc<'_> {
        fn group<'a>(open: &'a str, items: &'a im::Vector<Term>, close: &'a str) -> RcDoc<'a> {
            let sep = RcDoc::text(",").append(RcDoc::line_());
            RcDoc::text(open)
                .append(RcDoc::line_().append(RcDoc::intersperse(items.iter().map(Term::to_doc), sep)).nest(2))
                .append(RcDoc::line_())
                .append(RcDoc::text(close))
                .group()
        }
        match self {
            | Term::Appl(Appl { cons, args }) if args.is_empty() => RcDoc::text(cons.as_str()),
            | Term::Appl(Appl { cons, args }) => {
                RcDoc::text(cons.as_str()).append(group("(", args, ")"))
            }
            | Term::List(List(elems)) if elems.is_empty() => RcDoc::text("[]"),
            | Term::List(List(elems)) => group("[", elems, "]"),
            | Term::Str(text) => RcDoc::text(escape(text)),
            | Term::Int(value) => RcDoc::as_string(value),
        }
    }
    /// Render with line breaks so that lines stay within `width` where possible.
    pub fn pretty(&self, width: usize) -> String {
        format!("{}", self.to_doc().pretty(width))
    }
}
