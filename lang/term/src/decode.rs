//! Decoders for the literal encodings found on the right-hand side of generated definitions.
//!
//! Generated code wraps nearly every node in one redundant `NoAnnoList(..)` layer, and
//! spells lists either as a short terminal `List([..])` or as a `ListTail([head], tail)` chain.
//! Raw literals and raw list nodes are accepted wherever their wrapped spelling is.

use crate::{
    err::{Result, ShapeError},
    syntax::*,
};
use indexmap::IndexMap;

pub const NO_ANNO: &str = "NoAnnoList";
pub const LIST: &str = "List";
pub const LIST_TAIL: &str = "ListTail";
pub const TUPLE: &str = "Tuple";
pub const STR: &str = "Str";
pub const INT: &str = "Int";

/// Remove one leading and one trailing double quote, each only if present.
pub fn unquote(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}

/// Peel one `NoAnnoList(..)` layer off, if there is one.
pub fn unwrap_no_anno(term: &Term) -> &Term {
    match term.destruct::<1>(NO_ANNO) {
        | Ok([inner]) => inner,
        | Err(_) => term,
    }
}

/// A quoted string literal, unquoted.
pub fn decode_string(term: &Term) -> Result<String> {
    let term = unwrap_no_anno(term);
    let text = match term {
        | Term::Str(text) => text.as_str(),
        | _ => {
            let [text] = term.destruct(STR)?;
            text.as_str()?
        }
    };
    Ok(unquote(text).to_owned())
}

/// A non-negative integer literal, used as an argument position.
pub fn decode_index(term: &Term) -> Result<usize> {
    let term = unwrap_no_anno(term);
    let value = match term {
        | Term::Int(value) => *value,
        | _ => {
            let [digits] = term.destruct(INT)?;
            match digits {
                | Term::Int(value) => *value,
                | _ => {
                    let text = unquote(digits.as_str()?);
                    text.trim()
                        .parse::<i64>()
                        .map_err(|_| ShapeError::new("an integer literal", digits))?
                }
            }
        }
    };
    usize::try_from(value).map_err(|_| ShapeError::new("a non-negative argument index", term))
}

/// A `(name, index)` pair, spelled `Tuple([name, index])` or as a raw two-element list.
pub fn decode_pair(term: &Term) -> Result<(String, usize)> {
    let term = unwrap_no_anno(term);
    let comps = match term {
        | Term::List(_) => term,
        | _ => {
            let [comps] = term.destruct(TUPLE)?;
            comps
        }
    };
    let [name, index] = comps.as_list_exact()?;
    Ok((decode_string(name)?, decode_index(index)?))
}

/// One step of unfolding a cons-or-terminal list.
enum Step<'t> {
    /// A head element and the rest of the chain.
    More(&'t Term, &'t Term),
    /// The chain ends here, with zero or one final element.
    Exhausted(Option<&'t Term>),
}

/// A terminal may only carry zero or one element.
fn terminal<'t>(whole: &Term, elems: &'t Term) -> Result<Step<'t>> {
    match elems.as_list()? {
        | elems if elems.len() <= 1 => Ok(Step::Exhausted(elems.front())),
        | _ => Err(ShapeError::new("a terminal list of at most one element", whole)),
    }
}

fn step(term: &Term) -> Result<Step<'_>> {
    let term = unwrap_no_anno(term);
    match term {
        | Term::List(_) => terminal(term, term),
        | Term::Appl(Appl { cons, args }) if cons == LIST && args.len() == 1 => {
            terminal(term, &args[0])
        }
        | Term::Appl(Appl { cons, args }) if cons == LIST_TAIL && args.len() == 2 => {
            let [head] = args[0].as_list_exact()?;
            Ok(Step::More(head, &args[1]))
        }
        | _ => Err(ShapeError::new("a terminal `List` or a `ListTail` chain", term)),
    }
}

/// Unfold a cons-or-terminal list, decoding every element in order.
pub fn decode_list<T>(term: &Term, mut elem: impl FnMut(&Term) -> Result<T>) -> Result<Vec<T>> {
    let mut out = Vec::new();
    let mut current = term;
    loop {
        match step(current)? {
            | Step::More(head, tail) => {
                out.push(elem(head)?);
                current = tail;
            }
            | Step::Exhausted(last) => {
                if let Some(last) = last {
                    out.push(elem(last)?);
                }
                return Ok(out);
            }
        }
    }
}

/// Decode an association list of `(name, index)` pairs. Later pairs overwrite earlier ones.
pub fn decode_assoc_list(term: &Term) -> Result<IndexMap<String, usize>> {
    Ok(decode_list(term, decode_pair)?.into_iter().collect())
}

/// Decode a list of quoted string literals.
pub fn decode_string_list(term: &Term) -> Result<Vec<String>> {
    decode_list(term, decode_string)
}
