use crate::err::{Result, ShapeError};
use derive_more::From;
use im::Vector;

/* ---------------------------------- Term ---------------------------------- */

/// An immutable tagged tree node; equality is structural and children are positional.
///
/// Cloning is cheap: children live in persistent vectors, so rebuilt trees share every
/// subtree they did not touch with the tree they were built from.
#[derive(From, Clone, Debug, Hash, PartialEq, Eq)]
pub enum Term {
    Appl(Appl),
    List(List),
    Str(String),
    Int(i64),
}

/// `Cons(t_1, ..., t_n)`
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Appl {
    pub cons: String,
    pub args: Vector<Term>,
}

/// `[t_1, ..., t_n]`
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct List(pub Vector<Term>);

/* ------------------------------ Construction ------------------------------ */

impl Term {
    pub fn appl(cons: impl Into<String>, args: impl IntoIterator<Item = Term>) -> Self {
        Appl { cons: cons.into(), args: args.into_iter().collect() }.into()
    }
    pub fn list(elems: impl IntoIterator<Item = Term>) -> Self {
        List(elems.into_iter().collect()).into()
    }
    pub fn str(text: impl Into<String>) -> Self {
        Term::Str(text.into())
    }
    pub fn int(value: i64) -> Self {
        Term::Int(value)
    }
}

/* -------------------------------- Accessors ------------------------------- */

impl Term {
    /// The constructor name, if this is an application.
    pub fn cons_name(&self) -> Option<&str> {
        match self {
            | Term::Appl(Appl { cons, .. }) => Some(cons.as_str()),
            | _ => None,
        }
    }
    pub fn is_appl(&self, cons: &str) -> bool {
        self.cons_name() == Some(cons)
    }
    /// The `i`-th child of an application or the `i`-th element of a list.
    pub fn nth(&self, i: usize) -> Result<&Term> {
        let children = match self {
            | Term::Appl(Appl { args, .. }) => args,
            | Term::List(List(elems)) => elems,
            | _ => return Err(ShapeError::new("an application or a list", self)),
        };
        children.get(i).ok_or_else(|| ShapeError::new(format!("at least {} children", i + 1), self))
    }
    /// The arguments of an application of `cons`.
    pub fn appl_args(&self, cons: &str) -> Result<&Vector<Term>> {
        match self {
            | Term::Appl(Appl { cons: c, args }) if c == cons => Ok(args),
            | _ => Err(ShapeError::new(format!("an application of `{cons}`"), self)),
        }
    }
    /// Match an application of `cons` with exactly `N` arguments.
    pub fn destruct<const N: usize>(&self, cons: &str) -> Result<[&Term; N]> {
        let args = self.appl_args(cons)?;
        if args.len() != N {
            Err(ShapeError::new(format!("an application of `{cons}` with {N} arguments"), self))?
        }
        Ok(std::array::from_fn(|i| &args[i]))
    }
    /// Match an application of any constructor with exactly `N` arguments.
    pub fn destruct_any<const N: usize>(&self) -> Result<(&str, [&Term; N])> {
        match self {
            | Term::Appl(Appl { cons, args }) if args.len() == N => {
                Ok((cons.as_str(), std::array::from_fn(|i| &args[i])))
            }
            | _ => Err(ShapeError::new(format!("an application with {N} arguments"), self)),
        }
    }
    pub fn as_list(&self) -> Result<&Vector<Term>> {
        match self {
            | Term::List(List(elems)) => Ok(elems),
            | _ => Err(ShapeError::new("a list", self)),
        }
    }
    /// Match a list of exactly `N` elements.
    pub fn as_list_exact<const N: usize>(&self) -> Result<[&Term; N]> {
        let elems = self.as_list()?;
        if elems.len() != N {
            Err(ShapeError::new(format!("a list of {N} elements"), self))?
        }
        Ok(std::array::from_fn(|i| &elems[i]))
    }
    pub fn as_str(&self) -> Result<&str> {
        match self {
            | Term::Str(text) => Ok(text.as_str()),
            | _ => Err(ShapeError::new("a string literal", self)),
        }
    }
    pub fn as_int(&self) -> Result<i64> {
        match self {
            | Term::Int(value) => Ok(*value),
            | _ => Err(ShapeError::new("an integer literal", self)),
        }
    }
}
