use basil_term::{List, Result, Term};
use im::Vector;
use std::fmt;

/// The two kinds of generated module, which encode their imports differently.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum ModuleKind {
    /// `module(header, [imports(..), ...], [section, ...])`
    Grammar,
    /// `Module(header, [Imports([..]), decl, ...])`
    Transformation,
}

impl ModuleKind {
    /// The start symbol used when parsing a module of this kind.
    pub fn start_symbol(&self) -> &'static str {
        match self {
            | ModuleKind::Grammar => "Sdf2Module",
            | ModuleKind::Transformation => "StrategoModule",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            | ModuleKind::Grammar => write!(f, "grammar"),
            | ModuleKind::Transformation => write!(f, "transformation"),
        }
    }
}

pub const IMPORTS: &str = "Imports";

/// `Imports([Import(target)])`
pub fn transformation_import(target: &str) -> Term {
    Term::appl(IMPORTS, [Term::list([Term::appl("Import", [Term::str(target)])])])
}

/// `imports(module(unparameterized(target)))`
pub fn grammar_import(target: &str) -> Term {
    let module = Term::appl("module", [Term::appl("unparameterized", [Term::str(target)])]);
    Term::appl("imports", [module])
}

/// Replace every import of `module` by the single canonical import of `target`.
pub fn rewrite_imports(module: &Term, kind: ModuleKind, target: &str) -> Result<Term> {
    match kind {
        | ModuleKind::Grammar => rewrite_grammar_imports(module, target),
        | ModuleKind::Transformation => rewrite_transformation_imports(module, target),
    }
}

/// Drop every `Imports(..)` declaration and put the canonical one first; the remaining
/// declarations keep their relative order.
pub fn rewrite_transformation_imports(module: &Term, target: &str) -> Result<Term> {
    let (cons, [header, decls]) = module.destruct_any()?;
    let mut kept: Vector<Term> =
        decls.as_list()?.iter().filter(|decl| !decl.is_appl(IMPORTS)).cloned().collect();
    kept.push_front(transformation_import(target));
    Ok(Term::appl(cons, [header.clone(), List(kept).into()]))
}

/// Replace the import clause of a grammar module by the canonical one.
pub fn rewrite_grammar_imports(module: &Term, target: &str) -> Result<Term> {
    let (cons, [header, imports, body]) = module.destruct_any()?;
    imports.as_list()?;
    Ok(Term::appl(cons, [header.clone(), Term::list([grammar_import(target)]), body.clone()]))
}
