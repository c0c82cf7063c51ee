//! The external collaborators the orchestrator drives. Implementations report their own
//! failures as [`ProcessError::External`](crate::ProcessError::External).

use crate::err::Result;
use auto_impl::auto_impl;
use basil_rewrite::ModuleKind;
use basil_term::Term;
use std::path::{Path, PathBuf};

/// What a generator run left behind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Generated {
    pub grammar: PathBuf,
    pub transformation: PathBuf,
    /// validation messages about the definition; processing stops if there are any
    pub errors: Vec<String>,
}

#[auto_impl(&mut, Box)]
pub trait Generator {
    /// Turn `definition` into raw grammar and transformation modules under `out`.
    fn generate(&mut self, definition: &Path, language: &str, out: &Path) -> Result<Generated>;
}

#[auto_impl(&mut, Box)]
pub trait TermParser {
    fn parse(&mut self, table: &str, file: &Path, start_symbol: &str) -> Result<Term>;
}

#[auto_impl(&mut, Box)]
pub trait TermPrinter {
    fn pretty_print(&mut self, kind: ModuleKind, module: &Term) -> Result<String>;
    /// Bring a grammar into the form the pretty-print table generator expects.
    fn normalize_grammar(&mut self, grammar: Term) -> Result<Term> {
        Ok(grammar)
    }
    fn derive_pp_table(&mut self, grammar: &Term) -> Result<String>;
}
