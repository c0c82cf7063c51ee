use crate::{
    err::{Context, Result},
    services::{TermParser, TermPrinter},
};
use basil_rewrite::ModuleKind;
use basil_term::{Appl, List, Term, escape, read_term, unquote};
use im::Vector;
use indexmap::IndexMap;
use std::path::Path;

/// Parser and printer for modules stored as textual ATerms. Parse tables are not needed to read
/// that format and are ignored.
#[derive(Clone, Copy, Debug)]
pub struct AtermServices {
    pub width: usize,
}

impl Default for AtermServices {
    fn default() -> Self {
        Self { width: 100 }
    }
}

impl TermParser for AtermServices {
    fn parse(&mut self, table: &str, file: &Path, start_symbol: &str) -> Result<Term> {
        log::debug!("parsing `{}` as {start_symbol} (table {table})", file.display());
        let source = std::fs::read_to_string(file)
            .context(|| format!("read `{}`", file.display()))?;
        read_term(&source).context(|| format!("parse `{}` as {start_symbol}", file.display()))
    }
}

impl TermPrinter for AtermServices {
    fn pretty_print(&mut self, kind: ModuleKind, module: &Term) -> Result<String> {
        log::debug!("printing the {kind} module at width {}", self.width);
        let mut text = module.pretty(self.width);
        text.push('\n');
        Ok(text)
    }
    fn derive_pp_table(&mut self, grammar: &Term) -> Result<String> {
        let mut entries = IndexMap::new();
        for (cons, symbols) in productions(grammar) {
            entries.entry(cons).or_insert_with(|| layout(symbols));
        }
        let mut table = String::from("[\n");
        let last = entries.len().saturating_sub(1);
        for (i, (cons, layout)) in entries.iter().enumerate() {
            table.push_str(&format!("   {cons} -- H[{layout}]"));
            table.push_str(if i < last { ",\n" } else { "\n" });
        }
        table.push_str("]\n");
        Ok(table)
    }
}

/// Every `prod(symbols, result, attrs)` carrying a `cons("C")` attribute, in pre-order.
fn productions(grammar: &Term) -> Vec<(&str, &Vector<Term>)> {
    let mut found = Vec::new();
    let mut stack = vec![grammar];
    while let Some(term) = stack.pop() {
        if let Ok([symbols, _, attrs]) = term.destruct("prod") {
            if let (Ok(symbols), Some(cons)) = (symbols.as_list(), constructor(attrs)) {
                found.push((cons, symbols));
            }
        }
        match term {
            | Term::Appl(Appl { args, .. }) | Term::List(List(args)) => {
                stack.extend(args.iter().rev())
            }
            | Term::Str(_) | Term::Int(_) => {}
        }
    }
    found
}

/// The name in the first `cons(..)` attribute below `attrs`.
fn constructor(attrs: &Term) -> Option<&str> {
    let mut stack = vec![attrs];
    while let Some(term) = stack.pop() {
        match term {
            | Term::Appl(Appl { cons, args }) if cons == "cons" && args.len() == 1 => {
                if let Term::Str(name) = &args[0] {
                    return Some(unquote(name));
                }
            }
            | Term::Appl(Appl { args, .. }) | Term::List(List(args)) => {
                stack.extend(args.iter().rev())
            }
            | Term::Str(_) | Term::Int(_) => {}
        }
    }
    None
}

/// Literals become keywords; every other symbol is the next numbered argument.
fn layout(symbols: &Vector<Term>) -> String {
    let mut next = 0;
    let items = symbols
        .iter()
        .map(|symbol| match symbol.destruct::<1>("lit").ok().and_then(|[lit]| lit.as_str().ok()) {
            | Some(lit) => format!("KW[{}]", escape(unquote(lit))),
            | None => {
                next += 1;
                format!("_{next}")
            }
        })
        .collect::<Vec<_>>();
    items.join(" ")
}
