use basil_term::{List, Result, Term};

/// How the production connecting a language to the common toplevel nonterminal is named.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Augmentation<'a> {
    /// Separates the language name from its toplevel nonterminal in the ground sort.
    pub marker: &'a str,
    /// The toolchain's common nonterminal for toplevel declarations.
    pub toplevel_sort: &'a str,
}

impl Augmentation<'static> {
    pub const STANDARD: Self = Augmentation { marker: "Gnd", toplevel_sort: "ToplevelDeclaration" };
}

impl Default for Augmentation<'static> {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl Augmentation<'_> {
    /// `<language><marker><toplevel>`
    pub fn ground_sort(&self, language: &str, toplevel: &str) -> String {
        format!("{language}{}{toplevel}", self.marker)
    }

    /// `exports(context-free-syntax([prod([sort(ground)], sort(toplevel_sort), no-attrs)]))`
    pub fn production(&self, language: &str, toplevel: &str) -> Term {
        let sort = |name: String| Term::appl("sort", [Term::str(name)]);
        let prod = Term::appl(
            "prod",
            [
                Term::list([sort(self.ground_sort(language, toplevel))]),
                sort(self.toplevel_sort.to_owned()),
                Term::appl("no-attrs", []),
            ],
        );
        Term::appl("exports", [Term::appl("context-free-syntax", [Term::list([prod])])])
    }

    /// Append the toplevel production to the end of the grammar module's body.
    pub fn append(&self, module: &Term, language: &str, toplevel: &str) -> Result<Term> {
        let (cons, [header, imports, body]) = module.destruct_any()?;
        let mut body = body.as_list()?.clone();
        body.push_back(self.production(language, toplevel));
        Ok(Term::appl(cons, [header.clone(), imports.clone(), List(body).into()]))
    }
}

/// [`Augmentation::append`] with the standard marker and toplevel sort.
pub fn append_toplevel_production(module: &Term, language: &str, toplevel: &str) -> Result<Term> {
    Augmentation::STANDARD.append(module, language, toplevel)
}
