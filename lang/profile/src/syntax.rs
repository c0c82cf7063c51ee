use crate::err::{ExtractError, Result};
use basil_term::Term;
use indexmap::{IndexMap, IndexSet};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/* -------------------------------- Namespace ------------------------------- */

/// How module names map onto namespaces in the base language.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum NamespaceKind {
    Flat,
    Nested(char),
    Prefixed(char),
}

impl NamespaceKind {
    pub fn separator(&self) -> Option<char> {
        match self {
            | NamespaceKind::Flat => None,
            | NamespaceKind::Nested(sep) | NamespaceKind::Prefixed(sep) => Some(*sep),
        }
    }
}

impl fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            | NamespaceKind::Flat => write!(f, "flat"),
            | NamespaceKind::Nested(sep) => write!(f, "nested `{sep}`"),
            | NamespaceKind::Prefixed(sep) => write!(f, "prefixed `{sep}`"),
        }
    }
}

/// Where the namespace identifier sits inside a namespace declaration.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub cons: String,
    pub index: usize,
}

/* ------------------------------ Declarations ------------------------------ */

/// Everything the extractor can read off a transformation module. Fields stay unset until
/// their definition is seen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Declarations {
    pub extension_file_suffix: Option<String>,
    pub base_file_suffix: Option<String>,
    pub toplevel_nonterminal: Option<String>,
    pub namespace_declaration: Option<NamespaceDecl>,
    pub namespace_kind: Option<NamespaceKind>,
    pub namespace_suffixes: IndexMap<String, usize>,
    pub imports: IndexMap<String, usize>,
    pub body_declarations: IndexSet<String>,
}

impl Declarations {
    /// Assemble the profile; file suffixes and the namespace kind must have been declared.
    pub fn complete(self, language: impl Into<String>, artifacts: ArtifactPaths) -> Result<LanguageProfile> {
        use crate::extract::names::*;
        let Declarations {
            extension_file_suffix,
            base_file_suffix,
            toplevel_nonterminal,
            namespace_declaration,
            namespace_kind,
            namespace_suffixes,
            imports,
            body_declarations,
        } = self;
        let extension_file_suffix = extension_file_suffix.ok_or(ExtractError::Missing {
            definition: EXTENSIBLE_FILE_EXT,
            field: "extensionFileSuffix",
        })?;
        let base_file_suffix = base_file_suffix
            .ok_or(ExtractError::Missing { definition: BASE_FILE_EXT, field: "baseFileSuffix" })?;
        let namespace_kind = namespace_kind
            .ok_or(ExtractError::Missing { definition: NAMESPACE_KIND, field: "namespaceKind" })?;
        Ok(LanguageProfile {
            language: language.into(),
            extension_file_suffix,
            base_file_suffix,
            toplevel_nonterminal,
            namespace_declaration,
            namespace_kind,
            namespace_suffixes,
            imports,
            body_declarations,
            artifacts,
        })
    }
}

/* -------------------------------- Artifacts ------------------------------- */

/// The five files derived from one language definition.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub grammar: PathBuf,
    pub transformation: PathBuf,
    pub editor_services: PathBuf,
    pub packaged_grammar: PathBuf,
    pub pp_table: PathBuf,
}

impl ArtifactPaths {
    pub const GRAMMAR_EXT: &'static str = "sdf";
    pub const TRANSFORMATION_EXT: &'static str = "str";
    pub const EDITOR_SERVICES_EXT: &'static str = "serv";
    pub const PACKAGED_GRAMMAR_EXT: &'static str = "def";
    pub const PP_TABLE_EXT: &'static str = "pp";

    pub fn new(dir: impl AsRef<Path>, language: &str) -> Self {
        let dir = dir.as_ref();
        let file = |ext: &str| dir.join(format!("{language}.{ext}"));
        Self {
            grammar: file(Self::GRAMMAR_EXT),
            transformation: file(Self::TRANSFORMATION_EXT),
            editor_services: file(Self::EDITOR_SERVICES_EXT),
            packaged_grammar: file(Self::PACKAGED_GRAMMAR_EXT),
            pp_table: file(Self::PP_TABLE_EXT),
        }
    }
    pub fn all(&self) -> [&Path; 5] {
        [
            &self.grammar,
            &self.transformation,
            &self.editor_services,
            &self.packaged_grammar,
            &self.pp_table,
        ]
    }
}

/* --------------------------------- Profile -------------------------------- */

/// The assembled description of a base language, handed to the rest of the toolchain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageProfile {
    pub language: String,
    /// File extension of sources in the extensible language, without a dot.
    pub extension_file_suffix: String,
    /// File extension of sources in the base language, without a dot.
    pub base_file_suffix: String,
    pub toplevel_nonterminal: Option<String>,
    pub namespace_declaration: Option<NamespaceDecl>,
    pub namespace_kind: NamespaceKind,
    pub namespace_suffixes: IndexMap<String, usize>,
    pub imports: IndexMap<String, usize>,
    pub body_declarations: IndexSet<String>,
    pub artifacts: ArtifactPaths,
}

impl LanguageProfile {
    pub fn is_namespace_decl(&self, decl: &Term) -> bool {
        match (&self.namespace_declaration, decl.cons_name()) {
            | (Some(NamespaceDecl { cons, .. }), Some(name)) => cons == name,
            | _ => false,
        }
    }
    /// The argument position holding the imported module name, if `decl` is an import.
    pub fn import_index(&self, decl: &Term) -> Option<usize> {
        decl.cons_name().and_then(|name| self.imports.get(name).copied())
    }
    pub fn is_body_decl(&self, decl: &Term) -> bool {
        decl.cons_name().is_some_and(|name| self.body_declarations.contains(name))
    }
}

impl fmt::Display for LanguageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn table(map: &IndexMap<String, usize>) -> String {
            let entries = map.iter().map(|(cons, i)| format!("{cons}#{i}")).collect::<Vec<_>>();
            format!("[{}]", entries.join(", "))
        }
        writeln!(f, "language: {}", self.language)?;
        writeln!(f, "extension file suffix: {}", self.extension_file_suffix)?;
        writeln!(f, "base file suffix: {}", self.base_file_suffix)?;
        if let Some(toplevel) = &self.toplevel_nonterminal {
            writeln!(f, "toplevel nonterminal: {toplevel}")?;
        }
        if let Some(NamespaceDecl { cons, index }) = &self.namespace_declaration {
            writeln!(f, "namespace declaration: {cons}#{index}")?;
        }
        writeln!(f, "namespace kind: {}", self.namespace_kind)?;
        writeln!(f, "namespace suffixes: {}", table(&self.namespace_suffixes))?;
        writeln!(f, "imports: {}", table(&self.imports))?;
        let body = self.body_declarations.iter().cloned().collect::<Vec<_>>();
        writeln!(f, "body declarations: [{}]", body.join(", "))?;
        for path in self.artifacts.all() {
            writeln!(f, "artifact: {}", path.display())?;
        }
        Ok(())
    }
}
