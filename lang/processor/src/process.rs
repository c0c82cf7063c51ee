use crate::err::{ProcessorError, Result};
use basil_profile::{LanguageProfile, NamespaceDecl, NamespaceKind};
use basil_term::{Term, decode_string};
use std::path::{Path, PathBuf};

/// The role a toplevel declaration plays in its base language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclKind {
    /// a namespace declaration; the qualified module name is the argument at this index
    Namespace(usize),
    /// an import; the imported module name is the argument at this index
    Import(usize),
    Body,
    Other,
}

/// Collects the base-language parts of one source file.
pub struct BaseProcessor<'a> {
    profile: &'a LanguageProfile,
    /// source path relative to its source root
    source: PathBuf,
    module_name: String,
    namespace: String,
    header: Option<String>,
    imports: Vec<String>,
    body: Vec<String>,
}

impl<'a> BaseProcessor<'a> {
    pub fn new(profile: &'a LanguageProfile, source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        let module_name = source
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_owned)
            .ok_or_else(|| ProcessorError::NoModuleName(source.clone()))?;
        let namespace = source
            .parent()
            .map(|dir| {
                let parts = dir.iter().map(|part| part.to_string_lossy()).collect::<Vec<_>>();
                parts.join("/")
            })
            .unwrap_or_default();
        Ok(Self {
            profile,
            source,
            module_name,
            namespace,
            header: None,
            imports: Vec::new(),
            body: Vec::new(),
        })
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }
    /// The source's directory relative to the source root, `/`-separated.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
    /// `<dir>/<stem>.<base suffix>-src`, relative to the output root.
    pub fn out_file(&self) -> PathBuf {
        self.source.with_extension(format!("{}-src", self.profile.base_file_suffix))
    }

    pub fn classify(&self, decl: &Term) -> DeclKind {
        let profile = self.profile;
        match &profile.namespace_declaration {
            | Some(NamespaceDecl { cons, index }) if decl.is_appl(cons) => DeclKind::Namespace(*index),
            | _ => match profile.import_index(decl) {
                | Some(index) => DeclKind::Import(index),
                | None if profile.is_body_decl(decl) => DeclKind::Body,
                | None => DeclKind::Other,
            },
        }
    }

    pub fn process(&mut self, decl: &Term) -> Result<DeclKind> {
        let kind = self.classify(decl);
        match kind {
            | DeclKind::Namespace(index) => self.process_namespace(decl, index)?,
            | DeclKind::Import(_) => self.imports.push(render(decl)),
            | DeclKind::Body => self.body.push(render(decl)),
            | DeclKind::Other => Err(ProcessorError::Unexpected {
                decl: render(decl),
                language: self.profile.language.clone(),
            })?,
        }
        Ok(kind)
    }

    fn process_namespace(&mut self, decl: &Term, index: usize) -> Result<()> {
        if self.header.is_some() {
            Err(ProcessorError::DuplicateHeader(render(decl)))?
        }
        let qualified = decl.nth(index)?;
        let qualified = decode_string(qualified).unwrap_or_else(|_| qualified.to_string());
        let (declared_namespace, declared_name) = split_qualified(self.profile.namespace_kind, &qualified);
        log::debug!("namespace declaration of `{}`: `{qualified}`", self.source.display());
        if let Some(declared) = declared_namespace {
            if declared != self.namespace {
                Err(ProcessorError::NamespaceMismatch { declared, expected: self.namespace.clone() })?
            }
        }
        if declared_name != self.module_name {
            Err(ProcessorError::ModuleNameMismatch {
                declared: declared_name,
                expected: self.module_name.clone(),
            })?
        }
        self.header = Some(render(decl));
        Ok(())
    }

    /// Header, imports and body, one per line; empty until a namespace declaration is seen.
    pub fn generated_source(&self) -> String {
        let Some(header) = &self.header else { return String::new() };
        format!("{header}\n{}\n{}", self.imports.join("\n"), self.body.join("\n"))
    }

    /// Write the generated source below `out_dir`, returning the written path.
    pub fn write_generated(&self, out_dir: &Path) -> Result<PathBuf> {
        let path = out_dir.join(self.out_file());
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|err| ProcessorError::Write(path.clone(), err))?;
        }
        std::fs::write(&path, self.generated_source())
            .map_err(|err| ProcessorError::Write(path.clone(), err))?;
        log::info!("Wrote `{}`", path.display());
        Ok(path)
    }

    /// Copy each output (relative to `out_dir`) to `bin`, renamed to the base-language suffix.
    pub fn compile(&self, out_dir: &Path, outputs: &[PathBuf], bin: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for output in outputs {
            let from = out_dir.join(output);
            let to = bin.join(output.with_extension(&self.profile.base_file_suffix));
            if let Some(dir) = to.parent() {
                std::fs::create_dir_all(dir).map_err(|err| ProcessorError::Write(to.clone(), err))?;
            }
            std::fs::copy(&from, &to).map_err(|err| ProcessorError::Copy(from.clone(), to.clone(), err))?;
            log::debug!("copied `{}` to `{}`", from.display(), to.display());
            written.push(to);
        }
        Ok(written)
    }
}

fn render(decl: &Term) -> String {
    decl.to_string()
}

/// Split a qualified module name into its `/`-separated namespace and the module name. Flat
/// names carry no namespace at all.
fn split_qualified(kind: NamespaceKind, qualified: &str) -> (Option<String>, String) {
    let Some(sep) = kind.separator() else { return (None, qualified.to_owned()) };
    match qualified.rsplit_once(sep) {
        | Some((namespace, name)) => {
            let parts = namespace.split(sep).collect::<Vec<_>>();
            (Some(parts.join("/")), name.to_owned())
        }
        | None => (Some(String::new()), qualified.to_owned()),
    }
}
