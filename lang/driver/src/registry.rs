use crate::{
    err::{ProcessError, Result},
    layout::{Freshness, PluginLayout},
};
use basil_profile::LanguageProfile;
use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use std::path::{Path, PathBuf};

/// A processed base language as the rest of the toolchain sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseLanguage {
    pub profile: LanguageProfile,
    pub layout: PluginLayout,
    /// whether the artifacts were regenerated by the run that produced this language
    pub freshness: Freshness,
}

impl BaseLanguage {
    pub fn name(&self) -> &str {
        &self.profile.language
    }
    /// Resolve a plugin file, preferring the artifact directory over the source directory.
    pub fn ensure_file(&self, rel: impl AsRef<Path>) -> Result<PathBuf> {
        let rel = rel.as_ref();
        for dir in [self.layout.bin(), self.layout.src()] {
            let path = dir.join(rel);
            if path.is_file() {
                return Ok(path);
            }
        }
        Err(ProcessError::external(
            format!("locate `{}` for base language `{}`", rel.display(), self.name()),
            format!("not found under `{}`", self.layout.root.display()),
        ))
    }
}

type Init = Box<dyn FnMut() -> Result<BaseLanguage>>;

enum Entry {
    Ready(BaseLanguage),
    Lazy { cell: OnceCell<BaseLanguage>, init: Init },
}

/// Base languages by name.
#[derive(Default)]
pub struct Registry {
    languages: IndexMap<String, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }
    /// Publish an already processed language, replacing any entry of the same name.
    pub fn register(&mut self, language: BaseLanguage) {
        let name = language.name().to_owned();
        if self.languages.insert(name.clone(), Entry::Ready(language)).is_some() {
            log::warn!("Base language `{name}` registered again; the new one replaces it.");
        }
    }
    /// Defer processing of `name` until it is first asked for. A failed initialisation is
    /// reported and attempted again on the next request.
    pub fn register_lazy(
        &mut self, name: impl Into<String>, init: impl FnMut() -> Result<BaseLanguage> + 'static,
    ) {
        let name = name.into();
        let entry = Entry::Lazy { cell: OnceCell::new(), init: Box::new(init) };
        if self.languages.insert(name.clone(), entry).is_some() {
            log::warn!("Base language `{name}` registered again; the new one replaces it.");
        }
    }
    pub fn contains(&self, name: &str) -> bool {
        self.languages.contains_key(name)
    }
    pub fn get(&mut self, name: &str) -> Result<Option<&BaseLanguage>> {
        let Some(entry) = self.languages.get_mut(name) else { return Ok(None) };
        match entry {
            | Entry::Ready(language) => Ok(Some(language)),
            | Entry::Lazy { cell, init } => {
                let language = cell.get_or_try_init(|| {
                    log::info!("Initialising base language `{name}`");
                    init()
                })?;
                Ok(Some(language))
            }
        }
    }
}
