//! Where a plugin keeps its definitions and derived artifacts, and whether those artifacts
//! are still up to date.

use crate::err::{Context, ProcessError, Result};
use basil_profile::ArtifactPaths;
use std::{
    fmt, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// `<root>/src` holds definitions, `<root>/bin` the artifacts derived from them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluginLayout {
    pub root: PathBuf,
}

impl PluginLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
    pub fn src(&self) -> PathBuf {
        self.root.join("src")
    }
    pub fn bin(&self) -> PathBuf {
        self.root.join("bin")
    }
    /// The artifact directory, created if missing.
    pub fn ensure_bin(&self) -> Result<PathBuf> {
        let bin = self.bin();
        std::fs::create_dir_all(&bin)
            .context(|| format!("create the artifact directory `{}`", bin.display()))?;
        Ok(bin)
    }
    pub fn artifacts(&self, language: &str) -> ArtifactPaths {
        ArtifactPaths::new(self.bin(), language)
    }
}

/// The language a definition file describes is named after the file's stem.
pub fn language_name(definition: &Path) -> Result<String> {
    definition
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| {
            ProcessError::external(
                format!("derive a language name from `{}`", definition.display()),
                "the file name has no usable stem",
            )
        })
}

/* ------------------------------- Freshness -------------------------------- */

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Freshness {
    /// every artifact exists and was modified after the definition
    Fresh,
    /// some artifact is missing or not newer than the definition
    Stale,
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            | Freshness::Fresh => write!(f, "fresh"),
            | Freshness::Stale => write!(f, "stale"),
        }
    }
}

fn modified(path: &Path) -> io::Result<SystemTime> {
    std::fs::metadata(path)?.modified()
}

/// Compare the modification time of every artifact against the definition's.
pub fn freshness(definition: &Path, artifacts: &ArtifactPaths) -> Result<Freshness> {
    let source = modified(definition).context(|| {
        format!("read the modification time of `{}`", definition.display())
    })?;
    for artifact in artifacts.all() {
        match modified(artifact) {
            | Ok(time) if time > source => continue,
            | Ok(_) => {
                log::debug!("`{}` is older than its definition", artifact.display());
                return Ok(Freshness::Stale);
            }
            | Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("`{}` does not exist yet", artifact.display());
                return Ok(Freshness::Stale);
            }
            | Err(err) => Err(ProcessError::external(
                format!("read the modification time of `{}`", artifact.display()),
                err,
            ))?,
        }
    }
    Ok(Freshness::Fresh)
}
