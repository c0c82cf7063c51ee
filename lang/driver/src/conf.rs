use crate::err::Context;
use sculptor::{AppAuthor, FileIO, ProjectInfo, impl_serde_str_toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conf {
    /// inserted between the language name and its toplevel nonterminal
    pub ground_marker: String,
    /// the toolchain's common toplevel-declaration nonterminal
    pub toplevel_sort: String,
    /// files every processed language must be able to resolve, relative to the plugin
    pub support_files: Vec<PathBuf>,
    pub canonical: Canonical,
    pub tables: Tables,
    pub generator: GeneratorConf,
}

/// The module every generated module is made to import instead of its own imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canonical {
    pub transformation: String,
    pub grammar: String,
}

/// Parse tables handed to the term parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tables {
    pub grammar: String,
    pub transformation: String,
}

/// The external program turning a definition into raw modules. Arguments may mention
/// `{definition}`, `{out}` and `{cache}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConf {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for Conf {
    fn default() -> Self {
        Self {
            ground_marker: "Gnd".to_owned(),
            toplevel_sort: "ToplevelDeclaration".to_owned(),
            support_files: vec!["basil/Common.str".into(), "basil/Common.sdf".into()],
            canonical: Canonical::default(),
            tables: Tables::default(),
            generator: GeneratorConf::default(),
        }
    }
}

impl Default for Canonical {
    fn default() -> Self {
        Self { transformation: "basil/Common".to_owned(), grammar: "basil/Common".to_owned() }
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self { grammar: "Sdf2.tbl".to_owned(), transformation: "Stratego.tbl".to_owned() }
    }
}

impl Default for GeneratorConf {
    fn default() -> Self {
        Self {
            program: "basil-gen".to_owned(),
            args: ["{definition}", "--out", "{out}", "--cache", "{cache}"]
                .map(str::to_owned)
                .to_vec(),
        }
    }
}

impl_serde_str_toml!(Conf);

impl AppAuthor for Conf {
    fn app_name() -> &'static str {
        "Basil"
    }

    fn author() -> &'static str {
        "Basil"
    }
}

impl Conf {
    pub const FILE_NAME: &'static str = "basil.toml";

    pub fn default_path() -> PathBuf {
        Conf::config_dir().join(Self::FILE_NAME)
    }

    /// Load an explicitly given configuration file.
    pub fn load(path: impl AsRef<Path>) -> crate::err::Result<Self> {
        let path = path.as_ref();
        FileIO::new(path.to_path_buf())
            .load()
            .context(|| format!("load the configuration at `{}`", path.display()))
    }

    /// Load the per-user configuration, writing out the defaults if there is none yet.
    pub fn load_or_init() -> crate::err::Result<Self> {
        Self::load_or_init_at(Self::default_path())
    }

    /// Load the configuration at `path`. A missing or unreadable file is replaced by the
    /// defaults; an existing one is kept aside as `basil.toml.<timestamp>.bak`.
    pub fn load_or_init_at(path: impl Into<PathBuf>) -> crate::err::Result<Self> {
        let file_conf = FileIO::new(path.into());
        match file_conf.load() {
            | Ok(conf) => Ok(conf),
            | Err(err) => {
                let path = file_conf.path.display();
                log::warn!("Cannot load the configuration at `{path}` ({err}); writing the defaults there.");
                let conf = Conf::default();
                file_conf
                    .backup_and_save(&conf)
                    .context(|| format!("write the default configuration to `{path}`"))?;
                Ok(conf)
            }
        }
    }
}
