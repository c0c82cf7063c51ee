pub mod cli;
pub mod err;

pub use cli::{Cli, Commands};
pub use err::{CliError, Result};

use basil_driver::{Conf, DefaultOrchestrator, PluginLayout, language_name};
use basil_profile::{ArtifactPaths, extract_declarations};
use basil_term::read_term;
use std::path::{Path, PathBuf};

/// Run one command and return what it prints on success.
pub fn run(command: Commands) -> Result<String> {
    match command {
        | Commands::Process { definition, plugin, conf, verbose: _ } => {
            let layout = layout(&definition, plugin)?;
            let conf = match conf {
                | Some(path) => Conf::load(path)?,
                | None => Conf::load_or_init()?,
            };
            let base = DefaultOrchestrator::from_conf(conf).process(&definition, &layout)?;
            log::info!("Processed base language `{}` ({})", base.name(), base.freshness);
            Ok(base.profile.to_string())
        }
        | Commands::Status { definition, plugin, verbose: _ } => {
            let layout = layout(&definition, plugin)?;
            let state = DefaultOrchestrator::from_conf(Conf::default()).status(&definition, &layout)?;
            Ok(format!("{state}\n"))
        }
        | Commands::Profile { transformation, verbose: _ } => {
            let source = std::fs::read_to_string(&transformation)
                .map_err(|err| CliError::Read(transformation.clone(), err))?;
            let module =
                read_term(&source).map_err(|err| CliError::Parse(transformation.clone(), err))?;
            let language = language_name(&transformation)?;
            let dir = transformation.parent().unwrap_or(Path::new("."));
            let profile = extract_declarations(&module)?
                .complete(language.as_str(), ArtifactPaths::new(dir, &language))?;
            Ok(profile.to_string())
        }
    }
}

/// An explicit plugin directory, or the one whose `src` holds the definition.
fn layout(definition: &Path, plugin: Option<PathBuf>) -> Result<PluginLayout> {
    if let Some(root) = plugin {
        return Ok(PluginLayout::new(root));
    }
    let src = definition.parent().filter(|dir| dir.file_name().is_some_and(|name| name == "src"));
    match src.and_then(Path::parent) {
        | Some(root) => Ok(PluginLayout::new(root)),
        | None => Err(CliError::NoPlugin(definition.to_path_buf())),
    }
}
