use crate::{
    conf::GeneratorConf,
    err::{Context, ProcessError, Result},
    services::{Generated, Generator},
};
use basil_profile::ArtifactPaths;
use std::{path::Path, process::Command};

/// Runs an external generator program in a scratch cache directory.
///
/// The program reports validation problems as `error: <message>` lines on stderr and leaves the
/// raw modules at `<out>/<language>.sdf` and `<out>/<language>.str`.
#[derive(Clone, Debug)]
pub struct CommandGenerator {
    pub program: String,
    pub args: Vec<String>,
}

impl From<&GeneratorConf> for CommandGenerator {
    fn from(GeneratorConf { program, args }: &GeneratorConf) -> Self {
        Self { program: program.clone(), args: args.clone() }
    }
}

impl CommandGenerator {
    pub const ERROR_PREFIX: &'static str = "error:";

    fn args(&self, definition: &Path, out: &Path, cache: &Path) -> Vec<String> {
        let definition = definition.display().to_string();
        let out = out.display().to_string();
        let cache = cache.display().to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{definition}", &definition)
                    .replace("{out}", &out)
                    .replace("{cache}", &cache)
            })
            .collect()
    }
}

impl Generator for CommandGenerator {
    fn generate(&mut self, definition: &Path, language: &str, out: &Path) -> Result<Generated> {
        let cache = tempfile::tempdir().context(|| "create a cache directory".to_owned())?;
        let args = self.args(definition, out, cache.path());
        log::info!("Running `{}` on `{}`", self.program, definition.display());
        log::debug!("generator arguments: {args:?}");
        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(cache.path())
            .output()
            .context(|| format!("run the generator `{}`", self.program))?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        let errors = stderr
            .lines()
            .filter_map(|line| line.trim_start().strip_prefix(Self::ERROR_PREFIX))
            .map(|message| message.trim().to_owned())
            .collect::<Vec<_>>();
        if !output.status.success() && errors.is_empty() {
            Err(ProcessError::external(
                format!("run the generator `{}`", self.program),
                format!("{}\n{}", output.status, stderr.trim_end()),
            ))?
        }
        let ArtifactPaths { grammar, transformation, .. } = ArtifactPaths::new(out, language);
        Ok(Generated { grammar, transformation, errors })
    }
}
