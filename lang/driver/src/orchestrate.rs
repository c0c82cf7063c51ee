//! The regeneration pipeline for one language definition.
//!
//! A stale definition is run through the generator and both raw modules are rewritten into
//! their canonical form before being written out along with the three artifacts derived from
//! the grammar. A fresh definition only has its cached transformation module re-read to
//! recover the profile; nothing is written.

use crate::{
    conf::Conf,
    err::{Context, ImplementationError, ProcessError, Result},
    layout::{Freshness, PluginLayout, freshness, language_name},
    registry::BaseLanguage,
    services::{Generated, Generator, TermParser, TermPrinter},
};
use basil_profile::{ArtifactPaths, ExtractError, LanguageProfile, extract_declarations};
use basil_rewrite::{Augmentation, ModuleKind, rewrite_imports};
use basil_term::Term;
use std::path::Path;

/// Preamble of the packaged grammar definition.
pub const DEFINITION_PREAMBLE: &str = "definition\n\n";

pub struct Orchestrator<G, P, R> {
    pub conf: Conf,
    pub generator: G,
    pub parser: P,
    pub printer: R,
}

impl<G, P, R> Orchestrator<G, P, R>
where
    G: Generator,
    P: TermParser,
    R: TermPrinter,
{
    pub fn new(conf: Conf, generator: G, parser: P, printer: R) -> Self {
        Self { conf, generator, parser, printer }
    }

    /// Whether the artifacts of `definition` are up to date; touches nothing.
    pub fn status(&self, definition: &Path, layout: &PluginLayout) -> Result<Freshness> {
        let language = language_name(definition)?;
        freshness(definition, &layout.artifacts(&language))
    }

    /// Bring the artifacts of `definition` up to date and publish its profile.
    pub fn process(&mut self, definition: &Path, layout: &PluginLayout) -> Result<BaseLanguage> {
        let language = language_name(definition)?;
        let bin = layout.ensure_bin()?;
        let artifacts = layout.artifacts(&language);
        let state = freshness(definition, &artifacts)?;
        log::info!("Base language `{language}` is {state}");
        let profile = match state {
            | Freshness::Stale => self.regenerate(definition, &language, &bin, artifacts)?,
            | Freshness::Fresh => self.reload(&language, artifacts)?,
        };
        let base = BaseLanguage { profile, layout: layout.clone(), freshness: state };
        for file in &self.conf.support_files {
            let path = base.ensure_file(file)?;
            log::debug!("support file `{}` found at `{}`", file.display(), path.display());
        }
        Ok(base)
    }

    fn regenerate(
        &mut self, definition: &Path, language: &str, bin: &Path, artifacts: ArtifactPaths,
    ) -> Result<LanguageProfile> {
        let Generated { grammar, transformation, errors } =
            self.generator.generate(definition, language, bin)?;
        if !errors.is_empty() {
            Err(ProcessError::definition(language, errors))?
        }

        let transformation = self.parser.parse(
            &self.conf.tables.transformation,
            &transformation,
            ModuleKind::Transformation.start_symbol(),
        )?;
        let profile = profile(&transformation, language, artifacts)?;
        let transformation = rewrite_imports(
            &transformation,
            ModuleKind::Transformation,
            &self.conf.canonical.transformation,
        )?;
        let text = self.printer.pretty_print(ModuleKind::Transformation, &transformation)?;
        write(&profile.artifacts.transformation, &text)?;

        let grammar = self.parser.parse(
            &self.conf.tables.grammar,
            &grammar,
            ModuleKind::Grammar.start_symbol(),
        )?;
        let mut grammar = rewrite_imports(&grammar, ModuleKind::Grammar, &self.conf.canonical.grammar)?;
        match &profile.toplevel_nonterminal {
            | Some(toplevel) => {
                let augmentation = Augmentation {
                    marker: &self.conf.ground_marker,
                    toplevel_sort: &self.conf.toplevel_sort,
                };
                grammar = augmentation.append(&grammar, language, toplevel)?;
            }
            | None => log::warn!(
                "Base language `{language}` declares no toplevel nonterminal; \
                 its grammar is not connected to `{}`",
                self.conf.toplevel_sort
            ),
        }
        let grammar = self.printer.normalize_grammar(grammar)?;
        let text = self.printer.pretty_print(ModuleKind::Grammar, &grammar)?;
        write(&profile.artifacts.grammar, &text)?;
        write(&profile.artifacts.editor_services, &format!("module {language}\n"))?;
        write(&profile.artifacts.packaged_grammar, &format!("{DEFINITION_PREAMBLE}{text}"))?;
        let pp_table = self.printer.derive_pp_table(&grammar)?;
        write(&profile.artifacts.pp_table, &pp_table)?;
        Ok(profile)
    }

    fn reload(&mut self, language: &str, artifacts: ArtifactPaths) -> Result<LanguageProfile> {
        let transformation = self.parser.parse(
            &self.conf.tables.transformation,
            &artifacts.transformation,
            ModuleKind::Transformation.start_symbol(),
        )?;
        profile(&transformation, language, artifacts)
    }
}

/// Extract and assemble the profile; an absent mandatory definition is the author's mistake.
fn profile(transformation: &Term, language: &str, artifacts: ArtifactPaths) -> Result<LanguageProfile> {
    let assembled =
        extract_declarations(transformation).and_then(|decls| decls.complete(language, artifacts));
    match assembled {
        | Ok(profile) => Ok(profile),
        | Err(err @ ExtractError::Missing { .. }) => {
            Err(ProcessError::definition(language, vec![err.to_string()]))
        }
        | Err(err) => Err(ImplementationError::from(err).into()),
    }
}

fn write(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).context(|| format!("write `{}`", path.display()))?;
    log::info!("Wrote `{}`", path.display());
    Ok(())
}
