use crate::*;
use basil_profile::{ArtifactPaths, NamespaceKind};
use basil_rewrite::ModuleKind;
use basil_term::{Term, read_term};
use indexmap::IndexSet;
use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};
use tempfile::TempDir;

const TRANSFORMATION: &str = r#"Module("stlc", [
    Imports([Import("libstratego-lib"), Import("stlc/Common")]),
    Strategies([SDefNoArgs("sx-ToplevelDeclaration", Build(NoAnnoList(Str("\"ToplevelDec\""))))]),
    Strategies([SDefNoArgs("sx-extensible-file-ext", Build(NoAnnoList(Str("\"xst\""))))]),
    Strategies([SDefNoArgs("sx-base-file-ext", Build(NoAnnoList(Str("\"st\""))))]),
    Strategies([SDefNoArgs("sx-body-decs", Build(NoAnnoList(ListTail(
        [NoAnnoList(Str("\"Def\""))], NoAnnoList(List([NoAnnoList(Str("\"Use\""))]))))))]),
    Strategies([SDefNoArgs("sx-namespace-kind", Build(NoAnnoList(Op("SXNamespaceFlat", []))))]),
    Rules([])
])"#;

const GRAMMAR: &str = r#"module(unparameterized("stlc"), [imports([module(unparameterized("Lexical"))])], [
    exports(context-free-syntax([
        prod([lit("\"def\""), sort("Id"), lit("\"=\""), sort("Exp")], sort("ToplevelDec"),
            attrs([term(cons("\"Def\""))])),
        prod([lit("\"use\""), sort("Id")], sort("ToplevelDec"), attrs([term(cons("\"Use\""))])),
        prod([sort("Id")], sort("Exp"), no-attrs)
    ]))
])"#;

/// Writes fixed raw modules and counts how often it was asked to.
#[derive(Default)]
struct FakeGenerator {
    grammar: String,
    transformation: String,
    errors: Vec<String>,
    calls: usize,
}

impl FakeGenerator {
    fn new(grammar: &str, transformation: &str) -> Self {
        Self { grammar: grammar.to_owned(), transformation: transformation.to_owned(), ..Default::default() }
    }
}

impl Generator for FakeGenerator {
    fn generate(&mut self, _definition: &Path, language: &str, out: &Path) -> Result<Generated> {
        self.calls += 1;
        let ArtifactPaths { grammar, transformation, .. } = ArtifactPaths::new(out, language);
        if self.errors.is_empty() {
            fs::write(&grammar, &self.grammar).unwrap();
            fs::write(&transformation, &self.transformation).unwrap();
        }
        Ok(Generated { grammar, transformation, errors: self.errors.clone() })
    }
}

struct Plugin {
    _dir: TempDir,
    layout: PluginLayout,
    definition: PathBuf,
}

fn hours_ago(hours: u64) -> SystemTime {
    SystemTime::now() - Duration::from_secs(hours * 3600)
}

fn set_modified(path: &Path, time: SystemTime) {
    fs::File::options().write(true).open(path).unwrap().set_modified(time).unwrap();
}

fn plugin() -> Plugin {
    let dir = tempfile::tempdir().unwrap();
    let layout = PluginLayout::new(dir.path());
    fs::create_dir_all(layout.src()).unwrap();
    let definition = layout.src().join("stlc.basil");
    fs::write(&definition, "base language stlc\n").unwrap();
    set_modified(&definition, hours_ago(2));
    Plugin { _dir: dir, layout, definition }
}

fn conf() -> Conf {
    Conf { support_files: Vec::new(), ..Conf::default() }
}

fn orchestrator(generator: &mut FakeGenerator) -> Orchestrator<&mut FakeGenerator, AtermServices, AtermServices> {
    Orchestrator::new(conf(), generator, AtermServices::default(), AtermServices::default())
}

fn read(path: &Path) -> Term {
    read_term(&fs::read_to_string(path).unwrap()).unwrap()
}

mod staleness {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_artifacts_are_stale() {
        let plugin = plugin();
        let mut generator = FakeGenerator::new(GRAMMAR, TRANSFORMATION);
        let orchestrator = orchestrator(&mut generator);
        assert_eq!(orchestrator.status(&plugin.definition, &plugin.layout).unwrap(), Freshness::Stale);
    }

    #[test]
    fn one_old_artifact_makes_everything_stale() {
        let plugin = plugin();
        let artifacts = plugin.layout.artifacts("stlc");
        fs::create_dir_all(plugin.layout.bin()).unwrap();
        for path in artifacts.all() {
            fs::write(path, "").unwrap();
        }
        assert_eq!(freshness(&plugin.definition, &artifacts).unwrap(), Freshness::Fresh);
        set_modified(&artifacts.pp_table, hours_ago(3));
        assert_eq!(freshness(&plugin.definition, &artifacts).unwrap(), Freshness::Stale);
    }

    #[test]
    fn equal_timestamps_are_stale() {
        let plugin = plugin();
        let artifacts = plugin.layout.artifacts("stlc");
        fs::create_dir_all(plugin.layout.bin()).unwrap();
        let time = hours_ago(1);
        set_modified(&plugin.definition, time);
        for path in artifacts.all() {
            fs::write(path, "").unwrap();
            set_modified(path, time);
        }
        assert_eq!(freshness(&plugin.definition, &artifacts).unwrap(), Freshness::Stale);
    }

    #[test]
    fn missing_definition_is_an_external_failure() {
        let plugin = plugin();
        let artifacts = plugin.layout.artifacts("stlc");
        let err = freshness(&plugin.layout.src().join("gone.basil"), &artifacts).unwrap_err();
        assert!(matches!(err, ProcessError::External { .. }), "{err}");
        let trace = err.backtrace().unwrap_or_default();
        assert!(!trace.is_empty());
        assert!(err.to_string().starts_with("Base-language processing failed unexpectedly while trying to"));
    }

    #[test]
    fn language_is_named_after_the_definition_stem() {
        assert_eq!(language_name(Path::new("/p/src/stlc.basil")).unwrap(), "stlc");
        assert!(language_name(Path::new("/")).is_err());
    }
}

mod process {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stale_run_regenerates_every_artifact() {
        let plugin = plugin();
        let mut generator = FakeGenerator::new(GRAMMAR, TRANSFORMATION);
        let base = orchestrator(&mut generator).process(&plugin.definition, &plugin.layout).unwrap();
        assert_eq!(generator.calls, 1);
        assert_eq!(base.freshness, Freshness::Stale);
        assert_eq!(base.name(), "stlc");

        let profile = &base.profile;
        assert_eq!(profile.extension_file_suffix, "xst");
        assert_eq!(profile.base_file_suffix, "st");
        assert_eq!(profile.namespace_kind, NamespaceKind::Flat);
        assert_eq!(profile.body_declarations, IndexSet::from(["Def".to_owned(), "Use".to_owned()]));
        assert_eq!(profile.toplevel_nonterminal.as_deref(), Some("ToplevelDec"));
        assert_eq!(profile.artifacts, plugin.layout.artifacts("stlc"));
        for path in profile.artifacts.all() {
            assert!(path.is_file(), "{} was not written", path.display());
        }
    }

    #[test]
    fn written_modules_are_canonical() {
        let plugin = plugin();
        let mut generator = FakeGenerator::new(GRAMMAR, TRANSFORMATION);
        let base = orchestrator(&mut generator).process(&plugin.definition, &plugin.layout).unwrap();
        let artifacts = &base.profile.artifacts;

        let transformation = read(&artifacts.transformation);
        let decls = transformation.nth(1).unwrap().as_list().unwrap();
        assert_eq!(decls[0], read_term(r#"Imports([Import("basil/Common")])"#).unwrap());
        assert_eq!(decls.iter().filter(|decl| decl.is_appl("Imports")).count(), 1);
        assert!(decls.last().unwrap().is_appl("Rules"));

        let grammar = read(&artifacts.grammar);
        assert_eq!(
            grammar.nth(1).unwrap(),
            &read_term(r#"[imports(module(unparameterized("basil/Common")))]"#).unwrap()
        );
        let body = grammar.nth(2).unwrap().as_list().unwrap();
        assert_eq!(body.len(), 2);
        assert_eq!(body[1], basil_rewrite::Augmentation::STANDARD.production("stlc", "ToplevelDec"));
    }

    #[test]
    fn derived_artifacts_follow_the_grammar() {
        let plugin = plugin();
        let mut generator = FakeGenerator::new(GRAMMAR, TRANSFORMATION);
        let base = orchestrator(&mut generator).process(&plugin.definition, &plugin.layout).unwrap();
        let artifacts = &base.profile.artifacts;
        let grammar = fs::read_to_string(&artifacts.grammar).unwrap();
        assert_eq!(fs::read_to_string(&artifacts.editor_services).unwrap(), "module stlc\n");
        assert_eq!(
            fs::read_to_string(&artifacts.packaged_grammar).unwrap(),
            format!("definition\n\n{grammar}")
        );
        assert_eq!(
            fs::read_to_string(&artifacts.pp_table).unwrap(),
            "[\n   Def -- H[KW[\"def\"] _1 KW[\"=\"] _2],\n   Use -- H[KW[\"use\"] _1]\n]\n"
        );
    }

    #[test]
    fn fresh_runs_write_nothing_and_agree() {
        let plugin = plugin();
        let mut generator = FakeGenerator::new(GRAMMAR, TRANSFORMATION);
        let stale = orchestrator(&mut generator).process(&plugin.definition, &plugin.layout).unwrap();
        let artifacts = stale.profile.artifacts.clone();
        for path in artifacts.all() {
            set_modified(path, hours_ago(1));
        }
        let stamps = artifacts.all().map(|path| fs::metadata(path).unwrap().modified().unwrap());
        let contents = artifacts.all().map(|path| fs::read_to_string(path).unwrap());

        let first = orchestrator(&mut generator).process(&plugin.definition, &plugin.layout).unwrap();
        let second = orchestrator(&mut generator).process(&plugin.definition, &plugin.layout).unwrap();
        assert_eq!(generator.calls, 1);
        assert_eq!(first.freshness, Freshness::Fresh);
        assert_eq!(first.profile, second.profile);
        assert_eq!(first.profile, stale.profile);
        for ((path, stamp), content) in artifacts.all().into_iter().zip(stamps).zip(contents) {
            assert_eq!(fs::metadata(path).unwrap().modified().unwrap(), stamp);
            assert_eq!(fs::read_to_string(path).unwrap(), content);
        }
    }

    #[test]
    fn touching_the_definition_regenerates() {
        let plugin = plugin();
        let mut generator = FakeGenerator::new(GRAMMAR, TRANSFORMATION);
        orchestrator(&mut generator).process(&plugin.definition, &plugin.layout).unwrap();
        set_modified(&plugin.definition, SystemTime::now() + Duration::from_secs(3600));
        let base = orchestrator(&mut generator).process(&plugin.definition, &plugin.layout).unwrap();
        assert_eq!(base.freshness, Freshness::Stale);
        assert_eq!(generator.calls, 2);
    }

    #[test]
    fn no_toplevel_nonterminal_leaves_the_grammar_unaugmented() {
        let plugin = plugin();
        let transformation = TRANSFORMATION.replace("sx-ToplevelDeclaration", "helper");
        let mut generator = FakeGenerator::new(GRAMMAR, &transformation);
        let base = orchestrator(&mut generator).process(&plugin.definition, &plugin.layout).unwrap();
        assert_eq!(base.profile.toplevel_nonterminal, None);
        let grammar = read(&base.profile.artifacts.grammar);
        assert_eq!(grammar.nth(2).unwrap().as_list().unwrap().len(), 1);
    }
}

mod failures {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn generator_errors_stop_processing() {
        let plugin = plugin();
        let mut generator = FakeGenerator {
            errors: vec!["undefined sort `Exp`".to_owned(), "duplicate rule".to_owned()],
            ..FakeGenerator::new(GRAMMAR, TRANSFORMATION)
        };
        let err = orchestrator(&mut generator).process(&plugin.definition, &plugin.layout).unwrap_err();
        match &err {
            | ProcessError::Definition { language, messages } => {
                assert_eq!(language, "stlc");
                assert_eq!(messages.len(), 2);
            }
            | other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("undefined sort `Exp`\nduplicate rule"));
        for path in plugin.layout.artifacts("stlc").all() {
            assert!(!path.exists(), "{} was written", path.display());
        }
    }

    #[test]
    fn missing_mandatory_definition_is_the_authors_error() {
        let plugin = plugin();
        let transformation = TRANSFORMATION.replace("sx-namespace-kind", "helper");
        let mut generator = FakeGenerator::new(GRAMMAR, &transformation);
        let err = orchestrator(&mut generator).process(&plugin.definition, &plugin.layout).unwrap_err();
        assert!(matches!(err, ProcessError::Definition { .. }), "{err}");
        assert!(err.to_string().contains("sx-namespace-kind"));
    }

    #[test]
    fn malformed_definition_is_an_implementation_error() {
        let plugin = plugin();
        let transformation = TRANSFORMATION.replace(r#"Op("SXNamespaceFlat", [])"#, r#"Op("SXNamespaceTree", [])"#);
        let mut generator = FakeGenerator::new(GRAMMAR, &transformation);
        let err = orchestrator(&mut generator).process(&plugin.definition, &plugin.layout).unwrap_err();
        assert!(matches!(err, ProcessError::Implementation(_)), "{err}");
        assert!(err.to_string().contains("namespaceKind"));
    }

    #[test]
    fn unreadable_module_is_an_external_failure() {
        let plugin = plugin();
        let mut generator = FakeGenerator::new("module(", TRANSFORMATION);
        let err = orchestrator(&mut generator).process(&plugin.definition, &plugin.layout).unwrap_err();
        match &err {
            | ProcessError::External { action, .. } => assert!(action.contains("stlc.sdf"), "{action}"),
            | other => panic!("unexpected error: {other}"),
        }
        // the transformation module is written before the grammar is read
        assert!(plugin.layout.artifacts("stlc").transformation.is_file());
        assert!(!plugin.layout.artifacts("stlc").pp_table.exists());
    }

    #[test]
    fn support_files_must_exist() {
        let plugin = plugin();
        let mut generator = FakeGenerator::new(GRAMMAR, TRANSFORMATION);
        let mut orchestrator = Orchestrator::new(
            Conf::default(),
            &mut generator,
            AtermServices::default(),
            AtermServices::default(),
        );
        let err = orchestrator.process(&plugin.definition, &plugin.layout).unwrap_err();
        assert!(err.to_string().contains("basil/Common.str"), "{err}");

        let bin = plugin.layout.bin().join("basil");
        let src = plugin.layout.src().join("basil");
        fs::create_dir_all(&bin).unwrap();
        fs::create_dir_all(&src).unwrap();
        fs::write(bin.join("Common.str"), "").unwrap();
        fs::write(src.join("Common.sdf"), "").unwrap();
        fs::write(src.join("Common.str"), "").unwrap();
        let base = orchestrator.process(&plugin.definition, &plugin.layout).unwrap();
        assert_eq!(base.ensure_file("basil/Common.str").unwrap(), bin.join("Common.str"));
        assert_eq!(base.ensure_file("basil/Common.sdf").unwrap(), src.join("Common.sdf"));
    }
}

mod registry {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::{cell::Cell, rc::Rc};

    fn base_language(plugin: &Plugin) -> BaseLanguage {
        let mut generator = FakeGenerator::new(GRAMMAR, TRANSFORMATION);
        orchestrator(&mut generator).process(&plugin.definition, &plugin.layout).unwrap()
    }

    #[test]
    fn lazy_languages_are_initialised_once() {
        let plugin = plugin();
        let base = base_language(&plugin);
        let attempts = Rc::new(Cell::new(0));
        let mut registry = Registry::new();
        registry.register_lazy("stlc", {
            let attempts = attempts.clone();
            move || {
                attempts.set(attempts.get() + 1);
                match attempts.get() {
                    | 1 => Err(ProcessError::external("process `stlc`", "generator crashed")),
                    | _ => Ok(base.clone()),
                }
            }
        });
        assert_eq!(attempts.get(), 0);
        assert!(registry.contains("stlc"));
        assert!(registry.get("stlc").is_err());
        assert_eq!(registry.get("stlc").unwrap().map(BaseLanguage::name), Some("stlc"));
        assert!(registry.get("stlc").unwrap().is_some());
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn registered_languages_are_returned_by_name() {
        let plugin = plugin();
        let mut registry = Registry::new();
        registry.register(base_language(&plugin));
        assert!(registry.contains("stlc"));
        assert!(!registry.contains("other"));
        assert!(registry.get("other").unwrap().is_none());
        let base = registry.get("stlc").unwrap().unwrap();
        assert_eq!(base.profile.base_file_suffix, "st");
    }
}

mod services {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pp_table_has_one_entry_per_constructor() {
        let grammar = read_term(
            r#"module(unparameterized("g"), [], [
                exports(context-free-syntax([
                    prod([sort("Id")], sort("Exp"), attrs([term(cons("\"Var\""))])),
                    prod([sort("Exp"), lit("\"+\""), sort("Exp")], sort("Exp"), attrs([term(cons("\"Add\"")), assoc(left)])),
                    prod([sort("Id")], sort("Pat"), attrs([term(cons("\"Var\""))]))
                ]))
            ])"#,
        )
        .unwrap();
        let table = AtermServices::default().derive_pp_table(&grammar).unwrap();
        assert_eq!(table, "[\n   Var -- H[_1],\n   Add -- H[_1 KW[\"+\"] _2]\n]\n");
    }

    #[test]
    fn pp_table_of_a_grammar_without_constructors_is_empty() {
        let grammar = read_term(r#"module(unparameterized("g"), [], [])"#).unwrap();
        assert_eq!(AtermServices::default().derive_pp_table(&grammar).unwrap(), "[\n]\n");
    }

    #[test]
    fn printed_modules_read_back() {
        let module = read_term(TRANSFORMATION).unwrap();
        let text = AtermServices { width: 40 }.pretty_print(ModuleKind::Transformation, &module).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(read_term(&text).unwrap(), module);
    }

    #[cfg(unix)]
    #[test]
    fn command_generator_collects_reported_errors() {
        let out = tempfile::tempdir().unwrap();
        let mut generator = CommandGenerator {
            program: "sh".to_owned(),
            args: vec![
                "-c".to_owned(),
                "echo 'error: undefined sort Exp' >&2; echo 'warning: unused' >&2; exit 1".to_owned(),
            ],
        };
        let generated = generator.generate(Path::new("stlc.basil"), "stlc", out.path()).unwrap();
        assert_eq!(generated.errors, vec!["undefined sort Exp".to_owned()]);
        assert_eq!(generated.grammar, out.path().join("stlc.sdf"));
    }

    #[cfg(unix)]
    #[test]
    fn command_generator_substitutes_arguments() {
        let out = tempfile::tempdir().unwrap();
        let mut generator = CommandGenerator {
            program: "sh".to_owned(),
            args: vec!["-c".to_owned(), "echo {definition} > {out}/stlc.str".to_owned()],
        };
        let generated = generator.generate(Path::new("defs/stlc.basil"), "stlc", out.path()).unwrap();
        assert!(generated.errors.is_empty());
        assert_eq!(fs::read_to_string(&generated.transformation).unwrap(), "defs/stlc.basil\n");
    }

    #[cfg(unix)]
    #[test]
    fn command_generator_failure_without_messages_is_external() {
        let out = tempfile::tempdir().unwrap();
        let mut generator =
            CommandGenerator { program: "sh".to_owned(), args: vec!["-c".to_owned(), "exit 3".to_owned()] };
        let err = generator.generate(Path::new("stlc.basil"), "stlc", out.path()).unwrap_err();
        assert!(matches!(err, ProcessError::External { .. }), "{err}");
    }

    #[test]
    fn partial_configuration_keeps_defaults() {
        let conf: Conf = toml::from_str("ground_marker = \"Base\"\n[tables]\ngrammar = \"C.tbl\"\n").unwrap();
        assert_eq!(conf.ground_marker, "Base");
        assert_eq!(conf.tables.grammar, "C.tbl");
        assert_eq!(conf.tables.transformation, "Stratego.tbl");
        assert_eq!(conf.canonical, Conf::default().canonical);
    }

    #[test]
    fn unreadable_configuration_is_kept_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(Conf::FILE_NAME);
        let broken = "generator = { program = \"my-gen\" ";
        fs::write(&path, broken).unwrap();
        let conf = Conf::load_or_init_at(&path).unwrap();
        assert_eq!(conf, Conf::default());
        assert_eq!(Conf::load(&path).unwrap(), Conf::default());
        let backups = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "bak"))
            .collect::<Vec<_>>();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), broken);
    }

    #[test]
    fn missing_configuration_is_initialised() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(Conf::FILE_NAME);
        assert_eq!(Conf::load_or_init_at(&path).unwrap(), Conf::default());
        assert!(path.is_file());
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn existing_configuration_is_loaded_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(Conf::FILE_NAME);
        fs::write(&path, "ground_marker = \"Base\"\n").unwrap();
        assert_eq!(Conf::load_or_init_at(&path).unwrap().ground_marker, "Base");
        assert_eq!(fs::read_to_string(&path).unwrap(), "ground_marker = \"Base\"\n");
    }
}
