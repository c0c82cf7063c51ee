//! Reading a [`Declarations`] record off a generated transformation module.
//!
//! The module's top-level declarations are scanned for strategy groups holding exactly one
//! zero-argument definition. A definition whose name appears in [`DEFINITIONS`] is decoded
//! into its field; any other definition is a helper and is skipped. Later occurrences of a
//! recognized name overwrite earlier ones.

use crate::{err::*, syntax::*};
use basil_term::{self as t, Term};
use std::collections::HashSet;

/// Names of the recognized definitions and of the constructors they build.
pub mod names {
    pub const TOPLEVEL_DECLARATION: &str = "sx-ToplevelDeclaration";
    pub const EXTENSIBLE_FILE_EXT: &str = "sx-extensible-file-ext";
    pub const BASE_FILE_EXT: &str = "sx-base-file-ext";
    pub const BODY_DECS: &str = "sx-body-decs";
    pub const NAMESPACE_DEC: &str = "sx-namespace-dec";
    pub const IMPORT_DECS: &str = "sx-import-decs";
    pub const NAMESPACE_KIND: &str = "sx-namespace-kind";
    pub const NAMESPACE_SUFFICES: &str = "sx-namespace-suffices";

    pub const NAMESPACE_FLAT: &str = "SXNamespaceFlat";
    pub const NAMESPACE_NESTED: &str = "SXNamespaceNested";
    pub const NAMESPACE_PREFIXED: &str = "SXNamespacePrefixed";

    pub const STRATEGIES: &str = "Strategies";
    pub const SDEF_NO_ARGS: &str = "SDefNoArgs";
    pub const BUILD: &str = "Build";
    pub const OP: &str = "Op";
}
use names::*;

type Decode = fn(&Term, &mut Declarations) -> t::Result<()>;

/// A recognized definition: its name, the profile field it fills, and how to decode it.
pub struct Definition {
    pub name: &'static str,
    pub field: &'static str,
    decode: Decode,
}

pub const DEFINITIONS: &[Definition] = &[
    Definition { name: TOPLEVEL_DECLARATION, field: "toplevelNonterminal", decode: toplevel },
    Definition { name: EXTENSIBLE_FILE_EXT, field: "extensionFileSuffix", decode: extension },
    Definition { name: BASE_FILE_EXT, field: "baseFileSuffix", decode: base_extension },
    Definition { name: BODY_DECS, field: "bodyDeclarationConstructors", decode: body_decs },
    Definition { name: NAMESPACE_DEC, field: "namespaceDeclaration", decode: namespace_dec },
    Definition { name: IMPORT_DECS, field: "importTable", decode: import_decs },
    Definition { name: NAMESPACE_KIND, field: "namespaceKind", decode: namespace_kind },
    Definition { name: NAMESPACE_SUFFICES, field: "namespaceSuffixTable", decode: namespace_suffixes },
];

impl Definition {
    pub fn lookup(name: &str) -> Option<&'static Definition> {
        DEFINITIONS.iter().find(|def| def.name == name)
    }
}

/// Scan a transformation module `Module(header, [decl, ...])` for recognized definitions.
pub fn extract_declarations(module: &Term) -> Result<Declarations> {
    let [_header, decls] = module.destruct("Module").map_err(ExtractError::Module)?;
    let decls = decls.as_list().map_err(ExtractError::Module)?;
    let mut out = Declarations::default();
    let mut seen = HashSet::new();
    for decl in decls {
        let Some((name, rhs)) = single_definition(decl) else { continue };
        let Some(def) = Definition::lookup(name) else {
            log::trace!("skipping helper definition `{name}`");
            continue;
        };
        if !seen.insert(def.name) {
            log::warn!("definition `{}` occurs more than once; the last one wins", def.name);
        }
        (def.decode)(rhs, &mut out).map_err(|source| ExtractError::Malformed {
            definition: def.name,
            field: def.field,
            source,
        })?;
        log::debug!("decoded `{}` into {}", def.name, def.field);
    }
    Ok(out)
}

/// `Strategies([SDefNoArgs(name, rhs)])`
fn single_definition(decl: &Term) -> Option<(&str, &Term)> {
    let [defs] = decl.destruct(STRATEGIES).ok()?;
    let [def] = defs.as_list_exact().ok()?;
    let [name, rhs] = def.destruct(SDEF_NO_ARGS).ok()?;
    Some((name.as_str().ok()?, rhs))
}

/// `Build(body)`
fn built(rhs: &Term) -> t::Result<&Term> {
    let [body] = rhs.destruct(BUILD)?;
    Ok(body)
}

fn file_suffix(rhs: &Term) -> t::Result<String> {
    let body = built(rhs)?;
    let suffix = t::decode_string(body)?;
    if suffix.is_empty() || suffix.starts_with('.') {
        Err(t::ShapeError::new("a non-empty file extension without a leading dot", body))?
    }
    Ok(suffix)
}

fn toplevel(rhs: &Term, out: &mut Declarations) -> t::Result<()> {
    out.toplevel_nonterminal = Some(t::decode_string(built(rhs)?)?);
    Ok(())
}

fn extension(rhs: &Term, out: &mut Declarations) -> t::Result<()> {
    out.extension_file_suffix = Some(file_suffix(rhs)?);
    Ok(())
}

fn base_extension(rhs: &Term, out: &mut Declarations) -> t::Result<()> {
    out.base_file_suffix = Some(file_suffix(rhs)?);
    Ok(())
}

fn body_decs(rhs: &Term, out: &mut Declarations) -> t::Result<()> {
    out.body_declarations = t::decode_string_list(built(rhs)?)?.into_iter().collect();
    Ok(())
}

fn namespace_dec(rhs: &Term, out: &mut Declarations) -> t::Result<()> {
    let (cons, index) = t::decode_pair(built(rhs)?)?;
    out.namespace_declaration = Some(NamespaceDecl { cons, index });
    Ok(())
}

fn import_decs(rhs: &Term, out: &mut Declarations) -> t::Result<()> {
    out.imports = t::decode_assoc_list(built(rhs)?)?;
    Ok(())
}

fn namespace_suffixes(rhs: &Term, out: &mut Declarations) -> t::Result<()> {
    out.namespace_suffixes = t::decode_assoc_list(built(rhs)?)?;
    Ok(())
}

/// `Build(NoAnnoList(Op(kind, [separator?])))`
fn namespace_kind(rhs: &Term, out: &mut Declarations) -> t::Result<()> {
    let op = t::unwrap_no_anno(built(rhs)?);
    let [kind, args] = op.destruct(OP)?;
    let kind = t::unquote(kind.as_str()?);
    let separator = || -> t::Result<char> {
        let [sep] = args.as_list_exact()?;
        let text = t::decode_string(sep)?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            | (Some(c), None) => Ok(c),
            | _ => Err(t::ShapeError::new("a one-character namespace separator", sep)),
        }
    };
    out.namespace_kind = Some(match kind {
        | NAMESPACE_FLAT => NamespaceKind::Flat,
        | NAMESPACE_NESTED => NamespaceKind::Nested(separator()?),
        | NAMESPACE_PREFIXED => NamespaceKind::Prefixed(separator()?),
        | _ => Err(t::ShapeError::new(
            format!("one of `{NAMESPACE_FLAT}`, `{NAMESPACE_NESTED}` or `{NAMESPACE_PREFIXED}`"),
            op,
        ))?,
    });
    Ok(())
}
