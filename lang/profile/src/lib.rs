//! Language profiles: what the rest of the toolchain needs to know about a base language,
//! and the extractor that reads it off a generated transformation module.

pub mod err;
pub use err::*;

pub mod syntax;
pub use syntax::*;

pub mod extract;
pub use extract::{DEFINITIONS, Definition, extract_declarations};
