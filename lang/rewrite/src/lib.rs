//! Structural rewriters applied to generated modules before they are written out.
//!
//! Every rewriter takes a module by reference and builds a new one; untouched subtrees are
//! shared with the input.

pub mod imports;
pub use imports::*;

pub mod augment;
pub use augment::*;
