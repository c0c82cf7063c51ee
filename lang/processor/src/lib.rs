//! Splitting a source file of an extensible language into its base-language parts.

pub mod err;
pub use err::*;

pub mod process;
pub use process::*;
