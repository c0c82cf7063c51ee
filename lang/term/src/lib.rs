//! Generic, immutable tree terms shared by grammar and transformation modules.

pub mod err;
pub use err::*;

pub mod syntax;
pub use syntax::*;

pub mod decode;
pub use decode::*;

pub mod fmt;
pub use fmt::*;

pub mod lexer;
pub mod reader;
pub use reader::read_term;
