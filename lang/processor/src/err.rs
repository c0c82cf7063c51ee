use basil_term::ShapeError;
use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Source file `{}` has no module name", .0.display())]
    NoModuleName(PathBuf),
    #[error("Malformed namespace declaration: {0}")]
    Namespace(#[from] ShapeError),
    #[error("The declared namespace `{declared}` does not match the expected namespace `{expected}`")]
    NamespaceMismatch { declared: String, expected: String },
    #[error("The declared module name `{declared}` does not match the expected module name `{expected}`")]
    ModuleNameMismatch { declared: String, expected: String },
    #[error("A second namespace declaration `{0}` in the same source file")]
    DuplicateHeader(String),
    #[error("Declaration `{decl}` does not belong to base language `{language}`")]
    Unexpected { decl: String, language: String },
    #[error("Failed to write `{}`: {}", .0.display(), .1)]
    Write(PathBuf, io::Error),
    #[error("Failed to copy `{}` to `{}`: {}", .0.display(), .1.display(), .2)]
    Copy(PathBuf, PathBuf, io::Error),
}

pub type Result<T> = std::result::Result<T, ProcessorError>;
