use basil_driver::ProcessError;
use basil_profile::ExtractError;
use basil_term::ReadError;
use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Process(#[from] ProcessError),
    #[error("Failed to read `{}`: {}", .0.display(), .1)]
    Read(PathBuf, io::Error),
    #[error("Failed to parse `{}`: {}", .0.display(), .1)]
    Parse(PathBuf, ReadError),
    #[error("{0}")]
    Extract(#[from] ExtractError),
    #[error("Cannot tell the plugin directory of `{}`; pass --plugin", .0.display())]
    NoPlugin(PathBuf),
}

impl CliError {
    pub fn backtrace(&self) -> Option<&str> {
        match self {
            | CliError::Process(err) => err.backtrace(),
            | _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
