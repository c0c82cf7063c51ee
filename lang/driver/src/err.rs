use basil_profile::ExtractError;
use basil_term::ShapeError;
use std::{backtrace::Backtrace, fmt::Display};
use thiserror::Error;

/// A mismatch between the generated modules and the encoding the bootstrapper expects.
#[derive(Error, Debug)]
pub enum ImplementationError {
    #[error("{0}")]
    Shape(#[from] ShapeError),
    #[error("{0}")]
    Extract(#[from] ExtractError),
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("A bug in the base-language bootstrapper occurred: {0}")]
    Implementation(#[from] ImplementationError),
    #[error("Base-language processing failed unexpectedly while trying to {action}: {message}")]
    External { action: String, message: String, trace: String },
    #[error(
        "While processing the base language definition of `{language}` the following errors occurred:\n{}",
        .messages.join("\n")
    )]
    Definition { language: String, messages: Vec<String> },
}

impl ProcessError {
    pub fn external(action: impl Into<String>, err: impl Display) -> Self {
        ProcessError::External {
            action: action.into(),
            message: err.to_string(),
            trace: Backtrace::force_capture().to_string(),
        }
    }
    pub fn definition(language: impl Into<String>, messages: Vec<String>) -> Self {
        ProcessError::Definition { language: language.into(), messages }
    }
    /// The call stack captured where an external failure surfaced.
    pub fn backtrace(&self) -> Option<&str> {
        match self {
            | ProcessError::External { trace, .. } => Some(trace),
            | _ => None,
        }
    }
}

impl From<ShapeError> for ProcessError {
    fn from(err: ShapeError) -> Self {
        ImplementationError::from(err).into()
    }
}

/// Attach the attempted action to a failure of the environment or of an external service.
pub trait Context<T> {
    fn context(self, action: impl FnOnce() -> String) -> Result<T>;
}

impl<T, E: Display> Context<T> for std::result::Result<T, E> {
    fn context(self, action: impl FnOnce() -> String) -> Result<T> {
        self.map_err(|err| ProcessError::external(action(), err))
    }
}

pub type Result<T> = std::result::Result<T, ProcessError>;
