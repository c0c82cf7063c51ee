use thiserror::Error;

/// A term did not have the shape an accessor expected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected}, found `{found}`")]
pub struct ShapeError {
    pub expected: String,
    pub found: String,
}

impl ShapeError {
    const FOUND_BUDGET: usize = 120;

    pub fn new(expected: impl Into<String>, found: &crate::Term) -> Self {
        let mut found = found.to_string();
        if found.len() > Self::FOUND_BUDGET {
            let mut cut = Self::FOUND_BUDGET - 3;
            while !found.is_char_boundary(cut) {
                cut -= 1;
            }
            found.truncate(cut);
            found.push_str("...");
        }
        Self { expected: expected.into(), found }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("Invalid token at {line}:{col}")]
    InvalidToken { offset: usize, line: usize, col: usize },
    #[error("Unrecognized token `{token}` at {line}:{col}; expected {expected}")]
    UnrecognizedToken { token: String, expected: &'static str, line: usize, col: usize },
    #[error("Unrecognized EOF; expected {expected}")]
    UnrecognizedEof { expected: &'static str },
    #[error("Extra token `{token}` at {line}:{col}")]
    ExtraToken { token: String, line: usize, col: usize },
    #[error("Integer literal `{text}` out of range at {line}:{col}")]
    IntOutOfRange { text: String, line: usize, col: usize },
}

pub type Result<T> = std::result::Result<T, ShapeError>;
