use basil_term::ShapeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Transformation module malformed: {0}")]
    Module(ShapeError),
    #[error("Definition `{definition}` malformed while decoding {field}: {source}")]
    Malformed { definition: &'static str, field: &'static str, source: ShapeError },
    #[error("Definition `{definition}` for {field} is missing")]
    Missing { definition: &'static str, field: &'static str },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
